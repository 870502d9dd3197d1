mod common;

use common::{dead_address, MockServer};
use hue_control::models::{Brightness, ColorPreset, Hue, SetRequest, Target};
use hue_control::{BridgeClient, Config, Error};
use serde_json::json;

const GROUPS: &str = r#"{
    "1": {"name": "Living Room", "type": "Room", "lights": ["1", "2", "3"],
          "action": {"on": true, "bri": 254, "hue": 8000, "sat": 200}},
    "2": {"name": "Bedroom", "type": "Room", "lights": ["4"],
          "action": {"on": false, "bri": 100}}
}"#;

const OK: &str = r#"[{"success": {"/groups/0/action/on": true}}]"#;

fn client(server: &MockServer) -> BridgeClient {
    BridgeClient::new(&Config::new(server.url(), "key")).unwrap()
}

fn request(pct: i64, color: Option<ColorPreset>) -> SetRequest {
    let mut request = SetRequest::new(Brightness::create(pct).unwrap());
    if let Some(color) = color {
        request.color(color);
    }
    request
}

#[test]
fn lists_groups() {
    let server = MockServer::start(&[("GET", "/api/key/groups", 200, GROUPS)]);
    let groups = client(&server).groups().unwrap();

    assert_eq!(groups.len(), 2);
    let living = &groups["1"];
    assert_eq!(living.name(), "Living Room");
    assert_eq!(living.kind(), "Room");
    assert_eq!(living.lights().len(), 3);
    assert_eq!(living.status(), "on (100%)");
    assert_eq!(groups["2"].status(), "off");
}

#[test]
fn unauthorized_listing_is_a_bridge_error() {
    let server = MockServer::start(&[(
        "GET",
        "/api/key/groups",
        200,
        r#"[{"error": {"type": 1, "address": "/groups", "description": "unauthorized user"}}]"#,
    )]);

    match client(&server).groups() {
        Err(Error::Bridge(reason)) => assert_eq!(reason, "unauthorized user"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_listing_is_a_protocol_error() {
    let server = MockServer::start(&[("GET", "/api/key/groups", 200, "{not json")]);
    assert!(matches!(client(&server).groups(), Err(Error::Protocol(_))));

    let server = MockServer::start(&[("GET", "/api/key/groups", 200, r#"{"1": 5}"#)]);
    assert!(matches!(client(&server).groups(), Err(Error::Protocol(_))));
}

#[test]
fn unreachable_bridge() {
    let bridge = BridgeClient::new(&Config::new(&dead_address(), "key")).unwrap();
    assert!(matches!(bridge.groups(), Err(Error::BridgeUnreachable(_))));
}

#[test]
fn pairing_returns_username() {
    let server = MockServer::start(&[(
        "POST",
        "/api",
        200,
        r#"[{"success": {"username": "83b7780291a6ceffbe0bd049104df"}}]"#,
    )]);

    let key = BridgeClient::unpaired(server.url()).unwrap().pair().unwrap();
    assert_eq!(key, "83b7780291a6ceffbe0bd049104df");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].json(), json!({"devicetype": "hue-control#cli"}));
}

#[test]
fn pairing_without_button_press() {
    let server = MockServer::start(&[(
        "POST",
        "/api",
        200,
        r#"[{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]"#,
    )]);

    match BridgeClient::unpaired(server.url()).unwrap().pair() {
        Err(Error::Bridge(reason)) => assert_eq!(reason, "link button not pressed"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn pairing_reads_only_the_first_entry() {
    let server = MockServer::start(&[(
        "POST",
        "/api",
        200,
        r#"[{"error": {"type": 101, "description": "link button not pressed"}}, 5]"#,
    )]);

    match BridgeClient::unpaired(server.url()).unwrap().pair() {
        Err(Error::Bridge(reason)) => assert_eq!(reason, "link button not pressed"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn pairing_with_unexpected_shapes() {
    for body in ["[]", "{}", r#"[{"success": {}}]"#, "garbage"] {
        let server = MockServer::start(&[("POST", "/api", 200, body)]);
        let result = BridgeClient::unpaired(server.url()).unwrap().pair();
        assert!(matches!(result, Err(Error::Protocol(_))), "{}: {:?}", body, result);
    }
}

#[test]
fn sets_room_ignoring_case() {
    let server = MockServer::start(&[
        ("GET", "/api/key/groups", 200, GROUPS),
        ("PUT", "/api/key/groups/2/action", 200, OK),
    ]);

    let mut blue = request(50, Some(ColorPreset::from_name("Blue").unwrap()));
    blue.hue(Hue::create(100).unwrap());
    client(&server)
        .set_state(&Target::from("bedroom"), &blue)
        .unwrap();

    let puts = server.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "/api/key/groups/2/action");
    assert_eq!(
        puts[0].json(),
        json!({"on": true, "bri": 127, "hue": 100, "sat": 254})
    );
}

#[test]
fn unknown_room_is_not_written() {
    let server = MockServer::start(&[
        ("GET", "/api/key/groups", 200, GROUPS),
        ("PUT", "/api/key/groups/1/action", 200, OK),
        ("PUT", "/api/key/groups/2/action", 200, OK),
    ]);

    let result = client(&server).set_state(&Target::from("Kitchen"), &request(50, None));
    match result {
        Err(Error::RoomNotFound(name)) => assert_eq!(name, "Kitchen"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(server.puts().is_empty());
}

#[test]
fn room_write_failure_is_surfaced() {
    let server = MockServer::start(&[
        ("GET", "/api/key/groups", 200, GROUPS),
        (
            "PUT",
            "/api/key/groups/1/action",
            200,
            r#"[{"error": {"type": 201, "description": "parameter, hue, is not modifiable"}}]"#,
        ),
    ]);

    let result = client(&server).set_state(
        &Target::from("Living Room"),
        &request(80, Some(ColorPreset::Red)),
    );
    assert!(matches!(result, Err(Error::Bridge(_))));
}

#[test]
fn all_lights_use_the_reserved_group() {
    let server = MockServer::start(&[
        ("GET", "/api/key/groups", 200, GROUPS),
        ("PUT", "/api/key/groups/0/action", 200, OK),
    ]);

    client(&server).turn_on().unwrap();

    let puts = server.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "/api/key/groups/0/action");
    assert_eq!(puts[0].json(), json!({"on": true, "bri": 254}));
}

#[test]
fn turning_off_omits_brightness() {
    let server = MockServer::start(&[
        ("GET", "/api/key/groups", 200, GROUPS),
        ("PUT", "/api/key/groups/0/action", 200, OK),
    ]);

    client(&server).turn_off().unwrap();
    assert_eq!(server.puts()[0].json(), json!({"on": false}));
}

#[test]
fn all_lights_fall_back_to_each_group() {
    let server = MockServer::start(&[
        ("GET", "/api/key/groups", 200, GROUPS),
        ("PUT", "/api/key/groups/0/action", 500, "oops"),
        ("PUT", "/api/key/groups/1/action", 500, "oops"),
        ("PUT", "/api/key/groups/2/action", 200, OK),
    ]);

    client(&server)
        .set_state(&Target::All, &request(30, Some(ColorPreset::Warm)))
        .unwrap();

    let paths: Vec<_> = server.puts().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/api/key/groups/0/action",
            "/api/key/groups/1/action",
            "/api/key/groups/2/action",
        ]
    );
    for put in server.puts() {
        assert_eq!(put.json(), json!({"on": true, "bri": 76, "hue": 8000, "sat": 200}));
    }
}

#[test]
fn listing_failure_stops_set() {
    let server = MockServer::start(&[("PUT", "/api/key/groups/0/action", 200, OK)]);

    // the listing route is missing so the bridge answers 404
    let result = client(&server).turn_on();
    assert!(matches!(result, Err(Error::Bridge(_))));
    assert!(server.puts().is_empty());
}
