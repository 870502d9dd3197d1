use std::net::Ipv6Addr;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{find_room, ordered, Groups, LightState, SetRequest, Target, ALL_LIGHTS_GROUP};
use crate::{Config, Error, Result};

/// Identifies us to the bridge when pairing
pub const DEVICE_TYPE: &str = "hue-control#cli";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct DeviceType<'a> {
    devicetype: &'a str,
}

#[derive(Debug, Deserialize)]
struct LinkResponse {
    success: Option<LinkSuccess>,
    error: Option<LinkError>,
}

#[derive(Debug, Deserialize)]
struct LinkSuccess {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkError {
    #[serde(default)]
    description: String,
}

/// Blocking client for the Hue Bridge v1 REST API
///
/// Bridges serve self-signed certificates, so certificate
/// validation is disabled for every request made through this client.
/// Requests always go direct, system proxies are ignored.
///
pub struct BridgeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Build the base URL for a bridge address
///
/// Addresses that already carry a scheme are used as-is, bare IPv6
/// addresses are bracketed, everything else gets `https://`.
///
/// # Examples
///
/// ```
/// use hue_control::bridge::base_url;
///
/// assert_eq!(base_url("192.168.1.2"), "https://192.168.1.2");
/// assert_eq!(base_url("fe80::1"), "https://[fe80::1]");
/// assert_eq!(base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
/// ```
///
pub fn base_url(address: &str) -> String {
    if address.contains("://") {
        address.trim_end_matches('/').to_string()
    } else if address.parse::<Ipv6Addr>().is_ok() {
        format!("https://[{}]", address)
    } else {
        format!("https://{}", address)
    }
}

/// Description of the first `error` entry in a bridge reply, if any
fn first_error(value: &Value) -> Option<String> {
    value
        .as_array()?
        .iter()
        .find_map(|entry| entry.get("error"))
        .map(|err| {
            err.get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string()
        })
}

impl BridgeClient {
    /// Create a client for a paired bridge
    pub fn new(config: &Config) -> Result<Self> {
        Self::build(config.bridge_ip(), Some(config.api_key().to_string()))
    }

    /// Create a client that can only be used to [Self::pair]
    pub fn unpaired(address: &str) -> Result<Self> {
        Self::build(address, None)
    }

    fn build(address: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::BridgeUnreachable)?;

        Ok(BridgeClient {
            client,
            base_url: base_url(address),
            api_key,
        })
    }

    /// Ask the bridge for a new API key
    ///
    /// The link button on the bridge must have been pressed shortly before.
    ///
    /// # Returns
    ///   the new API key, or [Error::Bridge] with the bridge's description
    ///   (typically "link button not pressed")
    ///
    pub fn pair(&self) -> Result<String> {
        let url = format!("{}/api", self.base_url);
        let body = DeviceType {
            devicetype: DEVICE_TYPE,
        };

        let value = self.send(self.client.post(url).json(&body))?;
        let entry = value
            .as_array()
            .ok_or_else(|| Error::protocol("unexpected response from bridge"))?
            .first()
            .cloned()
            .ok_or_else(|| Error::protocol("empty response from bridge"))?;
        let first: LinkResponse = serde_json::from_value(entry).map_err(Error::protocol)?;

        if let Some(error) = first.error {
            return Err(Error::Bridge(error.description));
        }

        match first.success.and_then(|s| s.username) {
            Some(username) => {
                info!("paired with bridge at {}", self.base_url);
                Ok(username)
            }
            None => Err(Error::protocol("unexpected response from bridge")),
        }
    }

    /// Fetch every group the bridge knows about
    pub fn groups(&self) -> Result<Groups> {
        let value = self.send(self.client.get(self.url("groups")?))?;
        if let Some(reason) = first_error(&value) {
            return Err(Error::Bridge(reason));
        }
        serde_json::from_value(value).map_err(Error::protocol)
    }

    /// Send a state change to a single group
    pub fn set_group_action(&self, id: &str, state: &LightState) -> Result<()> {
        let url = self.url(&format!("groups/{}/action", id))?;
        let value = self.send(self.client.put(url).json(state))?;
        match first_error(&value) {
            Some(reason) => Err(Error::Bridge(reason)),
            None => Ok(()),
        }
    }

    /// Apply a lighting change to every light or to one room
    ///
    /// For [Target::All] the reserved group is written first. If that
    /// fails every listed group is written individually and failures
    /// are only logged.
    ///
    /// # Returns
    ///   [Err] of [Error::RoomNotFound] before anything is written when
    ///   no group matches the room name
    ///
    pub fn set_state(&self, target: &Target, request: &SetRequest) -> Result<()> {
        let groups = self.groups()?;
        let state = request.state();

        match target {
            Target::All => {
                if let Err(e) = self.set_group_action(ALL_LIGHTS_GROUP, &state) {
                    warn!("failed to set all lights ({}), setting each group instead", e);
                    self.broadcast(&groups, &state);
                }
                Ok(())
            }
            Target::Room(name) => {
                let id = find_room(&groups, name).ok_or_else(|| Error::RoomNotFound(name.clone()))?;
                self.set_group_action(id, &state)
            }
        }
    }

    /// Turn every light on at full brightness
    pub fn turn_on(&self) -> Result<()> {
        self.set_state(&Target::All, &SetRequest::on())
    }

    /// Turn every light off
    pub fn turn_off(&self) -> Result<()> {
        self.set_state(&Target::All, &SetRequest::off())
    }

    // TODO: surface per-group failures once callers can act on partial success
    fn broadcast(&self, groups: &Groups, state: &LightState) {
        for (id, group) in ordered(groups) {
            if let Err(e) = self.set_group_action(id, state) {
                warn!("ignoring failure for group {} ({}): {}", id, group.name(), e);
            }
        }
    }

    fn url(&self, path: &str) -> Result<String> {
        let key = self.api_key.as_deref().ok_or(Error::ConfigurationMissing)?;
        Ok(format!("{}/api/{}/{}", self.base_url, key, path))
    }

    fn send(&self, request: RequestBuilder) -> Result<Value> {
        let resp = request.send().map_err(Error::BridgeUnreachable)?;
        let status = resp.status();
        let body = resp.text().map_err(Error::BridgeUnreachable)?;
        debug!("bridge response {}: {}", status, body);

        let value = serde_json::from_str::<Value>(&body);
        if !status.is_success() {
            let reason = value
                .ok()
                .and_then(|v| first_error(&v))
                .unwrap_or_else(|| format!("unexpected HTTP status {}", status));
            return Err(Error::Bridge(reason));
        }
        value.map_err(Error::protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_error_finds_description() {
        let reply = json!([
            {"success": {"/groups/1/action/on": true}},
            {"error": {"type": 201, "address": "/groups/1/action/bri", "description": "parameter, bri, is not modifiable"}}
        ]);
        assert_eq!(
            first_error(&reply).as_deref(),
            Some("parameter, bri, is not modifiable")
        );
    }

    #[test]
    fn first_error_ignores_success_and_objects() {
        assert_eq!(first_error(&json!([{"success": {}}])), None);
        assert_eq!(first_error(&json!({"1": {"name": "Kitchen"}})), None);
        assert_eq!(
            first_error(&json!([{"error": {}}])).as_deref(),
            Some("unknown error")
        );
    }

    #[test]
    fn unpaired_client_cannot_reach_authenticated_routes() {
        let client = BridgeClient::unpaired("127.0.0.1").unwrap();
        assert_eq!(client.url("groups").unwrap_err(), Error::ConfigurationMissing);
    }
}
