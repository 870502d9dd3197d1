//! hue-control models

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{Error, Result};

/// Group ID the bridge reserves for "all lights"
pub const ALL_LIGHTS_GROUP: &str = "0";

/// Groups as listed by the bridge, keyed by bridge-assigned ID
pub type Groups = HashMap<String, Group>;

/// Brightness percentage, values from 0 to 100
///
/// The bridge works in a 0-254 range, use [Self::device] to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    value: u8,
}

impl Brightness {
    /// Create a new Brightness at full power
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Brightness;
    ///
    /// assert_eq!(Brightness::new().value(), 100);
    /// ```
    pub fn new() -> Self {
        Brightness { value: 100 }
    }

    /// Create a new Brightness with nothing emitted
    pub fn off() -> Self {
        Brightness { value: 0 }
    }

    /// Create a new Brightness from a user supplied percentage
    ///
    /// # Returns
    ///   [Err] of [Error::Validation] when value is outside 0-100
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Brightness;
    ///
    /// assert!(Brightness::create(-1).is_err());
    /// assert!(Brightness::create(0).is_ok());
    /// assert!(Brightness::create(100).is_ok());
    /// assert!(Brightness::create(101).is_err());
    /// ```
    ///
    pub fn create(value: i64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(value) if value <= 100 => Ok(Brightness { value }),
            _ => Err(Error::Validation(
                "brightness must be between 0 and 100".to_string(),
            )),
        }
    }

    /// Accessor for our read-only percentage
    pub fn value(&self) -> u8 {
        self.value
    }

    /// If this brightness should leave the lights emitting
    pub fn is_on(&self) -> bool {
        self.value > 0
    }

    /// Scale the percentage to the bridge's 0-254 range
    ///
    /// Any non-zero percentage maps to at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Brightness;
    ///
    /// assert_eq!(Brightness::create(0).unwrap().device(), 0);
    /// assert_eq!(Brightness::create(1).unwrap().device(), 3);
    /// assert_eq!(Brightness::create(50).unwrap().device(), 127);
    /// assert_eq!(Brightness::create(100).unwrap().device(), 254);
    /// ```
    ///
    pub fn device(&self) -> u8 {
        let scaled = ((u32::from(self.value) * 254 + 50) / 100) as u8;
        if self.value > 0 {
            scaled.max(1)
        } else {
            scaled
        }
    }

    /// Convert a bridge brightness (0-254) back to a whole percentage
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Brightness;
    ///
    /// assert_eq!(Brightness::percent_of(254), 100);
    /// assert_eq!(Brightness::percent_of(127), 50);
    /// assert_eq!(Brightness::percent_of(1), 0);
    /// ```
    ///
    pub fn percent_of(device: u8) -> u8 {
        (u32::from(device) * 100 / 254) as u8
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

/// Hue value for color mode, values from 0 to 65535
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hue {
    value: u16,
}

impl Hue {
    /// Create a new Hue from a user supplied value
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Hue;
    ///
    /// assert!(Hue::create(-1).is_err());
    /// assert_eq!(Hue::create(65535).unwrap().value(), 65535);
    /// assert!(Hue::create(65536).is_err());
    /// ```
    ///
    pub fn create(value: i64) -> Result<Self> {
        match u16::try_from(value) {
            Ok(value) => Ok(Hue { value }),
            Err(_) => Err(Error::Validation(
                "hue must be between 0 and 65535".to_string(),
            )),
        }
    }

    /// Accessor for our read-only value
    pub fn value(&self) -> u16 {
        self.value
    }
}

/// Saturation for color mode, values from 0 to 254
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saturation {
    value: u8,
}

impl Saturation {
    /// Create a new Saturation from a user supplied value
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Saturation;
    ///
    /// assert!(Saturation::create(-1).is_err());
    /// assert_eq!(Saturation::create(254).unwrap().value(), 254);
    /// assert!(Saturation::create(255).is_err());
    /// ```
    ///
    pub fn create(value: i64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(value) if value <= 254 => Ok(Saturation { value }),
            _ => Err(Error::Validation(
                "saturation must be between 0 and 254".to_string(),
            )),
        }
    }

    /// Accessor for our read-only value
    pub fn value(&self) -> u8 {
        self.value
    }
}

/// Named colors, each a fixed hue and saturation pair
///
/// Names parse case-insensitively and display in lowercase.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use hue_control::models::ColorPreset;
///
/// let blue = ColorPreset::from_str("Blue").unwrap();
/// assert_eq!(blue, ColorPreset::Blue);
/// assert_eq!(blue.to_string(), "blue");
/// assert_eq!(blue.hue().value(), 46920);
/// assert_eq!(blue.sat().value(), 254);
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorPreset {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
    /// Warm white
    Warm,
    /// Cool white
    Cool,
    /// Pure white (no color)
    White,
}

impl ColorPreset {
    /// Look up a preset by name, listing the valid names on failure
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::ColorPreset;
    ///
    /// assert_eq!(ColorPreset::from_name("WARM").unwrap(), ColorPreset::Warm);
    ///
    /// let err = ColorPreset::from_name("mauve").unwrap_err();
    /// assert!(err.to_string().contains("red, orange, yellow"));
    /// ```
    ///
    pub fn from_name(name: &str) -> Result<Self> {
        ColorPreset::from_str(name).map_err(|_| {
            Error::Validation(format!(
                "unknown color '{}'. Available: {}",
                name,
                ColorPreset::names()
            ))
        })
    }

    /// Comma separated list of every preset name
    pub fn names() -> String {
        ColorPreset::iter()
            .map(|preset| preset.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The preset's hue
    pub fn hue(&self) -> Hue {
        Hue {
            value: self.values().0,
        }
    }

    /// The preset's saturation
    pub fn sat(&self) -> Saturation {
        Saturation {
            value: self.values().1,
        }
    }

    fn values(&self) -> (u16, u8) {
        match self {
            ColorPreset::Red => (0, 254),
            ColorPreset::Orange => (5000, 254),
            ColorPreset::Yellow => (10000, 254),
            ColorPreset::Green => (25500, 254),
            ColorPreset::Cyan => (35000, 254),
            ColorPreset::Blue => (46920, 254),
            ColorPreset::Purple => (50000, 254),
            ColorPreset::Pink => (56100, 254),
            ColorPreset::Warm => (8000, 200),
            ColorPreset::Cool => (34000, 50),
            ColorPreset::White => (0, 0),
        }
    }
}

/// Which lights a state change applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every light the bridge knows about
    All,

    /// A single group, matched case-insensitively by name
    Room(String),
}

impl From<&str> for Target {
    /// Parse a room argument, "all" (any case) selects every light
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::Target;
    ///
    /// assert_eq!(Target::from("ALL"), Target::All);
    /// assert_eq!(Target::from("Kitchen"), Target::Room("Kitchen".to_string()));
    /// ```
    ///
    fn from(room: &str) -> Self {
        if room.eq_ignore_ascii_case("all") {
            Target::All
        } else {
            Target::Room(room.to_string())
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => write!(f, "all"),
            Target::Room(name) => write!(f, "{}", name),
        }
    }
}

/// Group action state, as sent to and reported by the bridge
///
/// Unset attributes are left out of the JSON body entirely.
///
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LightState {
    on: bool,
    bri: Option<u8>,
    hue: Option<u16>,
    sat: Option<u8>,
}

impl LightState {
    /// Accessor for the emitting flag
    pub fn on(&self) -> bool {
        self.on
    }

    /// Accessor for the bridge brightness (0-254), if any
    pub fn bri(&self) -> Option<u8> {
        self.bri
    }

    /// Accessor for the hue, if any
    pub fn hue(&self) -> Option<u16> {
        self.hue
    }

    /// Accessor for the saturation, if any
    pub fn sat(&self) -> Option<u8> {
        self.sat
    }
}

/// A requested lighting change, validated but not yet sent
///
/// Explicit hue and saturation each take precedence over the values
/// supplied by a color preset.
///
/// # Examples
///
/// ```
/// use hue_control::models::{Brightness, ColorPreset, Hue, SetRequest};
///
/// let mut request = SetRequest::new(Brightness::create(50).unwrap());
/// request.color(ColorPreset::Blue);
/// request.hue(Hue::create(100).unwrap());
///
/// let state = request.state();
/// assert!(state.on());
/// assert_eq!(state.bri(), Some(127));
/// assert_eq!(state.hue(), Some(100));
/// assert_eq!(state.sat(), Some(254));
/// ```
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetRequest {
    brightness: Brightness,
    color: Option<ColorPreset>,
    hue: Option<Hue>,
    sat: Option<Saturation>,
}

impl SetRequest {
    /// Create a new request with no color change
    pub fn new(brightness: Brightness) -> Self {
        SetRequest {
            brightness,
            color: None,
            hue: None,
            sat: None,
        }
    }

    /// Full brightness, no color change
    pub fn on() -> Self {
        SetRequest::new(Brightness::new())
    }

    /// Lights off
    pub fn off() -> Self {
        SetRequest::new(Brightness::off())
    }

    /// Use a color preset for hue and saturation
    pub fn color(&mut self, color: ColorPreset) {
        self.color = Some(color);
    }

    /// Set an explicit hue, overriding any preset hue
    pub fn hue(&mut self, hue: Hue) {
        self.hue = Some(hue);
    }

    /// Set an explicit saturation, overriding any preset saturation
    pub fn sat(&mut self, sat: Saturation) {
        self.sat = Some(sat);
    }

    /// Accessor for the requested brightness
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Accessor for the requested preset, if any
    pub fn preset(&self) -> Option<ColorPreset> {
        self.color
    }

    /// Resolve this request into the body for a group action
    pub fn state(&self) -> LightState {
        let on = self.brightness.is_on();
        LightState {
            on,
            bri: on.then(|| self.brightness.device()),
            hue: self.final_hue().map(|h| h.value()),
            sat: self.final_sat().map(|s| s.value()),
        }
    }

    /// Human readable description of what was applied to the target
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::models::{Brightness, ColorPreset, Hue, SetRequest, Target};
    ///
    /// let mut request = SetRequest::new(Brightness::create(60).unwrap());
    /// assert_eq!(request.summary(&Target::All), "Set all to 60% brightness");
    ///
    /// request.hue(Hue::create(100).unwrap());
    /// assert_eq!(
    ///     request.summary(&Target::All),
    ///     "Set all to 60% brightness with hue=100 sat=-"
    /// );
    ///
    /// request.color(ColorPreset::Warm);
    /// let bedroom = Target::Room("Bedroom".to_string());
    /// assert_eq!(
    ///     request.summary(&bedroom),
    ///     "Set Bedroom to 60% brightness with color 'warm'"
    /// );
    /// ```
    ///
    pub fn summary(&self, target: &Target) -> String {
        let mut msg = format!("Set {} to {}% brightness", target, self.brightness.value());
        if let Some(color) = self.color {
            msg.push_str(&format!(" with color '{}'", color));
        } else if self.hue.is_some() || self.sat.is_some() {
            let hue = self
                .hue
                .map_or_else(|| "-".to_string(), |h| h.value().to_string());
            let sat = self
                .sat
                .map_or_else(|| "-".to_string(), |s| s.value().to_string());
            msg.push_str(&format!(" with hue={} sat={}", hue, sat));
        }
        msg
    }

    fn final_hue(&self) -> Option<Hue> {
        self.hue.or_else(|| self.color.map(|c| c.hue()))
    }

    fn final_sat(&self) -> Option<Saturation> {
        self.sat.or_else(|| self.color.map(|c| c.sat()))
    }
}

/// A bridge group (room, zone, ...) and its current action state
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Group {
    name: String,

    #[serde(rename = "type", default)]
    kind: String,

    #[serde(default)]
    lights: Vec<String>,

    #[serde(default)]
    action: LightState,
}

impl Group {
    /// Accessor for this group's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accessor for this group's bridge type (Room, Zone, LightGroup, ...)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Accessor for the IDs of the lights in this group
    pub fn lights(&self) -> &[String] {
        &self.lights
    }

    /// Accessor for this group's last known action state
    pub fn action(&self) -> &LightState {
        &self.action
    }

    /// Short power status, "off" or "on (NN%)"
    pub fn status(&self) -> String {
        if self.action.on {
            let pct = Brightness::percent_of(self.action.bri.unwrap_or(0));
            format!("on ({}%)", pct)
        } else {
            "off".to_string()
        }
    }

    /// One line listing entry for this group
    pub fn describe(&self, id: &str) -> String {
        format!(
            "  [{}] {} ({}) - {} lights - {}",
            id,
            self.name,
            self.kind,
            self.lights.len(),
            self.status()
        )
    }
}

/// Groups ordered by numeric ID, non-numeric IDs last
pub fn ordered(groups: &Groups) -> Vec<(&String, &Group)> {
    let mut sorted: Vec<_> = groups.iter().collect();
    sorted.sort_by_key(|(id, _)| (id.parse::<u64>().unwrap_or(u64::MAX), id.to_string()));
    sorted
}

/// Find the ID of the group whose name matches, ignoring case
pub fn find_room<'a>(groups: &'a Groups, name: &str) -> Option<&'a str> {
    let wanted = name.to_lowercase();
    ordered(groups)
        .into_iter()
        .find(|(_, group)| group.name.to_lowercase() == wanted)
        .map(|(id, _)| id.as_str())
}
