//! Weather lookup and the weather to color rules
//!
//! Conditions come from the wttr.in `format=j1` JSON API. The condition
//! code picks a base [ColorPreset], which is then shifted once according
//! to the [TemperatureBand] the current temperature falls in.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;

use crate::models::ColorPreset;
use crate::{Error, Result};

/// Public weather service used when none is configured
pub const DEFAULT_PROVIDER: &str = "https://wttr.in";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct WttrResponse {
    #[serde(default)]
    current_condition: Vec<CurrentCondition>,
    #[serde(default)]
    nearest_area: Vec<NearestArea>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<TextValue>,
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC", default)]
    feels_like_c: String,
}

#[derive(Debug, Deserialize)]
struct NearestArea {
    #[serde(rename = "areaName", default)]
    area_name: Vec<TextValue>,
    #[serde(default)]
    country: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

fn first_value(values: &[TextValue]) -> Option<&str> {
    values
        .first()
        .map(|v| v.value.as_str())
        .filter(|v| !v.is_empty())
}

/// Current conditions at some location
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    location: String,
    code: String,
    description: String,
    temp_c: i32,
    feels_like_c: Option<i32>,
}

impl Weather {
    /// Parse a wttr.in `format=j1` document
    ///
    /// # Returns
    ///   [Err] of [Error::NoWeatherData] when there are no current
    ///   conditions, [Error::WeatherUnavailable] for anything malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::weather::Weather;
    ///
    /// let weather = Weather::parse(r#"{
    ///     "current_condition": [{
    ///         "weatherCode": "113",
    ///         "weatherDesc": [{"value": "Sunny"}],
    ///         "temp_C": "35",
    ///         "FeelsLikeC": "38"
    ///     }],
    ///     "nearest_area": [{"areaName": [{"value": "Seville"}], "country": [{"value": "Spain"}]}]
    /// }"#).unwrap();
    ///
    /// assert_eq!(weather.location(), "Seville, Spain");
    /// assert_eq!(weather.temp_c(), 35);
    /// assert_eq!(weather.advise().color().to_string(), "orange");
    /// ```
    ///
    pub fn parse(body: &str) -> Result<Self> {
        let report: WttrResponse = serde_json::from_str(body).map_err(Error::weather)?;
        let current = report
            .current_condition
            .first()
            .ok_or(Error::NoWeatherData)?;

        let temp_c = current.temp_c.trim().parse::<i32>().map_err(|e| {
            Error::weather(format!("invalid temperature '{}': {}", current.temp_c, e))
        })?;

        let location = match report.nearest_area.first() {
            Some(area) => match (first_value(&area.area_name), first_value(&area.country)) {
                (Some(name), Some(country)) => format!("{}, {}", name, country),
                (Some(name), None) => name.to_string(),
                _ => "Unknown".to_string(),
            },
            None => "Unknown".to_string(),
        };

        Ok(Weather {
            location,
            code: current.weather_code.clone(),
            description: first_value(&current.weather_desc)
                .unwrap_or("Unknown")
                .to_string(),
            temp_c,
            feels_like_c: current.feels_like_c.trim().parse().ok(),
        })
    }

    /// Accessor for the nearest area name
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Accessor for the provider's condition code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Accessor for the human readable condition
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Accessor for the temperature in whole degrees Celsius
    pub fn temp_c(&self) -> i32 {
        self.temp_c
    }

    /// Accessor for the feels-like temperature, if reported
    pub fn feels_like_c(&self) -> Option<i32> {
        self.feels_like_c
    }

    /// Work out which color these conditions call for
    pub fn advise(&self) -> Advice {
        let base = base_color(&self.code);
        Advice {
            base,
            color: adjust_for_temperature(base, self.temp_c),
        }
    }
}

/// The color chosen for some weather, and what it was before the
/// temperature adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    base: ColorPreset,
    color: ColorPreset,
}

impl Advice {
    /// The color picked from the condition code alone
    pub fn base(&self) -> ColorPreset {
        self.base
    }

    /// The color to apply
    pub fn color(&self) -> ColorPreset {
        self.color
    }

    /// If the temperature changed the color
    pub fn adjusted(&self) -> bool {
        self.base != self.color
    }
}

/// Base color for a wttr.in (WWO) condition code
///
/// Unknown codes fall back to warm white.
///
/// # Examples
///
/// ```
/// use hue_control::models::ColorPreset;
/// use hue_control::weather::base_color;
///
/// assert_eq!(base_color("113"), ColorPreset::Warm);
/// assert_eq!(base_color("302"), ColorPreset::Blue);
/// assert_eq!(base_color("999"), ColorPreset::Warm);
/// ```
///
pub fn base_color(code: &str) -> ColorPreset {
    match code {
        // sunny, partly cloudy
        "113" | "116" => ColorPreset::Warm,

        // cloudy, overcast, mist, fog
        "119" | "122" | "143" | "248" | "260" => ColorPreset::Cool,

        // rain and drizzle
        "176" | "263" | "266" | "293" | "296" | "299" | "302" | "305" | "308" | "353" | "356"
        | "359" => ColorPreset::Blue,

        // freezing rain, sleet, ice pellets
        "182" | "185" | "311" | "314" | "317" | "320" | "350" | "362" | "365" | "374" | "377" => {
            ColorPreset::Cyan
        }

        // snow
        "179" | "227" | "230" | "323" | "326" | "329" | "332" | "335" | "338" | "368" | "371" => {
            ColorPreset::White
        }

        // thunder
        "200" | "386" | "389" | "392" | "395" => ColorPreset::Purple,

        _ => ColorPreset::Warm,
    }
}

/// Temperature ranges that shift the weather color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    /// Below 0°C
    Freezing,
    /// 0 to 9°C
    Cold,
    /// 10 to 29°C
    Mild,
    /// 30 to 37°C
    Hot,
    /// 38°C and above
    Scorching,
}

impl TemperatureBand {
    /// Find the band for a temperature in whole degrees Celsius
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::weather::TemperatureBand;
    ///
    /// assert_eq!(TemperatureBand::from_celsius(-1), TemperatureBand::Freezing);
    /// assert_eq!(TemperatureBand::from_celsius(0), TemperatureBand::Cold);
    /// assert_eq!(TemperatureBand::from_celsius(10), TemperatureBand::Mild);
    /// assert_eq!(TemperatureBand::from_celsius(30), TemperatureBand::Hot);
    /// assert_eq!(TemperatureBand::from_celsius(38), TemperatureBand::Scorching);
    /// ```
    ///
    pub fn from_celsius(temp_c: i32) -> Self {
        match temp_c {
            i32::MIN..=-1 => TemperatureBand::Freezing,
            0..=9 => TemperatureBand::Cold,
            10..=29 => TemperatureBand::Mild,
            30..=37 => TemperatureBand::Hot,
            _ => TemperatureBand::Scorching,
        }
    }

    /// Apply this band's substitution to a color, exactly once
    pub fn adjust(&self, color: ColorPreset) -> ColorPreset {
        use ColorPreset::*;

        match (self, color) {
            (TemperatureBand::Freezing, Warm | Orange) => Cool,
            (TemperatureBand::Freezing, Yellow) => Cyan,
            (TemperatureBand::Cold, Warm) => White,
            (TemperatureBand::Hot, Cool | White) => Warm,
            (TemperatureBand::Hot, Warm) => Orange,
            (TemperatureBand::Scorching, Cool | White | Warm) => Orange,
            (TemperatureBand::Scorching, Yellow) => Red,
            (_, color) => color,
        }
    }
}

/// Shift a color for the given temperature
pub fn adjust_for_temperature(color: ColorPreset, temp_c: i32) -> ColorPreset {
    TemperatureBand::from_celsius(temp_c).adjust(color)
}

/// Blocking client for the weather service
pub struct WeatherClient {
    client: Client,
    provider: String,
}

impl WeatherClient {
    /// Create a new client for the given provider base URL
    pub fn new(provider: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::weather)?;

        Ok(WeatherClient {
            client,
            provider: provider.to_string(),
        })
    }

    /// URL for a location, an empty location lets the provider guess
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_control::weather::WeatherClient;
    ///
    /// let client = WeatherClient::new("https://wttr.in").unwrap();
    /// assert_eq!(client.url("").unwrap().as_str(), "https://wttr.in/?format=j1");
    /// assert_eq!(
    ///     client.url("New York").unwrap().as_str(),
    ///     "https://wttr.in/New%20York?format=j1"
    /// );
    /// ```
    ///
    pub fn url(&self, location: &str) -> Result<Url> {
        let mut url = Url::parse(&self.provider).map_err(Error::weather)?;
        url.path_segments_mut()
            .map_err(|_| Error::weather(format!("invalid provider URL: {}", self.provider)))?
            .pop_if_empty()
            .extend((!location.is_empty()).then_some(location));
        url.set_query(Some("format=j1"));
        Ok(url)
    }

    /// Fetch the current conditions
    pub fn current(&self, location: &str) -> Result<Weather> {
        let url = self.url(location)?;
        debug!("fetching weather from {}", url);

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(Error::weather)?;

        Weather::parse(&body)
    }
}
