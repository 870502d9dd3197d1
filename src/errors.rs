use std::process::ExitStatus;

/// All potential errors in hue-control
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bridge address or API key could not be found in any source
    #[error(
        "configuration not found. Set HUE_BRIDGE_IP and HUE_API_KEY environment variables, \
         or run 'hue-control setup'"
    )]
    ConfigurationMissing,

    /// Network failure (including timeouts) while talking to the bridge
    #[error("failed to connect to bridge: {0}")]
    BridgeUnreachable(reqwest::Error),

    /// The bridge answered with something we could not make sense of
    #[error("invalid response from bridge: {0}")]
    Protocol(String),

    /// The bridge reported an application level error
    #[error("bridge error: {0}")]
    Bridge(String),

    /// No group matched the requested room name
    #[error("room '{0}' not found. Use 'hue-control list' to see available rooms")]
    RoomNotFound(String),

    /// A user supplied value was out of range or unknown
    #[error("{0}")]
    Validation(String),

    /// The weather service could not be reached or returned garbage
    #[error("failed to fetch weather: {0}")]
    WeatherUnavailable(String),

    /// The weather service answered without any current conditions
    #[error("no weather data received")]
    NoWeatherData,

    /// The hue-control executable could not be located
    #[error("{0} binary not found. Build it first with `cargo build --release`")]
    DependencyMissing(String),

    /// The hue-control executable ran but did not succeed
    #[error("error setting lights: hue-control exited with {0}")]
    DelegateFailed(ExitStatus),

    /// Some local I/O error (console, credential file, subprocess)
    #[error("{action} error: {err}")]
    Io { action: String, err: std::io::Error },
}

impl Error {
    /// Create a new local I/O error
    pub fn io(action: &str, err: std::io::Error) -> Self {
        Error::Io {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new protocol error from anything printable
    pub fn protocol(reason: impl ToString) -> Self {
        Error::Protocol(reason.to_string())
    }

    /// Create a new weather unavailable error from anything printable
    pub fn weather(reason: impl ToString) -> Self {
        Error::WeatherUnavailable(reason.to_string())
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
