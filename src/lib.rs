//! hue-control - Philips Hue bridge control library
//!
//! # Examples
//!
//! ```no_run
//! use hue_control::models::{Brightness, ColorPreset, SetRequest, Target};
//! use hue_control::{BridgeClient, Config};
//!
//! // environment, then ./.env, then ~/.hue-config.json
//! let config = Config::load().unwrap();
//! let bridge = BridgeClient::new(&config).unwrap();
//!
//! for (id, group) in hue_control::models::ordered(&bridge.groups().unwrap()) {
//!     println!("{}", group.describe(id));
//! }
//!
//! // requests are validated before anything is sent
//! let mut request = SetRequest::new(Brightness::create(60).unwrap());
//! request.color(ColorPreset::from_name("warm").unwrap());
//!
//! let bedroom = Target::from("Bedroom");
//! bridge.set_state(&bedroom, &request).unwrap();
//! println!("{}", request.summary(&bedroom));
//! ```
//!
//! # CLI
//!
//! Two binaries are built from this crate.
//!
//! `hue-control` talks to the bridge directly:
//!
//! ```bash
//! $ hue-control --help
//! Philips Hue light controller
//!
//! Usage: hue-control <COMMAND>
//!
//! Commands:
//!   setup  Configure the Hue Bridge connection (saves to .env)
//!   list   List available rooms/groups
//!   set    Set brightness and color for lights
//!   on     Turn all lights on
//!   off    Turn all lights off
//!   help   Print this message or the help of the given subcommand(s)
//!
//! Options:
//!   -h, --help     Print help
//!   -V, --version  Print version
//! ```
//!
//! `weather-lights` picks a color from the current weather and applies it:
//!
//! ```bash
//! $ weather-lights --help
//! Set Hue lights from the current weather
//!
//! Usage: weather-lights [OPTIONS]
//!
//! Options:
//!   -l, --location <LOCATION>      Location for weather (default: auto-detect) [default: ]
//!   -r, --room <ROOM>              Room to control [default: all]
//!   -b, --brightness <BRIGHTNESS>  Brightness percentage (0-100) [default: 80]
//!   -n, --dry-run                  Show what would be done without changing anything
//!   -x, --exec                     Run the hue-control binary instead of calling the bridge directly
//!   -p, --provider <PROVIDER>      Weather service base URL [env: WEATHER_API_URL=] [default: https://wttr.in]
//!   -h, --help                     Print help
//!   -V, --version                  Print version
//! ```
//!

pub mod bridge;
pub mod config;
pub mod delegate;
pub mod models;
pub mod weather;

mod errors;

pub use bridge::BridgeClient;
pub use config::{Config, Source};
pub use errors::Error;
pub use weather::WeatherClient;

/// Result type used throughout hue-control
pub type Result<T> = std::result::Result<T, Error>;
