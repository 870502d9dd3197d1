//! Bridge credentials: where they are read from and how they are saved

use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable (and dotenv key) holding the bridge address
pub const BRIDGE_IP_VAR: &str = "HUE_BRIDGE_IP";

/// Environment variable (and dotenv key) holding the API key
pub const API_KEY_VAR: &str = "HUE_API_KEY";

/// Credential file written by `hue-control setup`, relative to the cwd
pub const DOTENV_FILE: &str = ".env";

/// Read-only fallback credential file, relative to the home directory
pub const LEGACY_FILE: &str = ".hue-config.json";

/// Hue Bridge connection details
///
/// # Examples
///
/// ```
/// use hue_control::Config;
///
/// let config = Config::new("192.168.1.2", "secret");
/// assert_eq!(config.bridge_ip(), "192.168.1.2");
/// assert_eq!(config.api_key(), "secret");
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bridge_ip: String,
    api_key: String,
}

/// A place credentials may be read from
///
/// Sources are consulted in order, each only filling in fields
/// that are still unset. See [Config::load_from].
#[derive(Debug, Clone)]
pub enum Source {
    /// `HUE_BRIDGE_IP` and `HUE_API_KEY` from the process environment
    Environment,

    /// A dotenv style `KEY=value` file
    DotEnv(PathBuf),

    /// A JSON object with `bridge_ip` and `api_key`
    Legacy(PathBuf),
}

#[derive(Debug, Default, Deserialize)]
struct LegacyConfig {
    #[serde(default)]
    bridge_ip: String,
    #[serde(default)]
    api_key: String,
}

#[derive(Debug, Default)]
struct Partial {
    bridge_ip: Option<String>,
    api_key: Option<String>,
}

impl Partial {
    fn fill(&mut self, bridge_ip: Option<String>, api_key: Option<String>) {
        if self.bridge_ip.is_none() {
            self.bridge_ip = bridge_ip.filter(|v| !v.is_empty());
        }
        if self.api_key.is_none() {
            self.api_key = api_key.filter(|v| !v.is_empty());
        }
    }

    fn is_complete(&self) -> bool {
        self.bridge_ip.is_some() && self.api_key.is_some()
    }
}

impl Source {
    fn read_into(&self, partial: &mut Partial) {
        match self {
            Source::Environment => {
                partial.fill(env::var(BRIDGE_IP_VAR).ok(), env::var(API_KEY_VAR).ok());
            }
            Source::DotEnv(path) => match dotenvy::from_path_iter(path) {
                Ok(iter) => {
                    let (mut bridge_ip, mut api_key) = (None, None);
                    for item in iter {
                        match item {
                            Ok((key, value)) if key == BRIDGE_IP_VAR => bridge_ip = Some(value),
                            Ok((key, value)) if key == API_KEY_VAR => api_key = Some(value),
                            Ok(_) => {}
                            Err(e) => {
                                debug!("skipping bad line in {}: {}", path.display(), e);
                            }
                        }
                    }
                    partial.fill(bridge_ip, api_key);
                }
                Err(e) => debug!("no dotenv credentials at {}: {}", path.display(), e),
            },
            Source::Legacy(path) => match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<LegacyConfig>(&content) {
                    Ok(legacy) => partial.fill(Some(legacy.bridge_ip), Some(legacy.api_key)),
                    Err(e) => debug!("failed to decode {}: {}", path.display(), e),
                },
                Err(e) => debug!("no legacy credentials at {}: {}", path.display(), e),
            },
        }
    }
}

impl Config {
    /// Create a new config from known values
    pub fn new(bridge_ip: &str, api_key: &str) -> Self {
        Config {
            bridge_ip: bridge_ip.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Accessor for the bridge address
    pub fn bridge_ip(&self) -> &str {
        &self.bridge_ip
    }

    /// Accessor for the bridge API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The standard source chain: environment, `./.env`, `~/.hue-config.json`
    pub fn default_sources() -> Vec<Source> {
        let mut sources = vec![Source::Environment, Source::DotEnv(PathBuf::from(DOTENV_FILE))];
        if let Some(home) = dirs::home_dir() {
            sources.push(Source::Legacy(home.join(LEGACY_FILE)));
        }
        sources
    }

    /// Load credentials from the standard source chain
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_sources())
    }

    /// Load credentials from the given sources, first non-empty value wins
    ///
    /// # Returns
    ///   [Err] of [Error::ConfigurationMissing] if either field is unset
    ///   after every source has been consulted
    ///
    pub fn load_from(sources: &[Source]) -> Result<Self> {
        let mut partial = Partial::default();
        for source in sources {
            if partial.is_complete() {
                break;
            }
            source.read_into(&mut partial);
        }

        match partial {
            Partial {
                bridge_ip: Some(bridge_ip),
                api_key: Some(api_key),
            } => Ok(Config { bridge_ip, api_key }),
            _ => Err(Error::ConfigurationMissing),
        }
    }

    /// Write this config to `./.env`, replacing anything already there
    pub fn save(&self) -> Result<()> {
        self.save_to(Path::new(DOTENV_FILE))
    }

    /// Write this config as a dotenv file, readable by the owner only
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = format!(
            "{}={}\n{}={}\n",
            BRIDGE_IP_VAR, self.bridge_ip, API_KEY_VAR, self.api_key
        );

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(path)
            .map_err(|e| Error::io("open credential file", e))?;
        // mode() only applies to newly created files
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::io("restrict credential file", e))?;
        }
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io("write credential file", e))?;

        info!("saved bridge credentials to {}", path.display());
        Ok(())
    }
}
