//! Layered bot configuration.
//!
//! Values come from an ordered list of layers: command line overrides,
//! `KORTH_*` environment variables, then the TOML config file. The first
//! layer that has a value wins. A config file that does not exist is
//! skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::coords::Coordinates;
use crate::instance::Universe;
use crate::sdk::AW_BUILD;

pub const ENV_PREFIX: &str = "KORTH_";
const DEFAULT_SDK_PATH: &str = "aw64.dll";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no configuration source has a {0}")]
    Missing(&'static str),

    #[error("could not determine the config directory")]
    NoConfigDir,
}

/// Where the config file lives unless overridden.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    directories::ProjectDirs::from("", "", "korth-spirit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// One source's worth of settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<i32>,
    /// Kept last: serialized as a TOML table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_coordinates: Option<Coordinates>,
}

impl ConfigLayer {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let layer = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(layer)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Starting point written by `korth init-config`.
    pub fn template() -> Self {
        Self {
            bot_name: Some("Korth".to_string()),
            citizen_number: Some(0),
            password: Some(String::new()),
            world_name: Some("AWTeen".to_string()),
            world_coordinates: Some(Coordinates::default()),
            greeting: Some("Hello!".to_string()),
            sdk_path: Some(PathBuf::from(DEFAULT_SDK_PATH)),
            universe_host: Some(Universe::default().host),
            universe_port: Some(Universe::default().port),
            build: Some(AW_BUILD),
        }
    }

    /// Read `KORTH_*` variables. Values that fail to parse are ignored so
    /// that a lower layer can supply them.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            let Some(field) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value: String = value.into();
            match field {
                "BOT_NAME" => layer.bot_name = Some(value),
                "CITIZEN" => layer.citizen_number = parse_var(field, &value),
                "PASSWORD" => layer.password = Some(value),
                "WORLD" => layer.world_name = Some(value),
                "COORDS" => layer.world_coordinates = parse_var(field, &value),
                "GREETING" => layer.greeting = Some(value),
                "SDK_PATH" => layer.sdk_path = Some(PathBuf::from(value)),
                "HOST" => layer.universe_host = Some(value),
                "PORT" => layer.universe_port = parse_var(field, &value),
                "BUILD" => layer.build = parse_var(field, &value),
                _ => {}
            }
        }
        layer
    }

    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }
}

fn parse_var<T: std::str::FromStr>(field: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring {}{}: cannot parse {:?}", ENV_PREFIX, field, value);
            None
        }
    }
}

#[derive(Debug, Clone)]
struct Source {
    origin: String,
    layer: ConfigLayer,
}

/// Ordered configuration layers, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct AggregateConfig {
    sources: Vec<Source>,
}

macro_rules! first_of {
    ($self:ident, $field:ident) => {
        $self
            .sources
            .iter()
            .find_map(|source| source.layer.$field.clone())
    };
}

impl AggregateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower priority than those already added.
    pub fn with_layer(mut self, origin: impl Into<String>, layer: ConfigLayer) -> Self {
        self.sources.push(Source {
            origin: origin.into(),
            layer,
        });
        self
    }

    /// Append the config file at `path`; a missing file is skipped.
    pub fn with_file(self, path: &Path) -> Result<Self, ConfigError> {
        match ConfigLayer::load(path) {
            Ok(layer) => Ok(self.with_layer(path.display().to_string(), layer)),
            Err(ConfigError::NotFound(_)) => {
                info!("No config file at {}, skipping", path.display());
                Ok(self)
            }
            Err(e) => Err(e),
        }
    }

    pub fn with_env(self) -> Self {
        self.with_layer("environment", ConfigLayer::from_env())
    }

    /// Names of the layers in priority order.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.origin.as_str())
    }

    pub fn bot_name(&self) -> Result<String, ConfigError> {
        first_of!(self, bot_name).ok_or(ConfigError::Missing("bot name"))
    }

    pub fn citizen_number(&self) -> Result<i32, ConfigError> {
        first_of!(self, citizen_number).ok_or(ConfigError::Missing("citizen number"))
    }

    pub fn password(&self) -> Result<String, ConfigError> {
        first_of!(self, password).ok_or(ConfigError::Missing("password"))
    }

    pub fn world_name(&self) -> Result<String, ConfigError> {
        first_of!(self, world_name).ok_or(ConfigError::Missing("world name"))
    }

    pub fn world_coordinates(&self) -> Result<Coordinates, ConfigError> {
        first_of!(self, world_coordinates).ok_or(ConfigError::Missing("world coordinates"))
    }

    pub fn greeting(&self) -> Option<String> {
        first_of!(self, greeting)
    }

    pub fn sdk_path(&self) -> PathBuf {
        first_of!(self, sdk_path).unwrap_or_else(|| PathBuf::from(DEFAULT_SDK_PATH))
    }

    pub fn universe(&self) -> Universe {
        let default = Universe::default();
        Universe {
            host: first_of!(self, universe_host).unwrap_or(default.host),
            port: first_of!(self, universe_port).unwrap_or(default.port),
        }
    }

    pub fn build(&self) -> i32 {
        first_of!(self, build).unwrap_or(AW_BUILD)
    }

    /// Everything needed to start the bot.
    pub fn resolve(&self) -> Result<BotConfig, ConfigError> {
        Ok(BotConfig {
            bot_name: self.bot_name()?,
            citizen_number: self.citizen_number()?,
            password: self.password()?,
            world_name: self.world_name()?,
            coordinates: self.world_coordinates()?,
            greeting: self.greeting(),
            sdk_path: self.sdk_path(),
            universe: self.universe(),
            build: self.build(),
        })
    }
}

/// Fully resolved settings for one bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub bot_name: String,
    pub citizen_number: i32,
    pub password: String,
    pub world_name: String,
    pub coordinates: Coordinates,
    pub greeting: Option<String>,
    pub sdk_path: PathBuf,
    pub universe: Universe,
    pub build: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(bot_name: Option<&str>, citizen: Option<i32>) -> ConfigLayer {
        ConfigLayer {
            bot_name: bot_name.map(str::to_string),
            citizen_number: citizen,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_layer_with_value_wins() {
        let config = AggregateConfig::new()
            .with_layer("cli", layer(None, Some(5)))
            .with_layer("env", layer(Some("FromEnv"), Some(6)))
            .with_layer("file", layer(Some("FromFile"), None));

        assert_eq!(config.bot_name().unwrap(), "FromEnv");
        assert_eq!(config.citizen_number().unwrap(), 5);
        assert_eq!(config.origins().collect::<Vec<_>>(), vec!["cli", "env", "file"]);
    }

    #[test]
    fn test_missing_value_names_the_field() {
        let config = AggregateConfig::new().with_layer("cli", layer(Some("Bot"), None));
        let err = config.citizen_number().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("citizen number")));
        assert_eq!(err.to_string(), "no configuration source has a citizen number");
    }

    #[test]
    fn test_defaults() {
        let config = AggregateConfig::new();
        assert_eq!(config.universe(), Universe::default());
        assert_eq!(config.build(), AW_BUILD);
        assert_eq!(config.sdk_path(), PathBuf::from("aw64.dll"));
        assert_eq!(config.greeting(), None);
    }

    #[test]
    fn test_env_vars() {
        let layer = ConfigLayer::from_vars([
            ("KORTH_BOT_NAME", "Envy"),
            ("KORTH_CITIZEN", "not a number"),
            ("KORTH_COORDS", "100,0,-200,450"),
            ("KORTH_PORT", "5670"),
            ("HOME", "/root"),
        ]);
        assert_eq!(layer.bot_name.as_deref(), Some("Envy"));
        assert_eq!(layer.citizen_number, None);
        assert_eq!(
            layer.world_coordinates,
            Some(Coordinates::new(100, 0, -200).with_yaw(450))
        );
        assert_eq!(layer.universe_port, Some(5670));
    }

    #[test]
    fn test_unparsable_env_value_falls_through() {
        let config = AggregateConfig::new()
            .with_layer("env", ConfigLayer::from_vars([("KORTH_CITIZEN", "abc")]))
            .with_layer("file", layer(None, Some(99)));
        assert_eq!(config.citizen_number().unwrap(), 99);
    }

    #[test]
    fn test_resolve_complete_config() {
        let config = AggregateConfig::new().with_layer("file", ConfigLayer::template());
        let bot = config.resolve().unwrap();
        assert_eq!(bot.bot_name, "Korth");
        assert_eq!(bot.universe.port, 6670);
        assert_eq!(bot.greeting.as_deref(), Some("Hello!"));
    }
}
