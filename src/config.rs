//! Layered configuration: built-in defaults, then a TOML file, then
//! `GLOBE_`-prefixed environment variables (`GLOBE_SERVER__BIND=...`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{PrmError, PrmResult};
use crate::model::GeoPoint;
use crate::queries::map_queries::ClusterOptions;

const APP_DIR_NAME: &str = "globe";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "globe.toml";
const ENV_PREFIX: &str = "GLOBE_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_center: GeoPoint,
    pub default_zoom: u8,
    /// Cluster radius in pixels.
    pub cluster_radius: f64,
    pub cluster_max_zoom: u8,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".data").join("globe.db"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // San Francisco
            default_center: GeoPoint::new(37.7749, -122.4194),
            default_zoom: 11,
            cluster_radius: 50.0,
            cluster_max_zoom: 14,
        }
    }
}

impl Config {
    /// Loads from `config_path` when given, else `globe.toml` in the working
    /// directory, else the per-user config directory. A missing file is not
    /// an error.
    pub fn load_from(config_path: Option<&Path>) -> PrmResult<Self> {
        let config_file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn default_config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn validate(&self) -> PrmResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(invalid("database.path cannot be empty"));
        }
        self.bind_addr()?;
        let center = self.map.default_center;
        if crate::validation::geo_point(center).is_err() {
            return Err(invalid(format!(
                "map.default_center out of range: {}, {}",
                center.lat, center.lng
            )));
        }
        if !(self.map.cluster_radius.is_finite() && self.map.cluster_radius > 0.0) {
            return Err(invalid("map.cluster_radius must be greater than 0"));
        }
        if self.map.cluster_max_zoom > 24 || self.map.default_zoom > 24 {
            return Err(invalid("map zoom levels must be at most 24"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> PrmResult<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| invalid(format!("server.bind is not a socket address: {}", self.server.bind)))
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions {
            radius: self.map.cluster_radius,
            max_zoom: self.map.cluster_max_zoom,
            ..ClusterOptions::default()
        }
    }
}

fn invalid(message: impl Into<String>) -> PrmError {
    PrmError::InvalidConfig {
        message: message.into(),
    }
}
