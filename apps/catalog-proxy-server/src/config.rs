//! Layered application configuration.
//!
//! Precedence, lowest first: compiled defaults, YAML file, `APP__*`
//! environment, the legacy variable names of the original deployment
//! (`WALMART_SEARCH_API_URL`, `WALMART_CONSUMER_ID`, `PRIVATE_KEY_PATH`,
//! `PORT`), and finally CLI overrides applied by `main`.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use product_search::ProductSearchConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3111;

const LEGACY_UPSTREAM_URL: &str = "WALMART_SEARCH_API_URL";
const LEGACY_CONSUMER_ID: &str = "WALMART_CONSUMER_ID";
const LEGACY_KEY_PATH: &str = "PRIVATE_KEY_PATH";
const LEGACY_PORT: &str = "PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub product_search: ProductSearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Serve the OpenAPI document at `/api/openapi.json`.
    pub enable_docs: bool,
    /// Ceiling for a whole inbound request in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            enable_docs: true,
            request_timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Deserialize)]
struct LegacyPort {
    port: Option<u16>,
}

impl AppConfig {
    /// Load defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    /// Returns a figment error for malformed YAML, unknown keys or values of
    /// the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let mut config: Self = figment
            .merge(Env::prefixed("APP__").split("__"))
            .merge(legacy_env())
            .extract()?;

        let legacy: LegacyPort = Figment::from(Env::raw().only(&[LEGACY_PORT])).extract()?;
        if let Some(port) = legacy.port {
            config.server.bind_addr.set_port(port);
        }

        Ok(config)
    }

    /// Apply `--port` and `-v` overrides.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
        }
        match verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// Effective configuration rendered for `--print-config` and `check`.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn legacy_env() -> Env {
    Env::raw()
        .only(&[LEGACY_UPSTREAM_URL, LEGACY_CONSUMER_ID, LEGACY_KEY_PATH])
        .map(|key| {
            if key == LEGACY_UPSTREAM_URL {
                "product_search.upstream_url".into()
            } else if key == LEGACY_CONSUMER_ID {
                "product_search.consumer_id".into()
            } else {
                "product_search.private_key_path".into()
            }
        })
}
