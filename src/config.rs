//! Server configuration module.
//!
//! Handles loading, validating, and layering the server configuration. Values
//! are resolved in this order, later layers overriding earlier ones:
//!
//! 1. Stock defaults ([`ServerConfig::default`])
//! 2. `config.toml` (or the file given with `--config`)
//! 3. Environment variables (`MEMORY_GAME_*`)
//! 4. Command-line flags (`--root`, `--port`)
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! collections_root = "collections"  # Directory holding one folder per collection
//!
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8000
//! # public_base_url = "https://cards.example.com"  # Prefix for URLs in responses
//!
//! [cors]
//! allowed_origins = []      # Extra origins; localhost is always allowed
//!
//! [logging]
//! level = "info"            # tracing EnvFilter directive; RUST_LOG wins when set
//! format = "pretty"         # "pretty" or "json"
//! ```
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `MEMORY_GAME_ROOT` | Replaces `collections_root` |
//! | `MEMORY_GAME_PORT` | Replaces `server.port` |
//! | `MEMORY_GAME_ALLOWED_ORIGINS` | Comma-separated origins, appended to `cors.allowed_origins` |
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_ROOT: &str = "MEMORY_GAME_ROOT";
pub const ENV_PORT: &str = "MEMORY_GAME_PORT";
pub const ENV_ALLOWED_ORIGINS: &str = "MEMORY_GAME_ALLOWED_ORIGINS";

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration.
///
/// All fields have sensible defaults. Config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory holding one subdirectory per collection.
    pub collections_root: PathBuf,
    /// Listener settings.
    pub server: ListenConfig,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Log filter and output format.
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            collections_root: PathBuf::from("collections"),
            server: ListenConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    /// IP address to bind.
    pub bind_addr: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Scheme and host used for URLs in responses. When absent, URLs are built
    /// from the request's `Host` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
            public_base_url: None,
        }
    }
}

/// Cross-origin settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins allowed in addition to `http(s)://localhost` and `127.0.0.1`.
    pub allowed_origins: Vec<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"memory_game=debug"`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collections_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "collections_root must not be empty".into(),
            ));
        }
        self.server.bind_addr.parse::<IpAddr>().map_err(|e| {
            ConfigError::Validation(format!(
                "server.bind_addr '{}' is not an IP address: {e}",
                self.server.bind_addr
            ))
        })?;
        if let Some(url) = &self.server.public_base_url
            && !is_http_url(url)
        {
            return Err(ConfigError::Validation(format!(
                "server.public_base_url '{url}' must start with http:// or https://"
            )));
        }
        if let Some(origin) = self
            .cors
            .allowed_origins
            .iter()
            .find(|o| !is_http_url(normalize_origin(o)))
        {
            return Err(ConfigError::Validation(format!(
                "cors.allowed_origins entry '{origin}' must start with http:// or https://"
            )));
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.level).map_err(|e| {
            ConfigError::Validation(format!(
                "logging.level '{}' is not a valid filter: {e}",
                self.logging.level
            ))
        })?;
        Ok(())
    }

    /// Apply `MEMORY_GAME_*` overrides read through `lookup`.
    ///
    /// Takes a lookup function rather than reading the process environment so
    /// callers (and tests) control the source.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(root) = lookup(ENV_ROOT).filter(|v| !v.trim().is_empty()) {
            self.collections_root = PathBuf::from(root.trim());
        }
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|e| {
                ConfigError::Validation(format!("{ENV_PORT} '{port}' is not a valid port: {e}"))
            })?;
        }
        if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
            self.cors.allowed_origins.extend(parse_origin_list(&origins));
        }
        Ok(())
    }

    /// The socket address to bind to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.bind_addr.parse().map_err(|e| {
            ConfigError::Validation(format!("invalid bind address: {e}"))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize_origin)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

/// An origin as browsers send it: no surrounding whitespace, no trailing `/`.
pub fn normalize_origin(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ServerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto the stock defaults, then deserialize.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    Ok(config)
}

/// Load the file layer of the configuration.
///
/// An explicit `path` must exist. Without one, `config.toml` in the working
/// directory is used when present, stock defaults otherwise. The result is
/// not validated yet: environment and CLI layers still apply.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                Some(load_raw_config(default_path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Memory Game Server Configuration
# ================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Precedence: defaults < this file < MEMORY_GAME_* environment < CLI flags.
# Unknown keys will cause an error.

# Directory holding one subdirectory per collection.
# Overridden by MEMORY_GAME_ROOT.
collections_root = "collections"

# ---------------------------------------------------------------------------
# Listener
# ---------------------------------------------------------------------------
[server]
bind_addr = "0.0.0.0"

# Overridden by MEMORY_GAME_PORT.
port = 8000

# Scheme and host used for icon, pair and image URLs in responses.
# When unset, URLs are built from the request's Host header.
# public_base_url = "https://cards.example.com"

# ---------------------------------------------------------------------------
# Cross-origin requests
# ---------------------------------------------------------------------------
[cors]
# Origins allowed to call the API from a browser, in addition to
# http(s)://localhost and http(s)://127.0.0.1 on any port.
# MEMORY_GAME_ALLOWED_ORIGINS (comma-separated) is appended to this list.
allowed_origins = []

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# tracing filter directive, e.g. "debug" or "memory_game=debug,tower_http=info".
# RUST_LOG takes precedence when set.
level = "info"

# "pretty" for humans, "json" for log collectors.
format = "pretty"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_values() {
        let config = ServerConfig::default();
        assert_eq!(config.collections_root, PathBuf::from("collections"));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert!(config.server.public_base_url.is_none());
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.logging.format, LogFormat::Pretty);
        config.validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
port = 9000
"#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        // Defaults preserved
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.collections_root, PathBuf::from("collections"));
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
collections_root = "/srv/cards"

[server]
bind_addr = "127.0.0.1"
port = 8080
public_base_url = "https://cards.example.com"

[cors]
allowed_origins = ["https://game.example.com"]

[logging]
level = "debug"
format = "json"
"#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.collections_root, PathBuf::from("/srv/cards"));
        assert_eq!(
            config.server.public_base_url.as_deref(),
            Some("https://cards.example.com")
        );
        assert_eq!(config.cors.allowed_origins, vec!["https://game.example.com"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        config.validate().unwrap();
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ServerConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_config_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("server.toml");
        fs::write(&path, "collections_root = \"cards\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.collections_root, PathBuf::from("cards"));
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn load_config_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = resolve_config(Some(toml::from_str("[server]\nprot = 1\n").unwrap()));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str("[servr]\nport = 1\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_preserves_base_keys() {
        let overlay: toml::Value = toml::from_str("[server]\nport = 1234\n").unwrap();
        let merged = merge_toml(stock_defaults_value(), overlay);
        let server = merged.get("server").unwrap();
        assert_eq!(server.get("port").unwrap().as_integer(), Some(1234));
        assert_eq!(server.get("bind_addr").unwrap().as_str(), Some("0.0.0.0"));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("[cors]\nallowed_origins = [\"http://a\"]\n").unwrap();
        let overlay: toml::Value =
            toml::from_str("[cors]\nallowed_origins = [\"http://b\"]\n").unwrap();
        let merged = merge_toml(base, overlay);
        let origins = merged["cors"]["allowed_origins"].as_array().unwrap();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].as_str(), Some("http://b"));
    }

    // =========================================================================
    // Environment overrides
    // =========================================================================

    #[test]
    fn env_overrides_root_and_port() {
        let mut config = ServerConfig::default();
        config
            .apply_env_overrides(env(&[(ENV_ROOT, "/data/cards"), (ENV_PORT, " 9100 ")]))
            .unwrap();
        assert_eq!(config.collections_root, PathBuf::from("/data/cards"));
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn normalize_origin_strips_whitespace_and_slash() {
        assert_eq!(normalize_origin(" https://a.example/ "), "https://a.example");
        assert_eq!(normalize_origin("http://b.example:3000"), "http://b.example:3000");
    }

    #[test]
    fn validate_accepts_origin_with_trailing_slash() {
        let mut config = ServerConfig::default();
        config.cors.allowed_origins = vec!["https://a.example/".to_string()];
        config.validate().unwrap();
    }

    #[test]
    fn env_origins_are_appended() {
        let mut config = ServerConfig::default();
        config.cors.allowed_origins = vec!["https://a.example".to_string()];
        config
            .apply_env_overrides(env(&[(
                ENV_ALLOWED_ORIGINS,
                " https://b.example/ , ,http://c.example:3000",
            )]))
            .unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example", "http://c.example:3000"]
        );
    }

    #[test]
    fn env_invalid_port_is_error() {
        let mut config = ServerConfig::default();
        let result = config.apply_env_overrides(env(&[(ENV_PORT, "eighty")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn env_absent_changes_nothing() {
        let mut config = ServerConfig::default();
        config.apply_env_overrides(env(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_bad_bind_addr() {
        let mut config = ServerConfig::default();
        config.server.bind_addr = "localhost".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_origin_without_scheme() {
        let mut config = ServerConfig::default();
        config.cors.allowed_origins = vec!["example.com".to_string()];
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("example.com"));
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = ServerConfig::default();
        config.server.public_base_url = Some("cards.example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_root() {
        let mut config = ServerConfig::default();
        config.collections_root = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn socket_addr_supports_ipv6() {
        let mut config = ServerConfig::default();
        config.server.bind_addr = "::1".to_string();
        config.server.port = 8123;
        let addr = config.socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8123);
    }
}
