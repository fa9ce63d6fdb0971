//! Server configuration from environment variables

use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0:6574";
pub const DEFAULT_DATA_ROOT: &str = "data";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("No streamer specified. Add a streamer name, e.g. ?name=yourstreamer")]
    MissingStreamer,

    #[error("Invalid streamer name: {0:?}")]
    InvalidStreamer(String),

    #[error("Invalid bind address {value:?}: {reason}")]
    InvalidBind { value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory or base URL holding one folder per streamer
    pub data_root: String,
    pub static_dir: String,
    /// Used when a client connects without a `name` parameter
    pub default_streamer: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 6574)),
            data_root: DEFAULT_DATA_ROOT.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            default_streamer: None,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ServerConfig {
    /// Load config from environment variables
    /// CHATGUESS_BIND, CHATGUESS_DATA_ROOT, CHATGUESS_STATIC_DIR, CHATGUESS_DEFAULT_STREAMER
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_value = env_non_empty("CHATGUESS_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind = bind_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBind {
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let default_streamer = match env_non_empty("CHATGUESS_DEFAULT_STREAMER") {
            Some(name) => Some(validate_streamer(&name)?.to_string()),
            None => None,
        };

        Ok(Self {
            bind,
            data_root: env_non_empty("CHATGUESS_DATA_ROOT")
                .unwrap_or_else(|| DEFAULT_DATA_ROOT.into()),
            static_dir: env_non_empty("CHATGUESS_STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
            default_streamer,
        })
    }

    /// Resolve the streamer for a connection: the request's name, else the configured default
    pub fn resolve_streamer<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Result<&'a str, ConfigError> {
        let name = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(self.default_streamer.as_deref())
            .ok_or(ConfigError::MissingStreamer)?;
        validate_streamer(name)
    }
}

/// A streamer name is used verbatim as a path or URL segment, so only
/// ASCII letters, digits, `_` and `-` are allowed
pub fn validate_streamer(name: &str) -> Result<&str, ConfigError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::MissingStreamer);
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if !name.chars().all(allowed) {
        return Err(ConfigError::InvalidStreamer(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "CHATGUESS_BIND",
            "CHATGUESS_DATA_ROOT",
            "CHATGUESS_STATIC_DIR",
            "CHATGUESS_DEFAULT_STREAMER",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_root, "data");
        assert_eq!(config.static_dir, "static");
        assert!(config.default_streamer.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("CHATGUESS_BIND", "127.0.0.1:9000");
        std::env::set_var("CHATGUESS_DATA_ROOT", "https://cdn.example.com/chat");
        std::env::set_var("CHATGUESS_DEFAULT_STREAMER", " somestreamer ");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_root, "https://cdn.example.com/chat");
        assert_eq!(config.default_streamer.as_deref(), Some("somestreamer"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_bind() {
        clear_env();
        std::env::set_var("CHATGUESS_BIND", "not an address");

        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidBind { .. })));
        clear_env();
    }

    #[test]
    fn test_resolve_streamer() {
        let config = ServerConfig::default();
        assert_eq!(config.resolve_streamer(Some("alice")), Ok("alice"));
        assert_eq!(config.resolve_streamer(None), Err(ConfigError::MissingStreamer));
        assert_eq!(config.resolve_streamer(Some("  ")), Err(ConfigError::MissingStreamer));

        let config = ServerConfig {
            default_streamer: Some("fallback".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(config.resolve_streamer(None), Ok("fallback"));
        assert_eq!(config.resolve_streamer(Some("alice")), Ok("alice"));
    }

    #[test]
    fn test_validate_streamer_rejects_paths() {
        assert!(validate_streamer("../etc").is_err());
        assert!(validate_streamer("a/b").is_err());
        assert!(validate_streamer("a\\b").is_err());
        assert_eq!(validate_streamer(" bob "), Ok("bob"));
        assert_eq!(validate_streamer("Some_Streamer-42"), Ok("Some_Streamer-42"));
    }

    #[test]
    fn test_validate_streamer_rejects_url_syntax() {
        // Percent-encoded dots resolve to a parent segment once placed in a URL
        for name in ["%2e%2e", "%2E%2E", ".", "a?b", "a#b", "a%2fb", "a b", "bob.csv"] {
            assert_eq!(
                validate_streamer(name),
                Err(ConfigError::InvalidStreamer(name.to_string())),
                "{:?} should be rejected",
                name
            );
        }

        let config = ServerConfig::default();
        assert!(config.resolve_streamer(Some("%2e%2e")).is_err());
    }
}
