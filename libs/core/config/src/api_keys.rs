use crate::{ConfigError, FromEnv, env_list, split_list};

/// Keys accepted when `VALID_API_KEYS` is not set.
pub const DEFAULT_API_KEYS: [&str; 3] = ["plushies-123", "stuffies-456", "admin-789"];

/// Static allow-list of API keys for write endpoints
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKeyConfig {
    pub keys: Vec<String>,
}

impl ApiKeyConfig {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated key list. Entries are trimmed and blanks dropped.
    pub fn parse(raw: &str) -> Self {
        Self::new(split_list(raw))
    }
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEYS)
    }
}

impl FromEnv for ApiKeyConfig {
    /// Reads `VALID_API_KEYS`, falling back to [`DEFAULT_API_KEYS`].
    ///
    /// A set-but-empty variable yields an empty list: every protected
    /// request is then rejected.
    fn from_env() -> Result<Self, ConfigError> {
        let config = env_list("VALID_API_KEYS").map_or_else(Self::default, Self::new);

        if config.keys.is_empty() {
            tracing::warn!("VALID_API_KEYS is set but contains no keys; write endpoints are locked");
        }

        Ok(config)
    }
}
