//! Environment configuration for devmentor: `.env` loading plus typed
//! [`Settings`].
//!
//! Precedence is **existing env > `.env`**: the dotenv crate never overrides
//! variables that are already set. Unset or unparseable values fall back to
//! documented defaults, so a bare environment still yields a working server
//! (minus the provider credential, which [`Settings::require_api_key`]
//! enforces at startup).

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set; put it in the environment or a .env file")]
    MissingApiKey,
}

/// Applies `.env` from the current directory, if present. Existing
/// environment variables win; a missing file is not an error.
pub fn load_dotenv() {
    let _ = dotenv::dotenv();
}

/// Like [`load_dotenv`] but reads `<dir>/.env`. Used by tests.
pub fn load_dotenv_from(dir: &Path) {
    let _ = dotenv::from_path(dir.join(".env"));
}

/// Typed settings for the gateway and server.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port.
    pub port: u16,
    /// Provider credential; optional here, required at server startup.
    pub api_key: Option<String>,
    /// Provider base URL.
    pub base_url: String,
    /// Model name sent to the provider.
    pub model: String,
    /// Deadline for one model call.
    pub timeout: Duration,
    /// Cap on pass-through response text, in characters.
    pub max_output_chars: usize,
    /// Directory holding the prebuilt single-page app.
    pub static_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 5000,
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_millis(30_000),
            max_output_chars: 8000,
            static_dir: PathBuf::from("client/build"),
        }
    }
}

impl Settings {
    /// Reads settings from the environment, falling back to [`Default`] for
    /// unset or invalid values.
    ///
    /// - `PORT` (default 5000)
    /// - `OPENAI_API_KEY` (no default)
    /// - `OPENAI_BASE_URL` (default `https://api.openai.com/v1`)
    /// - `OPENAI_MODEL` (default `gpt-4o-mini`)
    /// - `DEVMENTOR_TIMEOUT_MS` (default 30000)
    /// - `DEVMENTOR_MAX_OUTPUT_CHARS` (default 8000)
    /// - `STATIC_DIR` (default `client/build`)
    pub fn from_env() -> Self {
        let default = Settings::default();
        Settings {
            port: env_parse("PORT").unwrap_or(default.port),
            api_key: env_nonempty("OPENAI_API_KEY"),
            base_url: env_nonempty("OPENAI_BASE_URL").unwrap_or(default.base_url),
            model: env_nonempty("OPENAI_MODEL").unwrap_or(default.model),
            timeout: env_parse::<u64>("DEVMENTOR_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.timeout),
            max_output_chars: env_parse("DEVMENTOR_MAX_OUTPUT_CHARS")
                .unwrap_or(default.max_output_chars),
            static_dir: env_nonempty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.static_dir),
        }
    }

    /// Returns the provider credential, failing loudly when it is absent so
    /// the process does not start half-configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
