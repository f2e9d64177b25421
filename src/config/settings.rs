//! User settings for ledgerdesk
//!
//! Manages which backend the client talks to, the development user header,
//! the locale, and list defaults (page size, search debounce).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::locale::Locale;
use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::EconomicGroupId;

/// Environment variable selecting the remote API base URL
pub const API_URL_ENV: &str = "LEDGERDESK_API_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Static user attached as `x-user-id` by development builds
pub const DEV_USER_ID: &str = "dev-user";

/// Which backend the API client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process backend persisting JSON files under the data directory
    #[default]
    Local,
    /// Remote REST API over HTTP
    Remote,
}

impl BackendKind {
    /// Parse a backend kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "remote" | "http" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// User settings for ledgerdesk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backend selection
    #[serde(default)]
    pub backend: BackendKind,

    /// Remote API base URL (overridden by `LEDGERDESK_API_URL`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// User id sent as `x-user-id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Display locale
    #[serde(default)]
    pub locale: Locale,

    /// Default page size for lists
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Search debounce settle time in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Economic group applied to group-scoped lists when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_group: Option<EconomicGroupId>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

fn default_search_debounce_ms() -> u64 {
    400
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: BackendKind::default(),
            api_url: None,
            user_id: None,
            locale: Locale::default(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            economic_group: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Resolve the remote base URL: environment first, then settings, then default
    pub fn resolved_api_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// The user id to attach to requests
    ///
    /// A configured id always wins; debug builds fall back to a static
    /// development user.
    pub fn effective_user_id(&self) -> Option<String> {
        match &self.user_id {
            Some(id) => Some(id.clone()),
            None if cfg!(debug_assertions) => Some(DEV_USER_ID.to_string()),
            None => None,
        }
    }

    /// Search debounce as a duration
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend, BackendKind::Local);
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.search_debounce(), Duration::from_millis(400));
        assert_eq!(settings.locale, Locale::En);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.backend = BackendKind::Remote;
        settings.api_url = Some("https://books.example.com".into());
        settings.locale = Locale::Es;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backend, BackendKind::Remote);
        assert_eq!(loaded.api_url.as_deref(), Some("https://books.example.com"));
        assert_eq!(loaded.locale, Locale::Es);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"backend":"remote"}"#).unwrap();
        assert_eq!(settings.backend, BackendKind::Remote);
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.search_debounce_ms, 400);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_configured_user_id_wins() {
        let mut settings = Settings::default();
        settings.user_id = Some("maria".into());
        assert_eq!(settings.effective_user_id().as_deref(), Some("maria"));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("local"), Some(BackendKind::Local));
        assert_eq!(BackendKind::parse("HTTP"), Some(BackendKind::Remote));
        assert_eq!(BackendKind::parse("ftp"), None);
    }
}
