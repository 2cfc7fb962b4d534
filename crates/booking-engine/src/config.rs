//! Client configuration file support.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! api_base_url = "https://api.tutorbook.example/v1"
//! request_timeout_secs = 15
//! display_timezone = "Europe/London"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "TUTORBOOK_API_URL";

/// File name searched for by [`ClientConfig::from_default_location`].
pub const DEFAULT_CONFIG_FILE: &str = "tutorbook.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// IANA zone used to show session times to the student.
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_display_timezone() -> String {
    "UTC".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            display_timezone: default_display_timezone(),
        }
    }
}

impl ClientConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| BookingError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BookingError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `tutorbook.toml` from the current directory, falling back to
    /// defaults when it does not exist. The environment override is applied
    /// either way.
    pub fn from_default_location() -> Result<Self> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        let config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Replace the base URL when an override is given and non-blank.
    pub fn with_env_override(mut self, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
            self.validate()?;
        }
        Ok(self)
    }

    /// The display timezone as a parsed zone.
    pub fn timezone(&self) -> Result<Tz> {
        self.display_timezone
            .parse::<Tz>()
            .map_err(|_| BookingError::Config(format!("Invalid timezone '{}'", self.display_timezone)))
    }

    fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BookingError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(BookingError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        self.timezone()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_with_defaults() {
        let config = ClientConfig::from_toml_str(r#"api_base_url = "https://api.example""#).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.display_timezone, "UTC");
        assert_eq!(config.timezone().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_parse_full() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://api.example/v1"
            request_timeout_secs = 5
            display_timezone = "Europe/London"
            "#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::London);
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in [
            r#"api_base_url = "ftp://x""#,
            "api_base_url = \"https://x\"\nrequest_timeout_secs = 0",
            "api_base_url = \"https://x\"\ndisplay_timezone = \"Mars/Olympus\"",
            "request_timeout_secs = 5",
        ] {
            let err = ClientConfig::from_toml_str(bad).unwrap_err().to_string();
            assert!(err.contains("Configuration error"), "{bad}: got {err}");
        }
    }

    #[test]
    fn test_env_override() {
        let config = ClientConfig::default()
            .with_env_override(Some("https://staging.example".into()))
            .unwrap();
        assert_eq!(config.api_base_url, "https://staging.example");

        let unchanged = ClientConfig::default()
            .with_env_override(Some("  ".into()))
            .unwrap();
        assert_eq!(unchanged, ClientConfig::default());

        assert!(ClientConfig::default()
            .with_env_override(Some("not a url".into()))
            .is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"api_base_url = "https://file.example""#).unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_base_url, "https://file.example");

        let err = ClientConfig::from_file("/nonexistent/tutorbook.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
