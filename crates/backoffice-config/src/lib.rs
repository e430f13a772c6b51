//! Shared configuration for admin console front ends.
//!
//! TOML settings with environment overrides, keyring-backed bearer
//! credentials, logging setup, and translation to
//! `backoffice_core::ConsoleConfig`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use backoffice_api::{AUTH_TOKEN_KEY, CredentialProvider, TlsMode, TransportConfig};
use backoffice_core::{Console, ConsoleConfig, DEFAULT_API_URL};

/// Prefix for environment overrides (`BACKOFFICE_API_URL`, ...).
pub const ENV_PREFIX: &str = "BACKOFFICE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store error: {0}")]
    Credential(#[from] keyring::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// API root, e.g. "http://localhost:5000/api".
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout. Unset keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,

    /// Accept any TLS certificate.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Keyring service holding the bearer token.
    #[serde(default = "default_credential_service")]
    pub credential_service: String,

    /// Keyring entry name holding the bearer token.
    #[serde(default = "default_credential_key")]
    pub credential_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: None,
            insecure: false,
            ca_cert: None,
            credential_service: default_credential_service(),
            credential_key: default_credential_key(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_credential_service() -> String {
    "backoffice".into()
}
fn default_credential_key() -> String {
    AUTH_TOKEN_KEY.into()
}

impl Settings {
    /// Validate and translate into the core crate's config.
    pub fn to_console_config(&self) -> Result<ConsoleConfig, ConfigError> {
        let api_url: url::Url = self.api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", self.api_url),
        })?;

        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        Ok(ConsoleConfig::new(api_url).with_transport(TransportConfig {
            tls,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }))
    }

    /// Keyring-backed credentials for these settings.
    pub fn credentials(&self) -> KeyringCredentials {
        KeyringCredentials::new(&self.credential_service, &self.credential_key)
    }

    /// Build a `Console` authenticated from the keyring.
    pub fn build_console(&self) -> Result<Console, ConfigError> {
        let config = self.to_console_config()?;
        Console::new(&config, Arc::new(self.credentials())).map_err(|e| ConfigError::Validation {
            field: "transport".into(),
            reason: e.to_string(),
        })
    }
}

// ── Settings file path ──────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "backoffice", "backoffice").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("backoffice");
    p
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load settings from the canonical file + environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path())
}

/// Defaults, then `path` (a missing file is skipped), then `BACKOFFICE_*`
/// environment variables.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    debug!(path = %path.display(), "loading settings");
    let settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;
    Ok(settings)
}

/// Serialize settings to TOML and write them to `path`.
pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}

// ── Keyring credentials ─────────────────────────────────────────────

/// Bearer token read from the OS keyring on every request, so a login or
/// logout elsewhere takes effect on the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyringCredentials {
    service: String,
    key: String,
}

impl KeyringCredentials {
    pub fn new(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    pub fn store_token(&self, token: &SecretString) -> Result<(), ConfigError> {
        self.entry()?.set_password(token.expose_secret())?;
        Ok(())
    }

    /// Remove the stored token. Succeeds when there was none.
    pub fn clear_token(&self) -> Result<(), ConfigError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(&self.service, &self.key)
    }
}

impl CredentialProvider for KeyringCredentials {
    fn bearer_token(&self) -> Option<SecretString> {
        // Any keyring failure means an anonymous request.
        let secret = self.entry().ok()?.get_password().ok()?;
        Some(SecretString::from(secret))
    }
}

// ── Logging ─────────────────────────────────────────────────────────

/// Install a `fmt` subscriber. `RUST_LOG` wins over `verbosity`.
/// A second call is a no-op.
pub fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|_| {
            let settings = load_settings_from(Path::new("absent.toml")).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.api_url, "http://localhost:5000/api");
            assert_eq!(settings.credential_key, "token");
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "api_url = \"https://shop.example.com/api\"\ntimeout_secs = 15\n",
            )?;

            let settings = load_settings_from(Path::new("config.toml")).unwrap();
            assert_eq!(settings.api_url, "https://shop.example.com/api");
            assert_eq!(settings.timeout_secs, Some(15));
            assert!(!settings.insecure);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_and_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "api_url = \"https://shop.example.com/api\"\ntimeout_secs = 15\n",
            )?;
            jail.set_env("BACKOFFICE_API_URL", "https://staging.example.com/api");
            jail.set_env("BACKOFFICE_INSECURE", "true");

            let settings = load_settings_from(Path::new("config.toml")).unwrap();
            assert_eq!(settings.api_url, "https://staging.example.com/api");
            assert_eq!(settings.timeout_secs, Some(15));
            assert!(settings.insecure);
            Ok(())
        });
    }

    #[test]
    fn env_alone_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BACKOFFICE_API_URL", "http://10.0.0.2:5000/api");

            let settings = load_settings_from(Path::new("absent.toml")).unwrap();
            let config = settings.to_console_config().unwrap();
            assert_eq!(config.api_url.as_str(), "http://10.0.0.2:5000/api");
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_a_figment_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "timeout_secs = \"soon\"\n")?;

            assert!(matches!(
                load_settings_from(Path::new("config.toml")),
                Err(ConfigError::Figment(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn save_then_load() {
        figment::Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("config.toml");
            let settings = Settings {
                insecure: true,
                ..Settings::default()
            };

            save_settings_to(&settings, &path).unwrap();
            assert_eq!(load_settings_from(&path).unwrap(), settings);
            Ok(())
        });
    }

    #[test]
    fn console_config_maps_tls_and_timeout() {
        let settings = Settings {
            timeout_secs: Some(5),
            ca_cert: Some(PathBuf::from("/etc/ssl/shop.pem")),
            ..Settings::default()
        };
        let config = settings.to_console_config().unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.transport.timeout, Some(Duration::from_secs(5)));
        assert!(matches!(config.transport.tls, TlsMode::CustomCa(_)));
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let settings = Settings {
            insecure: true,
            ca_cert: Some(PathBuf::from("/etc/ssl/shop.pem")),
            ..Settings::default()
        };
        let config = settings.to_console_config().unwrap();
        assert!(matches!(config.transport.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn invalid_url_names_the_field() {
        let settings = Settings {
            api_url: "not a url".into(),
            ..Settings::default()
        };
        let err = settings.to_console_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing(0);
        init_tracing(3);
    }
}
