// ── Console configuration ──

use backoffice_api::TransportConfig;
use url::Url;

use crate::error::CoreError;

/// Base URL used when nothing overrides it.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Everything needed to reach the backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root; resources live at `{api_url}/contact`, `/coupons`, ...
    pub api_url: Url,
    pub transport: TransportConfig,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            transport: TransportConfig::default(),
        }
    }

    /// Parse `raw` as the API root.
    pub fn from_url_str(raw: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{raw}': {e}"),
        })?;
        Ok(Self::new(api_url))
    }

    /// The local development default.
    pub fn local() -> Result<Self, CoreError> {
        Self::from_url_str(DEFAULT_API_URL)
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
