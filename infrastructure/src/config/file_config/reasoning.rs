//! Reasoning backend configuration from TOML (`[reasoning]` section)

use serde::{Deserialize, Serialize};

/// Raw reasoning backend configuration from TOML
///
/// # Example
///
/// ```toml
/// [reasoning]
/// provider = "gemini"
/// model = "gemini-2.0-flash"
/// api_key_env = "GEMINI_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Backend provider; only "gemini" is implemented
    pub provider: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Override for the API base URL
    pub base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
            request_timeout_secs: 60,
        }
    }
}

impl FileReasoningConfig {
    pub fn api_key_present(&self) -> bool {
        std::env::var(&self.api_key_env).is_ok_and(|v| !v.trim().is_empty())
    }
}
