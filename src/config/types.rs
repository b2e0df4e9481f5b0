use serde::Deserialize;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; SiteSage/1.0)";
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";
pub const DEFAULT_INSIGHTS_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Main configuration structure for SiteSage
///
/// Every section is optional; a missing file section falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Page fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Overall request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of redirects followed
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// LLM insight configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    /// API key for the Gemini API; insights are skipped when unset
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Model used for `generateContent`
    #[serde(rename = "model-name", default = "default_model_name")]
    pub model_name: String,

    /// Base URL of the Gemini REST API
    #[serde(default = "default_insights_endpoint")]
    pub endpoint: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_insights_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Directory PDF reports are written to by the CLI
    #[serde(rename = "reports-dir", default = "default_reports_dir")]
    pub reports_dir: String,
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl InsightsConfig {
    /// Returns the API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: default_model_name(),
            endpoint: default_insights_endpoint(),
            timeout_secs: default_insights_timeout(),
            temperature: default_temperature(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            reports_dir: default_reports_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_redirects() -> usize {
    10
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_insights_endpoint() -> String {
    DEFAULT_INSIGHTS_ENDPOINT.to_string()
}

fn default_insights_timeout() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.7
}

fn default_database_path() -> String {
    "./sitesage.db".to_string()
}

fn default_reports_dir() -> String {
    "./reports".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
