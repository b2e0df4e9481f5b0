use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that overrides `insights.api-key`
pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable that overrides `insights.model-name`
pub const MODEL_NAME_ENV_VAR: &str = "MODEL_NAME";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied after parsing and before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Builds the default configuration when no file is given
///
/// Environment overrides still apply.
pub fn load_default_config() -> Result<Config, ConfigError> {
    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Applies environment overrides to a configuration
///
/// `lookup` resolves an environment variable name to its value. Blank values
/// are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(key) = non_blank(API_KEY_ENV_VAR) {
        config.insights.api_key = Some(key);
    }

    if let Some(model) = non_blank(MODEL_NAME_ENV_VAR) {
        config.insights.model_name = model;
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at startup so runs can be matched to the configuration
/// they used.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[fetch]
timeout-secs = 15
user-agent = "TestAgent/1.0"

[insights]
api-key = "secret"
model-name = "gemini-test"
timeout-secs = 20

[output]
database-path = "./test.db"
reports-dir = "./out"

[server]
bind = "0.0.0.0:9000"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.fetch.user_agent, "TestAgent/1.0");
        assert_eq!(config.insights.model_name, "gemini-test");
        assert_eq!(config.output.database_path, "./test.db");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config: Config = toml::from_str(&std::fs::read_to_string(file.path()).unwrap())
            .unwrap();

        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.max_redirects, 10);
        assert_eq!(config.insights.model_name, "gemini-2.5-flash");
        assert_eq!(config.insights.timeout_secs, 60);
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert!(config.insights.api_key.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[fetch]\ntimeout-secs = 5\n").unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.user_agent, "Mozilla/5.0 (compatible; SiteSage/1.0)");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/sitesage.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[fetch]\ntimeout-secs = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| match key {
            "GOOGLE_API_KEY" => Some("from-env".to_string()),
            "MODEL_NAME" => Some("gemini-env".to_string()),
            _ => None,
        });
        assert_eq!(config.insights.api_key(), Some("from-env"));
        assert_eq!(config.insights.model_name, "gemini-env");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.insights.api_key = Some("from-file".to_string());
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.insights.api_key(), Some("from-file"));
        assert_eq!(config.insights.model_name, "gemini-2.5-flash");
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
