//! Configuration module for SiteSage
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The loaded [`Config`] is passed explicitly to the components that need it;
//! there is no process-wide settings object.
//!
//! # Example
//!
//! ```no_run
//! use sitesage::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitesage.toml")).unwrap();
//! println!("Fetch timeout: {}s", config.fetch.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, InsightsConfig, OutputConfig, ServerConfig, DEFAULT_INSIGHTS_ENDPOINT,
    DEFAULT_MODEL_NAME, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
    load_default_config, API_KEY_ENV_VAR, MODEL_NAME_ENV_VAR,
};
pub use validation::validate;
