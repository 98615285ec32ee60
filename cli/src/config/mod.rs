//! Configuration management for the BMI calculator terminal host
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: BMI__)

use anyhow::Result;
use bmi_calculator_shared::FormConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How rendered views are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable block per render
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with BMI__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (BMI__ prefix)
            // e.g., BMI__FORM__DEBOUNCE_MS=250 sets form.debounce_ms
            .add_source(config::Environment::with_prefix("BMI").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmi_calculator_shared::RangePolicy;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.form.debounce_ms, 500);
        assert_eq!(config.form.range_policy, RangePolicy::WithBmi);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_uses_defaults() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[output]\nformat = \"json\"\n[form]\nrange_policy = \"from_height\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.form.range_policy, RangePolicy::FromHeight);
        assert_eq!(config.form.debounce_ms, 500);
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
