use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::analyzer::PayloadShape;
use crate::projection::{ProjectionConfig, DEFAULT_HIGH_PRIORITY_IMPORTANCE};

pub const DEFAULT_ANALYZER_URL: &str = "http://127.0.0.1:8000/api/v1/analyze";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client configuration loaded from environment variables (and `.env` if present).
/// Every value has a default; only malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub analyzer_url: String,
    pub analyzer_timeout: Duration,
    pub payload_shape: PayloadShape,
    pub high_priority_importance: f64,
    pub preferences_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs: u64 = parse_or(&lookup, "ANALYZER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(anyhow!("ANALYZER_TIMEOUT_SECS must be greater than zero"));
        }

        let high_priority_importance: f64 = parse_or(
            &lookup,
            "HIGH_PRIORITY_IMPORTANCE",
            DEFAULT_HIGH_PRIORITY_IMPORTANCE,
        )?;
        if !high_priority_importance.is_finite() {
            return Err(anyhow!("HIGH_PRIORITY_IMPORTANCE must be a finite number"));
        }

        let payload_shape = match lookup("ANALYZER_PAYLOAD_SHAPE") {
            Some(raw) => raw
                .parse::<PayloadShape>()
                .map_err(|e| anyhow!("ANALYZER_PAYLOAD_SHAPE: {e}"))?,
            None => PayloadShape::default(),
        };

        Ok(Config {
            analyzer_url: lookup("ANALYZER_URL").unwrap_or_else(|| DEFAULT_ANALYZER_URL.to_string()),
            analyzer_timeout: Duration::from_secs(timeout_secs),
            payload_shape,
            high_priority_importance,
            preferences_path: lookup("SCREENER_PREFERENCES")
                .map(PathBuf::from)
                .unwrap_or_else(default_preferences_path),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn projection(&self) -> ProjectionConfig {
        ProjectionConfig {
            high_priority_importance: self.high_priority_importance,
            ..ProjectionConfig::default()
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resume-screener")
        .join("preferences.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.analyzer_url, DEFAULT_ANALYZER_URL);
        assert_eq!(config.analyzer_timeout, Duration::from_secs(120));
        assert_eq!(config.payload_shape, PayloadShape::Breakdown);
        assert_eq!(config.high_priority_importance, 2.0);
        assert!(config.preferences_path.ends_with("resume-screener/preferences.toml"));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ANALYZER_URL", "http://scorer.internal/api/v1/analyze"),
            ("ANALYZER_TIMEOUT_SECS", "15"),
            ("ANALYZER_PAYLOAD_SHAPE", "legacy"),
            ("HIGH_PRIORITY_IMPORTANCE", "1"),
            ("SCREENER_PREFERENCES", "/tmp/prefs.toml"),
        ]))
        .unwrap();
        assert_eq!(config.analyzer_url, "http://scorer.internal/api/v1/analyze");
        assert_eq!(config.analyzer_timeout, Duration::from_secs(15));
        assert_eq!(config.payload_shape, PayloadShape::Legacy);
        assert_eq!(config.projection().high_priority_importance, 1.0);
        assert_eq!(config.preferences_path, PathBuf::from("/tmp/prefs.toml"));
    }

    #[test]
    fn test_invalid_timeout_is_error() {
        let err = Config::from_lookup(lookup(&[("ANALYZER_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("ANALYZER_TIMEOUT_SECS"));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        assert!(Config::from_lookup(lookup(&[("ANALYZER_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_unknown_shape_is_error() {
        let err = Config::from_lookup(lookup(&[("ANALYZER_PAYLOAD_SHAPE", "v3")])).unwrap_err();
        assert!(err.to_string().contains("ANALYZER_PAYLOAD_SHAPE"));
    }

    #[test]
    fn test_projection_keeps_default_caps() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        let projection = config.projection();
        assert_eq!(projection.missing_keyword_cap, 15);
        assert_eq!(projection.detected_keyword_cap, 20);
    }
}
