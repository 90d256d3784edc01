//! Snapshot-building configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::namespace_info::{DEFAULT_NAMESPACE_WEIGHT, NAMESPACE_WEIGHT_KEY};
use crate::core::AppResult;

/// Environment variable overriding [`SnapshotConfig::namespace_weight_key`].
pub const ENV_NAMESPACE_WEIGHT_KEY: &str = "GANG_SCHEDULER_NAMESPACE_WEIGHT_KEY";
/// Environment variable overriding [`SnapshotConfig::default_namespace_weight`].
pub const ENV_DEFAULT_NAMESPACE_WEIGHT: &str = "GANG_SCHEDULER_DEFAULT_NAMESPACE_WEIGHT";
/// Environment variable overriding [`SnapshotConfig::skip_not_ready_nodes`].
pub const ENV_SKIP_NOT_READY_NODES: &str = "GANG_SCHEDULER_SKIP_NOT_READY_NODES";
/// Environment variable overriding [`SnapshotConfig::log_filter`].
pub const ENV_LOG_FILTER: &str = "GANG_SCHEDULER_LOG_FILTER";

/// How cluster records are turned into a scheduling snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Quota entry carrying a namespace's weight.
    pub namespace_weight_key: String,
    /// Weight of namespaces without a weighted quota.
    pub default_namespace_weight: i64,
    /// Leave not-ready nodes out of the snapshot.
    pub skip_not_ready_nodes: bool,
    /// `tracing` filter directives, e.g. `gang_scheduler_core=debug`.
    pub log_filter: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            namespace_weight_key: NAMESPACE_WEIGHT_KEY.to_string(),
            default_namespace_weight: DEFAULT_NAMESPACE_WEIGHT,
            skip_not_ready_nodes: false,
            log_filter: None,
        }
    }
}

impl SnapshotConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Describes the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.namespace_weight_key.trim().is_empty() {
            return Err("namespace_weight_key must not be empty".into());
        }
        if self.default_namespace_weight <= 0 {
            return Err("default_namespace_weight must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Describes the parse error or the first invalid field.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, after loading a
    /// `.env` file if one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails on unparseable values or when validation fails.
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Fails on unparseable values or when validation fails.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut cfg = Self::default();

        if let Some(key) = lookup(ENV_NAMESPACE_WEIGHT_KEY) {
            cfg.namespace_weight_key = key;
        }
        if let Some(weight) = lookup(ENV_DEFAULT_NAMESPACE_WEIGHT) {
            cfg.default_namespace_weight = weight
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEFAULT_NAMESPACE_WEIGHT}={weight} is not an integer"))?;
        }
        if let Some(skip) = lookup(ENV_SKIP_NOT_READY_NODES) {
            cfg.skip_not_ready_nodes = skip
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SKIP_NOT_READY_NODES}={skip} is not a boolean"))?;
        }
        cfg.log_filter = lookup(ENV_LOG_FILTER).filter(|filter| !filter.trim().is_empty());

        cfg.validate()
            .map_err(anyhow::Error::msg)
            .context("invalid snapshot configuration")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = SnapshotConfig::default();
        assert_eq!(cfg.namespace_weight_key, "volcano.sh/namespace.weight");
        assert_eq!(cfg.default_namespace_weight, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_json_str_fills_defaults() {
        let cfg = SnapshotConfig::from_json_str(r#"{"skip_not_ready_nodes": true}"#).unwrap();
        assert!(cfg.skip_not_ready_nodes);
        assert_eq!(cfg.default_namespace_weight, 1);

        let err = SnapshotConfig::from_json_str(r#"{"default_namespace_weight": 0}"#).unwrap_err();
        assert!(err.contains("default_namespace_weight"));

        let err = SnapshotConfig::from_json_str("{").unwrap_err();
        assert!(err.starts_with("parse error"));
    }

    #[test]
    fn test_from_lookup() {
        let cfg = SnapshotConfig::from_lookup(lookup(&[
            (ENV_NAMESPACE_WEIGHT_KEY, "example.com/weight"),
            (ENV_DEFAULT_NAMESPACE_WEIGHT, " 3 "),
            (ENV_SKIP_NOT_READY_NODES, "true"),
            (ENV_LOG_FILTER, "debug"),
        ]))
        .unwrap();

        assert_eq!(cfg.namespace_weight_key, "example.com/weight");
        assert_eq!(cfg.default_namespace_weight, 3);
        assert!(cfg.skip_not_ready_nodes);
        assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = SnapshotConfig::from_lookup(lookup(&[(ENV_DEFAULT_NAMESPACE_WEIGHT, "heavy")])).unwrap_err();
        assert!(err.to_string().contains(ENV_DEFAULT_NAMESPACE_WEIGHT));

        let err = SnapshotConfig::from_lookup(lookup(&[(ENV_NAMESPACE_WEIGHT_KEY, " ")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid snapshot configuration");
    }
}
