//! CLI configuration loading and management.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use attest_core::CoveragePolicy;
use attest_verifier::{Requirements, VerifierOptions};

/// Full configuration for the `attest` CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttestConfig {
    /// Report finalization settings.
    #[serde(default)]
    pub verification: VerificationConfig,

    /// What disclosed attributes must show.
    #[serde(default)]
    pub requirements: Requirements,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Coverage policy (strict, lenient).
    #[serde(default)]
    pub policy: CoveragePolicy,
    /// Allowed drift of the proof's current date, in days.
    #[serde(default = "default_tolerance_days")]
    pub current_date_tolerance_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_tolerance_days() -> i64 {
    1
}
fn default_log_level() -> String {
    "warn".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            policy: CoveragePolicy::default(),
            current_date_tolerance_days: default_tolerance_days(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AttestConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: AttestConfig = toml::from_str(&contents)
                .with_context(|| format!("invalid config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn verifier_options(&self) -> VerifierOptions {
        VerifierOptions {
            policy: self.verification.policy,
            current_date_tolerance_days: self.verification.current_date_tolerance_days,
        }
    }
}
