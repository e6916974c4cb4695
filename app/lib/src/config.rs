//! Configuration types for extraction and comparison.
//!
//! This module provides builder-style configuration structs. [`AnalyzerConfig`]
//! bundles the others and can be deserialized from JSON so the command-line
//! front end can load it from a file.

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Configuration for the record extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Number of operations of each applicable kind in one read, write or
    /// update round.
    ///
    /// The benchmark logs do not repeat this count per round, so it has to be
    /// supplied here. Mixed rounds ignore it and take their counts from the
    /// log's "Mixed operations" line.
    ///
    /// Default: 100,000 operations
    pub ops_per_round: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ops_per_round: 100_000,
        }
    }
}

impl ExtractorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed operation count per round.
    ///
    /// # Panics
    ///
    /// Panics if `ops` is zero.
    pub fn with_ops_per_round(mut self, ops: u64) -> Self {
        assert!(ops > 0, "ops_per_round must be positive");
        self.ops_per_round = ops;
        self
    }
}

/// Configuration for cross-engine comparison.
///
/// The baseline engine's means sit in the denominator of every percentage
/// improvement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Display name of the baseline engine.
    ///
    /// Default: "baseline"
    pub baseline_name: String,

    /// Display name of the candidate engine.
    ///
    /// Default: "candidate"
    pub candidate_name: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            baseline_name: "baseline".to_string(),
            candidate_name: "candidate".to_string(),
        }
    }
}

impl CompareConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the baseline engine's display name.
    pub fn with_baseline_name(mut self, name: impl Into<String>) -> Self {
        self.baseline_name = name.into();
        self
    }

    /// Set the candidate engine's display name.
    pub fn with_candidate_name(mut self, name: impl Into<String>) -> Self {
        self.candidate_name = name.into();
        self
    }
}

/// Top-level configuration for a full analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Extraction settings, shared by both engines.
    pub extractor: ExtractorConfig,
    /// Comparison settings.
    pub compare: CompareConfig,
}

impl AnalyzerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extractor configuration.
    pub fn with_extractor(mut self, config: ExtractorConfig) -> Self {
        self.extractor = config;
        self
    }

    /// Set the comparison configuration.
    pub fn with_compare(mut self, config: CompareConfig) -> Self {
        self.compare = config;
        self
    }

    /// Parse a configuration from JSON text.
    ///
    /// Missing keys take their default values.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AnalyzerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a deserialized configuration could not enforce.
    pub fn validate(&self) -> Result<()> {
        if self.extractor.ops_per_round == 0 {
            return Err(BenchError::ConfigError {
                message: "extractor.ops_per_round must be positive".to_string(),
            });
        }
        if self.compare.baseline_name.trim().is_empty()
            || self.compare.candidate_name.trim().is_empty()
        {
            return Err(BenchError::ConfigError {
                message: "engine names must not be empty".to_string(),
            });
        }
        if self.compare.baseline_name == self.compare.candidate_name {
            return Err(BenchError::ConfigError {
                message: format!(
                    "baseline and candidate are both named '{}'",
                    self.compare.baseline_name
                ),
            });
        }
        Ok(())
    }
}
