//! Engine configuration

use gatehouse_schema::Source;
use serde::{Deserialize, Serialize};

use crate::coerce::Mode;
use crate::report::DEFAULT_PROBLEM_TYPE_BASE;

/// 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Bytes inspected for magic numbers.
pub const DEFAULT_MAGIC_SNIFF_LEN: usize = 16;

/// Smallest usable `magic_sniff_len`: the longest known signature (PNG, 8
/// bytes).
pub const MIN_MAGIC_SNIFF_LEN: usize = crate::files::LONGEST_SIGNATURE;

/// Errors from loading or checking an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid engine config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Validation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size cap for files that declare no `max_size`, and for part buffering
    pub max_file_size: u64,

    /// Leading bytes inspected for magic numbers, at least
    /// [`MIN_MAGIC_SNIFF_LEN`]
    pub magic_sniff_len: usize,

    /// Sources where an empty string coerces to boolean `false`
    pub empty_bool_sources: Vec<Source>,

    /// Base URI of the problem `type` field
    pub problem_type_base: String,

    /// Whether errors carry the offending input
    pub include_input: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            magic_sniff_len: DEFAULT_MAGIC_SNIFF_LEN,
            empty_bool_sources: vec![Source::Query],
            problem_type_base: DEFAULT_PROBLEM_TYPE_BASE.to_owned(),
            include_input: true,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config and checks it. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.magic_sniff_len < MIN_MAGIC_SNIFF_LEN {
            return Err(ConfigError::Invalid {
                field: "magic_sniff_len",
                reason: "must cover the longest magic signature (8 bytes)",
            });
        }
        if self.problem_type_base.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "problem_type_base",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_magic_sniff_len(mut self, len: usize) -> Self {
        self.magic_sniff_len = len;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_empty_bool_sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.empty_bool_sources = sources.into_iter().collect();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_problem_type_base(mut self, base: impl Into<String>) -> Self {
        self.problem_type_base = base.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_include_input(mut self, include_input: bool) -> Self {
        self.include_input = include_input;
        self
    }

    /// Whether an empty string is `false` for booleans read from `source`.
    #[must_use]
    pub fn empty_is_false(&self, source: Source) -> bool {
        self.empty_bool_sources.contains(&source)
    }

    /// The coercion mode for wire values read from `source`.
    #[must_use]
    pub fn wire_mode(&self, source: Source) -> Mode {
        Mode::Wire {
            empty_is_false: self.empty_is_false(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_file_size, 10_485_760);
        assert_eq!(config.magic_sniff_len, 16);
        assert!(config.empty_is_false(Source::Query));
        assert!(!config.empty_is_false(Source::Header));
        assert!(config.include_input);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"max_file_size": 1024, "empty_bool_sources": ["query", "cookie"]}"#)
                .unwrap();
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.magic_sniff_len, DEFAULT_MAGIC_SNIFF_LEN);
        assert_eq!(config.wire_mode(Source::Cookie), Mode::Wire { empty_is_false: true });
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"magic_sniff_len": 0}"#),
            Err(ConfigError::Invalid { field: "magic_sniff_len", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"magic_sniff_len": 4}"#),
            Err(ConfigError::Invalid { field: "magic_sniff_len", .. })
        ));
        assert!(EngineConfig::from_json_str(r#"{"magic_sniff_len": 8}"#).is_ok());
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"problem_type_base": " "}"#),
            Err(ConfigError::Invalid { field: "problem_type_base", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn builder() {
        let config = EngineConfig::default()
            .with_include_input(false)
            .with_empty_bool_sources(std::iter::empty())
            .with_problem_type_base("https://api.test/problems");
        assert!(!config.include_input);
        assert!(!config.empty_is_false(Source::Query));
        assert!(config.validate().is_ok());
    }
}
