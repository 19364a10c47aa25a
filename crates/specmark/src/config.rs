//! Parser configuration parsed from environment variables.
//!
//! Settings can be overridden via environment variables prefixed with
//! `SPECMARK_`.

use std::env;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;

/// Environment variable selecting the log level.
pub const LOG_LEVEL_VAR: &str = "SPECMARK_LOG_LEVEL";

/// Environment variable bounding concept expansion depth.
pub const MAX_CONCEPT_DEPTH_VAR: &str = "SPECMARK_MAX_CONCEPT_DEPTH";

/// Environment variable bounding the steps one concept invocation may expand into.
pub const MAX_EXPANDED_STEPS_VAR: &str = "SPECMARK_MAX_EXPANDED_STEPS";

/// Default bound on nested concept expansion.
pub const DEFAULT_MAX_CONCEPT_DEPTH: usize = 16;

/// Default bound on the nested steps produced by one top-level step.
pub const DEFAULT_MAX_EXPANDED_STEPS: usize = 10_000;

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Info` when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes all trace spans.
    Trace,
    /// Debug-level information, including concept expansion.
    Debug,
    /// Standard informational messages.
    #[default]
    Info,
    /// Warnings such as downgraded dynamic parameters.
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::Invalid(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// The most verbose level this setting lets through.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

/// Configuration for parsing runs.
///
/// # Environment Variables
///
/// - `SPECMARK_LOG_LEVEL`: log level (trace, debug, info, warn, error)
/// - `SPECMARK_MAX_CONCEPT_DEPTH`: deepest permitted concept nesting
/// - `SPECMARK_MAX_EXPANDED_STEPS`: nested steps one top-level step may produce
///
/// Both limits are at least 1; builders clamp smaller values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Log level used by [`init_logging`](crate::init_logging).
    pub log_level: LogLevel,
    /// Deepest permitted nesting of concepts inside concepts.
    pub max_concept_depth: usize,
    /// Nested steps, counted across all levels, that one top-level step may
    /// expand into.
    pub max_expanded_steps: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            max_concept_depth: DEFAULT_MAX_CONCEPT_DEPTH,
            max_expanded_steps: DEFAULT_MAX_EXPANDED_STEPS,
        }
    }
}

impl ParserConfig {
    /// Load configuration from the process environment.
    ///
    /// Falls back to defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an invalid value.
    ///
    /// # Examples
    /// ```
    /// use specmark::{LogLevel, ParserConfig};
    /// let config = ParserConfig::from_lookup(|key| {
    ///     (key == "SPECMARK_LOG_LEVEL").then(|| "debug".to_string())
    /// })
    /// .unwrap_or_default();
    /// assert_eq!(config.log_level, LogLevel::Debug);
    /// assert_eq!(config.max_concept_depth, 16);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup(LOG_LEVEL_VAR)
            .map(|val| val.parse::<LogLevel>())
            .transpose()?
            .unwrap_or_default();

        let max_concept_depth = lookup(MAX_CONCEPT_DEPTH_VAR)
            .map(|val| parse_limit(&val, "concept depth"))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONCEPT_DEPTH);

        let max_expanded_steps = lookup(MAX_EXPANDED_STEPS_VAR)
            .map(|val| parse_limit(&val, "expanded step limit"))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_EXPANDED_STEPS);

        Ok(Self {
            log_level,
            max_concept_depth,
            max_expanded_steps,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// Intended for caller-supplied settings that take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        max_concept_depth: Option<usize>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(depth) = max_concept_depth {
            self.max_concept_depth = depth.max(1);
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Create a new configuration with the specified concept depth bound.
    ///
    /// A depth of 0 would reject every concept, so it is raised to 1.
    #[must_use]
    pub fn with_max_concept_depth(mut self, depth: usize) -> Self {
        self.max_concept_depth = depth.max(1);
        self
    }

    /// Create a new configuration with the specified expanded step budget.
    ///
    /// A budget of 0 is raised to 1.
    #[must_use]
    pub fn with_max_expanded_steps(mut self, steps: usize) -> Self {
        self.max_expanded_steps = steps.max(1);
        self
    }
}

fn parse_limit(val: &str, what: &str) -> Result<usize, ConfigError> {
    match val.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {what} '{val}', expected a positive integer"
        ))),
    }
}
