//! Evaluator configuration.

use thiserror::Error;

/// Environment variable holding the maximum interpreted call depth.
pub const MAX_CALL_DEPTH_VAR: &str = "KILN_MAX_CALL_DEPTH";
/// Environment variable enabling the post-evaluation state dump.
pub const DUMP_STATE_VAR: &str = "KILN_DUMP_STATE";

/// Tunables for one [`Interpreter`](crate::Interpreter).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalConfig {
    /// Interpreted call depth at which a call throws instead of recursing.
    /// `None` leaves recursion bounded only by memory.
    pub max_call_depth: Option<usize>,
    /// Log initialized modules and classes after each top-level evaluation.
    pub dump_state: bool,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got `{value}`")]
    InvalidDepth { var: &'static str, value: String },
    #[error("{var} must be `0`, `1`, `true` or `false`, got `{value}`")]
    InvalidFlag { var: &'static str, value: String },
}

impl EvalConfig {
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_dump_state(mut self, dump: bool) -> Self {
        self.dump_state = dump;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = EvalConfig::default();
        if let Some(value) = lookup(MAX_CALL_DEPTH_VAR) {
            match value.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_call_depth = Some(depth),
                _ => {
                    return Err(ConfigError::InvalidDepth {
                        var: MAX_CALL_DEPTH_VAR,
                        value,
                    })
                }
            }
        }
        if let Some(value) = lookup(DUMP_STATE_VAR) {
            config.dump_state = match value.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        var: DUMP_STATE_VAR,
                        value,
                    })
                }
            };
        }
        Ok(config)
    }
}
