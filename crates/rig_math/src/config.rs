//! Process-wide validation settings.
//!
//! A [`ValidationConfig`] is installed once at startup and read by every
//! operation afterwards. Processes that never install one get the defaults:
//! strict checks off, error logging on.

use std::sync::OnceLock;

/// Environment variable enabling strict validation.
pub const STRICT_ENV: &str = "RIG_STRICT";

/// Environment variable toggling validation error logging.
pub const LOG_ERRORS_ENV: &str = "RIG_LOG_ERRORS";

static CONFIG: OnceLock<ValidationConfig> = OnceLock::new();

/// Validation switches shared by all rig operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Run precondition checks beyond the always-on label and shape checks.
    pub strict: bool,
    /// Emit every validation error through `tracing` before returning it.
    pub log_errors: bool,
}

impl ValidationConfig {
    /// The defaults: not strict, errors logged.
    pub const DEFAULT: Self = Self {
        strict: false,
        log_errors: true,
    };

    /// Build a config from [`STRICT_ENV`] and [`LOG_ERRORS_ENV`], falling back
    /// to [`ValidationConfig::DEFAULT`] for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|value| parse_flag(&value))
                .unwrap_or(default)
        };
        Self {
            strict: flag(STRICT_ENV, Self::DEFAULT.strict),
            log_errors: flag(LOG_ERRORS_ENV, Self::DEFAULT.log_errors),
        }
    }

    /// Enable or disable strict checks.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable error logging.
    #[must_use]
    pub fn with_log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Install the process-wide config.
///
/// # Errors
///
/// Returns the rejected config if one was already installed (or read, which
/// pins the defaults).
pub fn install(config: ValidationConfig) -> Result<(), ValidationConfig> {
    CONFIG.set(config)
}

/// Returns the installed config, or the defaults.
#[must_use]
pub fn current() -> ValidationConfig {
    *CONFIG.get_or_init(ValidationConfig::default)
}
