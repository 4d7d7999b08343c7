//! Process-wide logging bootstrap.
//!
//! All log calls in the workspace go through `tracing`. Output is gated by a
//! single enable flag: when it is off no subscriber is installed and every
//! `tracing` macro is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Environment};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Logging settings derived from [`AppConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    /// Default directive, overridden by `RUST_LOG`
    pub directive: String,
}

impl LogConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let level = match config.environment {
            Environment::Development => "debug",
            Environment::Production => "info",
        };
        Self {
            enabled: config.enable_logging,
            directive: format!("postboard={level}"),
        }
    }
}

/// Install the global subscriber when logging is enabled.
///
/// Returns whether logging is active afterwards. Safe to call more than once;
/// only the first successful call installs a subscriber.
pub fn init(config: &LogConfig) -> bool {
    if !config.enabled {
        return is_enabled();
    }
    if is_enabled() {
        return true;
    }

    let (filter, rejected) = build_filter(&config.directive);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();
    if installed {
        LOGGING_ENABLED.store(true, Ordering::SeqCst);
        if let Some(error) = rejected {
            tracing::warn!(error = %error, "Ignoring invalid log directive `{}`", config.directive);
        }
    }
    is_enabled()
}

/// `RUST_LOG` plus the default directive; an unparsable directive is left
/// out and handed back.
fn build_filter(directive: &str) -> (EnvFilter, Option<ParseError>) {
    let filter = EnvFilter::from_default_env();
    match directive.parse::<Directive>() {
        Ok(directive) => (filter.add_directive(directive), None),
        Err(error) => (filter, Some(error)),
    }
}

/// Whether a subscriber was installed by [`init`]
pub fn is_enabled() -> bool {
    LOGGING_ENABLED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_installs_nothing() {
        let config = LogConfig {
            enabled: false,
            directive: "postboard=debug".to_string(),
        };
        assert_eq!(init(&config), is_enabled());
    }

    #[test]
    fn invalid_directive_is_left_out() {
        let (_, rejected) = build_filter("postboard=loudest");
        assert!(rejected.is_some());

        let (filter, rejected) = build_filter("postboard=debug");
        assert!(rejected.is_none());
        assert!(filter.to_string().contains("postboard=debug"));
    }

    #[test]
    fn directive_follows_environment() {
        let mut app = AppConfig::from_lookup(|_| None).unwrap();
        app.environment = Environment::Production;
        app.enable_logging = false;
        let config = LogConfig::from_app_config(&app);
        assert_eq!(config.directive, "postboard=info");
        assert!(!config.enabled);

        app.environment = Environment::Development;
        assert_eq!(LogConfig::from_app_config(&app).directive, "postboard=debug");
    }
}
