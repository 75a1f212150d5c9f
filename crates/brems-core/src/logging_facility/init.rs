//! Subscriber setup for the CLI and embedding services

use crate::errors::BremsError;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Crates whose events are shown when `RUST_LOG` is unset.
const LOG_TARGETS: &[&str] = &["brems_core", "brems_cli"];

/// Output profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines, debug level
    Development,
    /// One JSON object per event, info level
    Production,
    /// Bare registry; tests install their own capture layer
    Test,
}

impl FromStr for Profile {
    type Err = BremsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" | "json" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(BremsError::InvalidInput {
                reason: format!("unknown logging profile '{}'", other),
            }),
        }
    }
}

/// `RUST_LOG` if set, otherwise our crates at `level`.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect();
        EnvFilter::new(directives.join(","))
    })
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// Output always goes to stderr so reports written to stdout stay
/// machine-readable.
///
/// # Example
///
/// ```
/// use brems_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter("debug"))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter("info"))
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parsing() {
        assert_eq!("dev".parse::<Profile>().unwrap(), Profile::Development);
        assert_eq!(" JSON ".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("test".parse::<Profile>().unwrap(), Profile::Test);
        assert!(matches!(
            "verbose".parse::<Profile>(),
            Err(BremsError::InvalidInput { .. })
        ));
    }
}
