//! Logging setup
//!
//! The engine only emits `tracing` events. Hosts that have no subscriber of
//! their own can install a formatted one here.

use tracing_subscriber::EnvFilter;

use crate::domain::{DomainError, DomainResult};

/// Filter used when neither the caller nor `RUST_LOG` gives one
pub const DEFAULT_FILTER: &str = "navtree_reorder=info,drag_session=info";

/// Install a global fmt subscriber. `RUST_LOG` wins over `filter` when set.
///
/// Returns `Ok(false)` if a global subscriber was already installed.
pub fn init_logging(filter: &str) -> DomainResult<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) => env,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid log filter: {}", e)))?,
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_tolerated() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        init_logging(DEFAULT_FILTER).unwrap();
        assert!(!init_logging(DEFAULT_FILTER).unwrap());
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let result = init_logging("navtree_reorder=loudest");
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }
}
