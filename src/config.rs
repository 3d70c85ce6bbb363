//! Engine Configuration
//!
//! Ordering constants and host-edge behavior, deserializable from JSON.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};
use crate::order::{DEFAULT_MIN_GAP, DEFAULT_ORDER_GAP};

/// How a committed move is written back to the host store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Rewrite the whole tree snapshot
    #[default]
    FullTree,
    /// Send one reorder notification per touched container
    Targeted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Spacing between keys after a restamp
    pub order_gap: i64,
    /// Adjacent gaps below this trigger rebalancing
    pub min_gap: i64,
    pub persist_mode: PersistMode,
    /// Restamp crowded containers when a session loads its tree
    pub compact_on_load: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            order_gap: DEFAULT_ORDER_GAP,
            min_gap: DEFAULT_MIN_GAP,
            persist_mode: PersistMode::default(),
            compact_on_load: true,
        }
    }
}

impl ReorderConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let config: ReorderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.order_gap <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "order_gap must be positive, got {}",
                self.order_gap
            )));
        }
        if self.min_gap < 1 || self.min_gap > self.order_gap {
            return Err(DomainError::InvalidInput(format!(
                "min_gap must be within 1..={}, got {}",
                self.order_gap, self.min_gap
            )));
        }
        Ok(())
    }
}
