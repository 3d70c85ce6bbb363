//! Reorder engine for a Category → Group → Item navigation tree.
//!
//! A finished drag comes in as a [`DragEnd`]; [`ReorderEngine::execute`]
//! turns it into a fresh [`Tree`] snapshot plus per-container
//! [`ReorderNotification`]s. Anything that does not resolve is a no-op.

pub mod config;
pub mod domain;
pub mod locate;
pub mod logging;
pub mod migrate;
pub mod moves;
pub mod order;
pub mod store;

pub use drag_session::{
    ActivationGuard, DragEnd, DragKind, DragSession, DragState, DropTarget, InsertionSide,
    SensorEvent,
};

pub use config::{PersistMode, ReorderConfig};
pub use domain::{Category, DomainError, DomainResult, Group, Item, Tree};
pub use moves::{MoveEffect, MoveOutcome, MoveTopology, NoopReason, ReorderEngine, ReorderNotification};
pub use store::{Committed, MemoryStore, ReorderSession, TreeStore};
