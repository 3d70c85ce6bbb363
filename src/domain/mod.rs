//! Domain Layer
//!
//! Contains the tree snapshot entities and core abstractions.
//! This layer only depends on serde (snapshots) and chrono (timestamps).

mod category;
mod entity;
mod group;
mod item;
mod tree;

pub use category::Category;
pub use entity::{position_of, DomainError, DomainResult, Entity};
pub use group::Group;
pub use item::Item;
pub use tree::{ContainerId, Tree};
