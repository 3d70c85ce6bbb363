//! Store Layer
//!
//! Host store boundary and the session that commits moves to it.

mod memory;
mod session;
mod traits;


pub use memory::MemoryStore;
pub use session::{Committed, ReorderSession};
pub use traits::TreeStore;
