//! Media storage for post images - local disk and in-memory.

mod local;
mod memory;

pub use local::LocalMediaStorage;
pub use memory::InMemoryMediaStorage;
