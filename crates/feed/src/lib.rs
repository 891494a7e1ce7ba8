//! Market data providers and retrieval policy.

pub mod cache;
pub mod json_dir;
pub mod memory;

pub use cache::SnapshotCache;
pub use json_dir::JsonDirFeed;
pub use memory::MemoryFeed;
