//! Test doubles for code built on the coordinator trait

mod memory_store;

pub use memory_store::{MemoryCoordinator, MemoryNode, MemoryTree, Op};
