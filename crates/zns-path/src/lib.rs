//! Filesystem-style path operations for coordination-service namespaces
//!
//! A coordination service stores a tree of nodes addressed by `/`-separated
//! paths, but only offers single-node operations: a node can be created only
//! when its parent exists and deleted only when it has no children. This
//! crate builds the missing conveniences on top of those primitives:
//!
//! - **Path**: validation, joining, and decomposition
//! - **Service**: the [`Coordinator`] client trait and ACL providers
//! - **Ops**: `mkdirs`, recursive delete, and sorted child listing
//! - **Config**: ACL policies loaded from JSON
//! - **Testing**: an in-memory coordinator with race injection
//!
//! # Design Principles
//!
//! 1. **Race tolerant**: other clients may mutate the same subtree at any
//!    time; "already exists", "not empty", and "no node" are expected
//!    outcomes of a lost race, not failures
//! 2. **No hidden retries**: connection loss, timeouts, and interruption are
//!    returned to the caller immediately
//! 3. **Injected policy**: ACLs come from an [`AclProvider`] passed per call
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         ops                                  │
//! │   mkdirs ─────┐     delete_children      sorted_children     │
//! │               │            │                    │            │
//! │        resolve_acl         │                    │            │
//! │               │            │                    │            │
//! │        AclProvider         │                    │            │
//! └───────────────┼────────────┼────────────────────┼────────────┘
//!                 ▼            ▼                    ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │   Coordinator: exists · create · get_children · delete       │
//! │   (service client, or testing::MemoryCoordinator)            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod core;
pub mod ops;
pub mod service;
pub mod testing;

// Convenient re-exports at crate root
pub use config::{AclEntryConfig, AclPolicyConfig, ConfigError};
pub use crate::core::{make_path, make_path_all, node_name, parent_path, split_path, validate_path};
pub use crate::core::{
    open_acl_unsafe, Acl, AclEntry, CreateMode, Id, NamespaceError, Perms, Version, ANY_VERSION,
    PATH_SEPARATOR,
};
pub use ops::{
    delete_children, delete_tree, mkdirs, mkdirs_with_options, sequence_number, sorted_children,
    PathOps,
};
pub use service::{resolve_acl, AclProvider, Coordinator, DefaultAclProvider, PrefixAclProvider};
