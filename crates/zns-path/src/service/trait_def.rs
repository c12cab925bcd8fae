//! Coordinator trait definition.

use crate::core::{AclEntry, CreateMode, NamespaceError, Version};

/// Single-node operations of a coordination-service client.
///
/// Each call is one atomic remote operation. Implementations report the
/// logical outcomes (`NodeExists`, `NoNode`, `NotEmpty`, ...) as the matching
/// [`NamespaceError`] variant and never retry on their own.
pub trait Coordinator {
    /// Check whether a node exists. A missing node is `Ok(false)`, not an error.
    fn exists(&self, path: &str) -> Result<bool, NamespaceError>;

    /// Create a node and return the path actually created (sequential modes
    /// append a counter to the requested name).
    ///
    /// Fails with `NodeExists` if the node is present and `NoNode` if the
    /// parent is missing.
    fn create(
        &self,
        path: &str,
        data: &[u8],
        acl: &[AclEntry],
        mode: CreateMode,
    ) -> Result<String, NamespaceError>;

    /// List the names (not paths) of a node's direct children, in no
    /// particular order. Fails with `NoNode` if the node is absent.
    fn get_children(&self, path: &str) -> Result<Vec<String>, NamespaceError>;

    /// Delete a node whose version matches `version`
    /// ([`ANY_VERSION`](crate::core::ANY_VERSION) matches all).
    ///
    /// Fails with `NotEmpty` if children remain and `NoNode` if the node is
    /// already gone.
    fn delete(&self, path: &str, version: Version) -> Result<(), NamespaceError>;
}
