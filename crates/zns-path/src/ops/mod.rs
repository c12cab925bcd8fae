//! Recursive operations built from single-node coordinator calls.
//!
//! None of these are atomic. They are sequences of independent calls that
//! tolerate other clients mutating the same subtree; a failed call leaves the
//! steps already applied in place, and repeating the operation is safe.

mod delete;
mod mkdirs;
mod sorted;

pub use delete::{delete_children, delete_tree};
pub use mkdirs::{mkdirs, mkdirs_with_options};
pub use sorted::{sequence_number, sorted_children, SEQUENCE_DIGITS};

use crate::core::NamespaceError;
use crate::service::{AclProvider, Coordinator};

/// A coordinator paired with an optional ACL provider.
///
/// # Example
///
/// ```
/// use zns_path::{PathOps, PrefixAclProvider};
/// use zns_path::testing::MemoryCoordinator;
///
/// let zk = MemoryCoordinator::new();
/// let acls = PrefixAclProvider::default();
/// let ops = PathOps::new(&zk).with_acl_provider(&acls);
///
/// ops.mkdirs("/app/locks")?;
/// assert!(ops.sorted_children("/app/locks")?.is_empty());
/// ops.delete_tree("/app")?;
/// # Ok::<(), zns_path::NamespaceError>(())
/// ```
pub struct PathOps<'a, C: ?Sized> {
    client: &'a C,
    acl_provider: Option<&'a dyn AclProvider>,
}

impl<'a, C> PathOps<'a, C>
where
    C: Coordinator + ?Sized,
{
    /// Wrap a coordinator; created nodes get the open ACL.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            acl_provider: None,
        }
    }

    /// Use `provider` for the ACLs of created nodes.
    pub fn with_acl_provider(mut self, provider: &'a dyn AclProvider) -> Self {
        self.acl_provider = Some(provider);
        self
    }

    /// The wrapped coordinator.
    pub fn client(&self) -> &'a C {
        self.client
    }

    /// Create every node along `path`, the last one included.
    pub fn mkdirs(&self, path: &str) -> Result<(), NamespaceError> {
        mkdirs_with_options(self.client, path, true, self.acl_provider)
    }

    /// Create the ancestors of `path` but not `path` itself.
    pub fn ensure_parents(&self, path: &str) -> Result<(), NamespaceError> {
        mkdirs_with_options(self.client, path, false, self.acl_provider)
    }

    /// See [`delete_children`].
    pub fn delete_children(&self, path: &str, delete_self: bool) -> Result<(), NamespaceError> {
        delete_children(self.client, path, delete_self)
    }

    /// Delete `path` and everything beneath it.
    pub fn delete_tree(&self, path: &str) -> Result<(), NamespaceError> {
        delete_tree(self.client, path)
    }

    /// See [`sorted_children`].
    pub fn sorted_children(&self, path: &str) -> Result<Vec<String>, NamespaceError> {
        sorted_children(self.client, path)
    }
}
