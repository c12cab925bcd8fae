//! ACL providers and the resolution used when creating nodes.

use std::collections::BTreeMap;

use tracing::trace;

use crate::core::{is_under, open_acl_unsafe, Acl};

/// Supplies the ACL to attach when a node is created.
pub trait AclProvider {
    /// ACL to use when no path-specific list applies. Must be usable as-is.
    fn default_acl(&self) -> Acl;

    /// ACL for a specific path, or `None` to fall back to [`default_acl`].
    ///
    /// `path` is `None` for root-level queries.
    ///
    /// [`default_acl`]: AclProvider::default_acl
    fn acl_for_path(&self, path: Option<&str>) -> Option<Acl>;
}

/// Provider that grants the open ACL everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAclProvider;

impl AclProvider for DefaultAclProvider {
    fn default_acl(&self) -> Acl {
        open_acl_unsafe()
    }

    fn acl_for_path(&self, _path: Option<&str>) -> Option<Acl> {
        Some(open_acl_unsafe())
    }
}

/// Provider choosing an ACL by the longest configured path prefix.
///
/// Built from [`AclPolicyConfig`](crate::config::AclPolicyConfig); a prefix
/// matches itself and every path beneath it.
#[derive(Clone, Debug)]
pub struct PrefixAclProvider {
    default: Acl,
    prefixes: BTreeMap<String, Acl>,
}

impl Default for PrefixAclProvider {
    fn default() -> Self {
        Self::new(open_acl_unsafe())
    }
}

impl PrefixAclProvider {
    /// Create a provider with no prefixes and the given default.
    pub fn new(default: Acl) -> Self {
        Self {
            default,
            prefixes: BTreeMap::new(),
        }
    }

    /// Attach an ACL to a path prefix, replacing any previous one.
    pub fn with_prefix(mut self, prefix: impl Into<String>, acl: Acl) -> Self {
        self.insert(prefix, acl);
        self
    }

    /// Attach an ACL to a path prefix, replacing any previous one.
    pub fn insert(&mut self, prefix: impl Into<String>, acl: Acl) {
        self.prefixes.insert(prefix.into(), acl);
    }

    /// Number of configured prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Check if no prefixes are configured.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl AclProvider for PrefixAclProvider {
    fn default_acl(&self) -> Acl {
        self.default.clone()
    }

    fn acl_for_path(&self, path: Option<&str>) -> Option<Acl> {
        let path = path?;
        self.prefixes
            .iter()
            .filter(|(prefix, _)| is_under(path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, acl)| acl.clone())
    }
}

/// Resolve the ACL for a create at `path`.
///
/// Uses the provider's path-specific list, then its default, and the open ACL
/// when no provider is given. Whatever list the provider returns is used as-is;
/// the service rejects an empty one with `InvalidAcl`.
pub fn resolve_acl(provider: Option<&dyn AclProvider>, path: &str) -> Acl {
    match provider {
        Some(provider) => provider.acl_for_path(Some(path)).unwrap_or_else(|| {
            trace!("no path-specific ACL for {}, using provider default", path);
            provider.default_acl()
        }),
        None => open_acl_unsafe(),
    }
}
