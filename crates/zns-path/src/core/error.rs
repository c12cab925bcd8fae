//! Error types for namespace operations.

/// Errors reported by a coordination service or by the path layer.
///
/// The first group mirrors the logical result codes the service returns for
/// single-node operations. The recursive operations match on these to absorb
/// the races they tolerate (see [`crate::ops`]). Everything else is passed
/// through to the caller untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    /// A node already exists at the path.
    #[error("node already exists: {path}")]
    NodeExists { path: String },

    /// No node exists at the path (or its parent is missing on create).
    #[error("no node: {path}")]
    NoNode { path: String },

    /// The node still has children.
    #[error("node not empty: {path}")]
    NotEmpty { path: String },

    /// The expected version did not match the node's version.
    #[error("bad version: {path}")]
    BadVersion { path: String },

    /// Ephemeral nodes cannot have children.
    #[error("ephemeral node cannot have children: {path}")]
    NoChildrenForEphemerals { path: String },

    /// The supplied ACL was empty or malformed.
    #[error("invalid ACL for {path}")]
    InvalidAcl { path: String },

    /// The path failed validation before any remote call was made.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The operation is not allowed on this path (e.g. deleting the root).
    #[error("bad arguments: {path}")]
    BadArguments { path: String },

    /// The caller is not authorized for the operation.
    #[error("not authorized: {path}")]
    NoAuth { path: String },

    /// The connection to the service was lost mid-call.
    #[error("connection loss")]
    ConnectionLoss,

    /// The client session expired.
    #[error("session expired")]
    SessionExpired,

    /// The call did not complete in time.
    #[error("operation timeout")]
    OperationTimeout,

    /// The calling thread was interrupted while waiting for a reply.
    #[error("interrupted")]
    Interrupted,

    /// Any other service error, carried by its raw result code.
    #[error("service error {code}: {message}")]
    Service { code: i32, message: String },
}

impl NamespaceError {
    /// Create a `NodeExists` error.
    pub fn node_exists(path: impl Into<String>) -> Self {
        Self::NodeExists { path: path.into() }
    }

    /// Create a `NoNode` error.
    pub fn no_node(path: impl Into<String>) -> Self {
        Self::NoNode { path: path.into() }
    }

    /// Create a `NotEmpty` error.
    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::NotEmpty { path: path.into() }
    }

    /// Create an `InvalidPath` error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Path the error refers to, if it carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NodeExists { path }
            | Self::NoNode { path }
            | Self::NotEmpty { path }
            | Self::BadVersion { path }
            | Self::NoChildrenForEphemerals { path }
            | Self::InvalidAcl { path }
            | Self::InvalidPath { path, .. }
            | Self::BadArguments { path }
            | Self::NoAuth { path } => Some(path),
            Self::ConnectionLoss
            | Self::SessionExpired
            | Self::OperationTimeout
            | Self::Interrupted
            | Self::Service { .. } => None,
        }
    }

    /// Check if this is a "node exists" error.
    pub fn is_node_exists(&self) -> bool {
        matches!(self, Self::NodeExists { .. })
    }

    /// Check if this is a "no node" error.
    pub fn is_no_node(&self) -> bool {
        matches!(self, Self::NoNode { .. })
    }

    /// Check if this is a "not empty" error.
    pub fn is_not_empty(&self) -> bool {
        matches!(self, Self::NotEmpty { .. })
    }

    /// Check if the failure says nothing about the namespace state, only about
    /// the call itself. The path layer never retries these.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionLoss | Self::OperationTimeout | Self::Interrupted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let err = NamespaceError::node_exists("/a");
        assert!(err.is_node_exists());
        assert_eq!(err.path(), Some("/a"));
        assert_eq!(err.to_string(), "node already exists: /a");
    }

    #[test]
    fn test_invalid_path_display() {
        let err = NamespaceError::invalid_path("a/b", "path must start with / character");
        assert_eq!(
            err.to_string(),
            "invalid path \"a/b\": path must start with / character"
        );
        assert_eq!(err.path(), Some("a/b"));
    }

    #[test]
    fn test_pathless_errors() {
        assert_eq!(NamespaceError::ConnectionLoss.path(), None);
        assert_eq!(
            NamespaceError::Service {
                code: -999,
                message: String::from("boom")
            }
            .path(),
            None
        );
    }

    #[test]
    fn test_is_transient() {
        assert!(NamespaceError::ConnectionLoss.is_transient());
        assert!(NamespaceError::Interrupted.is_transient());
        assert!(NamespaceError::OperationTimeout.is_transient());
        assert!(!NamespaceError::SessionExpired.is_transient());
        assert!(!NamespaceError::no_node("/x").is_transient());
    }

    #[test]
    fn test_race_predicates() {
        assert!(NamespaceError::no_node("/x").is_no_node());
        assert!(NamespaceError::not_empty("/x").is_not_empty());
        assert!(!NamespaceError::not_empty("/x").is_no_node());
    }
}
