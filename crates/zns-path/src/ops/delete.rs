//! Recursive node deletion.
//!
//! The service refuses to delete a node that still has children, so a subtree
//! is removed leaves first. The walk uses an explicit stack rather than
//! recursion; stack depth stays constant however deep the namespace is.

use tracing::{debug, trace};

use crate::core::{make_path, validate_path, NamespaceError, ANY_VERSION, ROOT_PATH};
use crate::service::Coordinator;

/// Pending unit of work. Popping a `Drain` pushes the node's children; each
/// child's `Remove` sits below its own `Drain`, so children always go first.
enum Step {
    /// List the node and schedule its children for removal.
    Drain { path: String },
    /// Delete the node itself, retrying the drain if it gained children.
    Remove { path: String },
}

/// Delete every descendant of `path`, and `path` itself if `delete_self`.
///
/// Two races with other clients are absorbed. A node that gained a child
/// between listing and delete is drained again and the delete retried,
/// without bound. A node that disappeared before its delete counts as
/// deleted.
///
/// Listing is not guarded: `NoNode` from any listing, of `path` itself or a
/// descendant, on the first pass or a retry, is returned to the caller. So is
/// any other error. Nodes removed before the failure stay removed, and
/// repeating the call picks up where it stopped.
///
/// The root itself is never deleted; `delete_self` on `/` only empties the
/// namespace.
pub fn delete_children<C>(client: &C, path: &str, delete_self: bool) -> Result<(), NamespaceError>
where
    C: Coordinator + ?Sized,
{
    validate_path(path)?;

    let mut stack = Vec::new();
    if delete_self && path != ROOT_PATH {
        stack.push(Step::Remove {
            path: path.to_string(),
        });
    }
    stack.push(Step::Drain {
        path: path.to_string(),
    });

    while let Some(step) = stack.pop() {
        match step {
            Step::Drain { path } => {
                let children = client.get_children(&path)?;
                for child in children.iter().rev() {
                    let child_path = make_path(&path, child);
                    stack.push(Step::Remove {
                        path: child_path.clone(),
                    });
                    stack.push(Step::Drain { path: child_path });
                }
            }
            Step::Remove { path } => match client.delete(&path, ANY_VERSION) {
                Ok(()) => debug!("deleted {}", path),
                Err(NamespaceError::NoNode { .. }) => {
                    trace!("{} already deleted", path);
                }
                Err(NamespaceError::NotEmpty { .. }) => {
                    trace!("{} gained children, draining again", path);
                    stack.push(Step::Remove { path: path.clone() });
                    stack.push(Step::Drain { path });
                }
                Err(e) => return Err(e),
            },
        }
    }

    Ok(())
}

/// Delete `path` and everything beneath it.
pub fn delete_tree<C>(client: &C, path: &str) -> Result<(), NamespaceError>
where
    C: Coordinator + ?Sized,
{
    delete_children(client, path, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::mkdirs;
    use crate::testing::{MemoryCoordinator, Op};

    fn populated() -> MemoryCoordinator {
        let zk = MemoryCoordinator::new();
        mkdirs(&zk, "/a/b/c").unwrap();
        mkdirs(&zk, "/a/b/d").unwrap();
        mkdirs(&zk, "/a/e").unwrap();
        mkdirs(&zk, "/keep").unwrap();
        zk
    }

    #[test]
    fn test_delete_tree() {
        let zk = populated();

        delete_tree(&zk, "/a").unwrap();

        assert!(!zk.exists("/a").unwrap());
        assert!(zk.exists("/keep").unwrap());
        assert_eq!(zk.node_count(), 2);
    }

    #[test]
    fn test_delete_children_only() {
        let zk = populated();

        delete_children(&zk, "/a", false).unwrap();

        assert!(zk.exists("/a").unwrap());
        assert!(zk.get_children("/a").unwrap().is_empty());
        assert!(zk.exists("/keep").unwrap());
    }

    #[test]
    fn test_delete_leaf() {
        let zk = populated();

        delete_tree(&zk, "/a/e").unwrap();

        assert!(!zk.exists("/a/e").unwrap());
        assert!(zk.exists("/a/b/c").unwrap());
    }

    #[test]
    fn test_children_deleted_before_parent() {
        let zk = populated();
        zk.clear_calls();

        delete_tree(&zk, "/a").unwrap();

        let deletes: Vec<String> = zk
            .calls()
            .into_iter()
            .filter(|(op, _)| *op == Op::Delete)
            .map(|(_, path)| path)
            .collect();
        let pos = |p: &str| deletes.iter().position(|d| d == p).unwrap();

        assert_eq!(deletes.len(), 5);
        assert!(pos("/a/b/c") < pos("/a/b"));
        assert!(pos("/a/b/d") < pos("/a/b"));
        assert!(pos("/a/b") < pos("/a"));
        assert!(pos("/a/e") < pos("/a"));
        assert_eq!(deletes.last().map(String::as_str), Some("/a"));
    }

    #[test]
    fn test_delete_tree_at_root_keeps_root() {
        let zk = populated();

        delete_tree(&zk, "/").unwrap();

        assert!(zk.exists("/").unwrap());
        assert_eq!(zk.node_count(), 1);
        assert_eq!(zk.count_calls(Op::Delete), 6);
    }

    #[test]
    fn test_delete_missing_path() {
        let zk = MemoryCoordinator::new();

        let err = delete_tree(&zk, "/nope").unwrap_err();
        assert!(err.is_no_node());
    }

    #[test]
    fn test_delete_rejects_invalid_path() {
        let zk = MemoryCoordinator::new();

        let err = delete_tree(&zk, "a").unwrap_err();
        assert!(matches!(err, NamespaceError::InvalidPath { .. }));
        assert!(zk.calls().is_empty());
    }

    #[test]
    fn test_delete_redrains_on_new_child() {
        let zk = populated();
        zk.inject(Op::Delete, "/a/b", |tree| {
            tree.insert("/a/b/late", b"").unwrap();
        });

        delete_tree(&zk, "/a").unwrap();

        assert!(!zk.exists("/a").unwrap());
        assert!(!zk.exists("/a/b/late").unwrap());
    }

    #[test]
    fn test_delete_tolerates_concurrent_delete() {
        let zk = populated();
        zk.inject(Op::Delete, "/a/e", |tree| {
            tree.remove("/a/e").unwrap();
        });

        delete_tree(&zk, "/a").unwrap();
        assert!(!zk.exists("/a").unwrap());
    }

    #[test]
    fn test_delete_reports_vanished_descendant() {
        let zk = populated();
        zk.inject(Op::GetChildren, "/a/b", |tree| {
            tree.remove("/a/b/c").unwrap();
            tree.remove("/a/b/d").unwrap();
            tree.remove("/a/b").unwrap();
        });

        let err = delete_tree(&zk, "/a").unwrap_err();
        assert_eq!(err, NamespaceError::no_node("/a/b"));
        assert!(zk.exists("/a").unwrap());

        // A second pass finishes the job.
        delete_tree(&zk, "/a").unwrap();
        assert!(!zk.exists("/a").unwrap());
    }

    #[test]
    fn test_delete_reports_node_vanished_during_retry() {
        let zk = populated();
        zk.inject(Op::Delete, "/a/e", |tree| {
            tree.insert("/a/e/late", b"").unwrap();
        });
        // The first listing goes through; the node is gone by the second.
        zk.inject(Op::GetChildren, "/a/e", |_| {});
        zk.inject(Op::GetChildren, "/a/e", |tree| {
            tree.remove("/a/e/late").unwrap();
            tree.remove("/a/e").unwrap();
        });

        let err = delete_tree(&zk, "/a").unwrap_err();
        assert_eq!(err, NamespaceError::no_node("/a/e"));
    }

    #[test]
    fn test_delete_propagates_other_errors() {
        let zk = populated();
        zk.fail_next(Op::Delete, "/a/b", NamespaceError::SessionExpired);

        let err = delete_tree(&zk, "/a").unwrap_err();

        assert_eq!(err, NamespaceError::SessionExpired);
        assert!(zk.exists("/a/b").unwrap());
        assert!(!zk.exists("/a/b/c").unwrap());
    }

    #[test]
    fn test_delete_deep_tree() {
        let zk = MemoryCoordinator::new();
        let deep: String = (0..2000).map(|i| format!("/n{}", i)).collect();
        mkdirs(&zk, &deep).unwrap();

        delete_tree(&zk, "/n0").unwrap();
        assert_eq!(zk.node_count(), 1);
    }
}
