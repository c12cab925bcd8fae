//! In-memory coordinator for testing.
//!
//! Keeps the namespace in a `BTreeMap` behind a mutex, so one instance can be
//! shared between threads. Tests can also play "the other client": an
//! injected action runs against the tree right before a chosen call, which is
//! how the race windows inside the recursive operations are exercised.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::{
    node_name, open_acl_unsafe, parent_path, split_path, validate_path, validate_sequential_path,
    Acl, AclEntry, CreateMode, NamespaceError, Version, ANY_VERSION, ROOT_PATH,
};
use crate::service::Coordinator;

/// Coordinator operation, used to target injections and read the call log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// [`Coordinator::exists`]
    Exists,
    /// [`Coordinator::create`]
    Create,
    /// [`Coordinator::get_children`]
    GetChildren,
    /// [`Coordinator::delete`]
    Delete,
}

/// A stored node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryNode {
    /// Payload
    pub data: Vec<u8>,
    /// ACL given at creation
    pub acl: Acl,
    /// Creation mode
    pub mode: CreateMode,
    /// Data version
    pub version: Version,
    /// Child names in creation order
    children: Vec<String>,
    /// Next sequence number handed to a sequential child
    next_sequence: u32,
}

impl MemoryNode {
    fn new(data: &[u8], acl: Acl, mode: CreateMode) -> Self {
        Self {
            data: data.to_vec(),
            acl,
            mode,
            version: 0,
            children: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Child names in creation order.
    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// The namespace itself, with the service's single-node rules.
#[derive(Debug)]
pub struct MemoryTree {
    nodes: BTreeMap<String, MemoryNode>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            String::from(ROOT_PATH),
            MemoryNode::new(&[], open_acl_unsafe(), CreateMode::Persistent),
        );
        Self { nodes }
    }

    /// Check whether a node exists.
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Look up a node.
    pub fn get(&self, path: &str) -> Option<&MemoryNode> {
        self.nodes.get(path)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a persistent node with the open ACL.
    pub fn insert(&mut self, path: &str, data: &[u8]) -> Result<String, NamespaceError> {
        self.create(path, data, &open_acl_unsafe(), CreateMode::Persistent)
    }

    /// Create a node, applying the service's rules.
    pub fn create(
        &mut self,
        path: &str,
        data: &[u8],
        acl: &[AclEntry],
        mode: CreateMode,
    ) -> Result<String, NamespaceError> {
        validate_sequential_path(path, mode.is_sequential())?;
        if acl.is_empty() {
            return Err(NamespaceError::InvalidAcl {
                path: path.to_string(),
            });
        }

        let parent = parent_path(path).to_string();
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or_else(|| NamespaceError::no_node(path))?;
        if parent_node.mode.is_ephemeral() {
            return Err(NamespaceError::NoChildrenForEphemerals {
                path: path.to_string(),
            });
        }

        let actual = if mode.is_sequential() {
            format!("{}{:010}", path, parent_node.next_sequence)
        } else {
            path.to_string()
        };
        if self.nodes.contains_key(&actual) {
            return Err(NamespaceError::node_exists(actual));
        }

        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| NamespaceError::no_node(path))?;
        parent_node.next_sequence += 1;
        parent_node.children.push(node_name(&actual).to_string());

        self.nodes
            .insert(actual.clone(), MemoryNode::new(data, acl.to_vec(), mode));
        Ok(actual)
    }

    /// Child names of a node, in creation order.
    pub fn children(&self, path: &str) -> Result<Vec<String>, NamespaceError> {
        self.nodes
            .get(path)
            .map(|node| node.children.clone())
            .ok_or_else(|| NamespaceError::no_node(path))
    }

    /// Delete a childless node regardless of version.
    pub fn remove(&mut self, path: &str) -> Result<(), NamespaceError> {
        self.delete(path, ANY_VERSION)
    }

    /// Delete a childless node whose version matches.
    pub fn delete(&mut self, path: &str, version: Version) -> Result<(), NamespaceError> {
        validate_path(path)?;
        if path == ROOT_PATH {
            return Err(NamespaceError::BadArguments {
                path: path.to_string(),
            });
        }

        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| NamespaceError::no_node(path))?;
        if version != ANY_VERSION && version != node.version {
            return Err(NamespaceError::BadVersion {
                path: path.to_string(),
            });
        }
        if !node.children.is_empty() {
            return Err(NamespaceError::not_empty(path));
        }

        self.nodes.remove(path);
        let (parent, name) = split_path(path);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|child| child != name);
        }
        Ok(())
    }
}

type Action = Box<dyn FnOnce(&mut MemoryTree) + Send>;

struct Injection {
    op: Op,
    path: String,
    action: Action,
}

struct Failure {
    op: Op,
    path: String,
    error: NamespaceError,
}

#[derive(Default)]
struct State {
    tree: MemoryTree,
    injections: Vec<Injection>,
    failures: Vec<Failure>,
    calls: Vec<(Op, String)>,
}

impl State {
    /// Log the call, run a pending injection, and report a pending failure.
    fn begin(&mut self, op: Op, path: &str) -> Result<(), NamespaceError> {
        self.calls.push((op, path.to_string()));

        if let Some(pos) = self
            .injections
            .iter()
            .position(|i| i.op == op && i.path == path)
        {
            let injection = self.injections.remove(pos);
            (injection.action)(&mut self.tree);
        }

        if let Some(pos) = self
            .failures
            .iter()
            .position(|f| f.op == op && f.path == path)
        {
            return Err(self.failures.remove(pos).error);
        }

        Ok(())
    }
}

/// In-memory [`Coordinator`] for testing.
#[derive(Default)]
pub struct MemoryCoordinator {
    state: Mutex<State>,
}

impl MemoryCoordinator {
    /// Create a coordinator holding only the root.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `action` against the tree once, just before the next `op` on
    /// `path`, as if another client got there first. Several injections on
    /// the same call fire one per call, in the order they were added.
    pub fn inject<F>(&self, op: Op, path: &str, action: F)
    where
        F: FnOnce(&mut MemoryTree) + Send + 'static,
    {
        self.lock().injections.push(Injection {
            op,
            path: path.to_string(),
            action: Box::new(action),
        });
    }

    /// Make the next `op` on `path` fail with `error` without touching the tree.
    pub fn fail_next(&self, op: Op, path: &str, error: NamespaceError) {
        self.lock().failures.push(Failure {
            op,
            path: path.to_string(),
            error,
        });
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<(Op, String)> {
        self.lock().calls.clone()
    }

    /// Number of calls of one kind.
    pub fn count_calls(&self, op: Op) -> usize {
        self.lock().calls.iter().filter(|(o, _)| *o == op).count()
    }

    /// Forget the call log.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Snapshot of a node.
    pub fn node(&self, path: &str) -> Option<MemoryNode> {
        self.lock().tree.get(path).cloned()
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.lock().tree.len()
    }

    /// Run `f` with direct access to the tree. Nothing is logged.
    pub fn with_tree<R>(&self, f: impl FnOnce(&mut MemoryTree) -> R) -> R {
        f(&mut self.lock().tree)
    }
}

impl Coordinator for MemoryCoordinator {
    fn exists(&self, path: &str) -> Result<bool, NamespaceError> {
        let mut state = self.lock();
        state.begin(Op::Exists, path)?;
        validate_path(path)?;
        Ok(state.tree.contains(path))
    }

    fn create(
        &self,
        path: &str,
        data: &[u8],
        acl: &[AclEntry],
        mode: CreateMode,
    ) -> Result<String, NamespaceError> {
        let mut state = self.lock();
        state.begin(Op::Create, path)?;
        state.tree.create(path, data, acl, mode)
    }

    fn get_children(&self, path: &str) -> Result<Vec<String>, NamespaceError> {
        let mut state = self.lock();
        state.begin(Op::GetChildren, path)?;
        validate_path(path)?;
        state.tree.children(path)
    }

    fn delete(&self, path: &str, version: Version) -> Result<(), NamespaceError> {
        let mut state = self.lock();
        state.begin(Op::Delete, path)?;
        state.tree.delete(path, version)
    }
}
