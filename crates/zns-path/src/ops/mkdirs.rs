//! Recursive node creation.

use tracing::{debug, trace};

use crate::core::{path_prefixes, validate_path, CreateMode, NamespaceError};
use crate::service::{resolve_acl, AclProvider, Coordinator};

/// Make sure every node along `path`, including the last one, exists.
///
/// Unlike a filesystem, the service does not distinguish directories from
/// files, so each segment becomes a node. New nodes get an empty payload and
/// the open ACL.
pub fn mkdirs<C>(client: &C, path: &str) -> Result<(), NamespaceError>
where
    C: Coordinator + ?Sized,
{
    mkdirs_with_options(client, path, true, None)
}

/// Make sure the nodes along `path` exist.
///
/// # Arguments
/// - `make_last_node`: if false only the ancestors are created, leaving the
///   last segment for the caller (e.g. to create it ephemeral or with data)
/// - `acl_provider`: ACL source for created nodes; the open ACL when `None`
///
/// Nodes that already exist are left untouched. A node created by another
/// client between the existence check and the create counts as success.
pub fn mkdirs_with_options<C>(
    client: &C,
    path: &str,
    make_last_node: bool,
    acl_provider: Option<&dyn AclProvider>,
) -> Result<(), NamespaceError>
where
    C: Coordinator + ?Sized,
{
    validate_path(path)?;

    for prefix in path_prefixes(path) {
        if !make_last_node && prefix.len() == path.len() {
            break;
        }
        if client.exists(prefix)? {
            continue;
        }

        let acl = resolve_acl(acl_provider, prefix);
        match client.create(prefix, &[], &acl, CreateMode::Persistent) {
            Ok(_) => debug!("created {}", prefix),
            Err(NamespaceError::NodeExists { .. }) => {
                trace!("{} created concurrently, continuing", prefix);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
