//! Core namespace types and path utilities

mod error;
mod path;
mod types;

pub use error::NamespaceError;
pub use path::{
    is_under, make_path, make_path_all, node_name, parent_path, path_prefixes, split_path,
    validate_path, validate_sequential_path, PATH_SEPARATOR, ROOT_PATH,
};
pub use types::{
    creator_all_acl, open_acl_unsafe, read_acl_unsafe, Acl, AclEntry, CreateMode, Id, Perms,
    Version, ANY_VERSION,
};
