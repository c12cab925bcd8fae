//! Coordinator trait and ACL providers

mod acl;
mod trait_def;

pub use acl::{resolve_acl, AclProvider, DefaultAclProvider, PrefixAclProvider};
pub use trait_def::Coordinator;
