//! Core types for the namespace layer.
//!
//! Defines ACL entries, permissions, and node creation modes.

/// Node version as reported by the service.
pub type Version = i32;

/// Version that matches any node version on delete.
pub const ANY_VERSION: Version = -1;

/// An access-control list: ordered permission entries attached at creation.
pub type Acl = Vec<AclEntry>;

/// Permissions granted by one ACL entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Perms {
    /// Read node data and list children
    pub read: bool,
    /// Set node data
    pub write: bool,
    /// Create children
    pub create: bool,
    /// Delete children
    pub delete: bool,
    /// Set the ACL
    pub admin: bool,
}

impl Perms {
    /// Every permission.
    pub const ALL: Perms = Perms {
        read: true,
        write: true,
        create: true,
        delete: true,
        admin: true,
    };

    /// Read only.
    pub const READ: Perms = Perms {
        read: true,
        write: false,
        create: false,
        delete: false,
        admin: false,
    };

    /// Parse the letter form used by service tooling: any combination of
    /// `r`, `w`, `c`, `d`, `a`, or the word `all`.
    ///
    /// Returns `None` for an unknown letter or an empty string.
    pub fn from_letters(letters: &str) -> Option<Self> {
        if letters.eq_ignore_ascii_case("all") {
            return Some(Self::ALL);
        }
        if letters.is_empty() {
            return None;
        }

        let mut perms = Self::default();
        for c in letters.chars() {
            match c.to_ascii_lowercase() {
                'r' => perms.read = true,
                'w' => perms.write = true,
                'c' => perms.create = true,
                'd' => perms.delete = true,
                'a' => perms.admin = true,
                _ => return None,
            }
        }
        Some(perms)
    }
}

/// Identity an ACL entry applies to: an authentication scheme and an id
/// within that scheme (`world:anyone`, `digest:user:hash`, `ip:10.0.0.0/8`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Id {
    /// Authentication scheme
    pub scheme: String,
    /// Scheme-specific identity
    pub id: String,
}

impl Id {
    /// Create an identity.
    pub fn new(scheme: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            id: id.into(),
        }
    }

    /// `world:anyone`, matching every client.
    pub fn anyone() -> Self {
        Self::new("world", "anyone")
    }

    /// `auth:`, replaced by the creator's authenticated ids on create.
    pub fn creator() -> Self {
        Self::new("auth", "")
    }
}

/// One permission entry of an ACL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AclEntry {
    /// Granted permissions
    pub perms: Perms,
    /// Who the permissions are granted to
    pub id: Id,
}

impl AclEntry {
    /// Create an ACL entry.
    pub fn new(perms: Perms, id: Id) -> Self {
        Self { perms, id }
    }
}

/// Completely open ACL: every permission for everyone.
///
/// This is the fallback used when no ACL provider is configured.
pub fn open_acl_unsafe() -> Acl {
    vec![AclEntry::new(Perms::ALL, Id::anyone())]
}

/// Every permission for the creator's authenticated identities.
pub fn creator_all_acl() -> Acl {
    vec![AclEntry::new(Perms::ALL, Id::creator())]
}

/// Read permission for everyone.
pub fn read_acl_unsafe() -> Acl {
    vec![AclEntry::new(Perms::READ, Id::anyone())]
}

/// How a node is created and how long it lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CreateMode {
    /// Survives the creating session
    #[default]
    Persistent,
    /// Persistent, with a sequence number appended to the name
    PersistentSequential,
    /// Removed when the creating session ends
    Ephemeral,
    /// Ephemeral, with a sequence number appended to the name
    EphemeralSequential,
}

impl CreateMode {
    /// Check if the service appends a sequence number.
    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::PersistentSequential | Self::EphemeralSequential)
    }

    /// Check if the node is tied to the creating session.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral | Self::EphemeralSequential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perms_from_letters() {
        assert_eq!(Perms::from_letters("all"), Some(Perms::ALL));
        assert_eq!(Perms::from_letters("ALL"), Some(Perms::ALL));
        assert_eq!(Perms::from_letters("rwcda"), Some(Perms::ALL));
        assert_eq!(Perms::from_letters("r"), Some(Perms::READ));

        let rw = Perms::from_letters("rw").unwrap();
        assert!(rw.read && rw.write);
        assert!(!rw.create && !rw.delete && !rw.admin);

        assert_eq!(Perms::from_letters(""), None);
        assert_eq!(Perms::from_letters("rx"), None);
    }

    #[test]
    fn test_well_known_acls() {
        let open = open_acl_unsafe();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].perms, Perms::ALL);
        assert_eq!(open[0].id, Id::anyone());

        assert_eq!(creator_all_acl()[0].id.scheme, "auth");
        assert_eq!(read_acl_unsafe()[0].perms, Perms::READ);
    }

    #[test]
    fn test_create_mode() {
        assert_eq!(CreateMode::default(), CreateMode::Persistent);
        assert!(!CreateMode::Persistent.is_sequential());
        assert!(CreateMode::PersistentSequential.is_sequential());
        assert!(!CreateMode::PersistentSequential.is_ephemeral());
        assert!(CreateMode::EphemeralSequential.is_ephemeral());
        assert!(CreateMode::EphemeralSequential.is_sequential());
    }
}
