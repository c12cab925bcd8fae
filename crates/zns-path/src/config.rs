//! ACL policy configuration.
//!
//! A policy is a JSON document naming a default ACL and per-prefix ACLs:
//!
//! ```json
//! {
//!   "default": [{ "perms": "all", "scheme": "world", "id": "anyone" }],
//!   "paths": {
//!     "/app/locks": [{ "perms": "rwcd", "scheme": "digest", "id": "app:hash" }]
//!   }
//! }
//! ```
//!
//! Both keys are optional. A missing `default` means the open ACL.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::{open_acl_unsafe, validate_path, Acl, AclEntry, Id, NamespaceError, Perms};
use crate::service::PrefixAclProvider;

/// Errors from loading an ACL policy.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("malformed ACL policy: {0}")]
    Json(#[from] serde_json::Error),

    /// A `perms` string contains something other than `r w c d a` or `all`.
    #[error("invalid permissions {perms:?} for {scope}")]
    InvalidPerms { scope: String, perms: String },

    /// An ACL list is empty; the service rejects nodes without entries.
    #[error("empty ACL for {scope}")]
    EmptyAcl { scope: String },

    /// A configured prefix is not a valid path.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(#[from] NamespaceError),
}

/// One ACL entry in the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AclEntryConfig {
    /// Permission letters (`r`, `w`, `c`, `d`, `a`) or `all`
    pub perms: String,
    /// Authentication scheme
    pub scheme: String,
    /// Identity within the scheme
    #[serde(default)]
    pub id: String,
}

/// ACL policy as read from configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AclPolicyConfig {
    /// ACL used when no prefix matches
    #[serde(default)]
    pub default: Option<Vec<AclEntryConfig>>,
    /// Path prefix -> ACL
    #[serde(default)]
    pub paths: BTreeMap<String, Vec<AclEntryConfig>>,
}

impl AclPolicyConfig {
    /// Parse a policy from a JSON string.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Build the provider this policy describes.
    pub fn build(&self) -> Result<PrefixAclProvider, ConfigError> {
        let default = match &self.default {
            Some(entries) => convert_acl("default", entries)?,
            None => open_acl_unsafe(),
        };

        let mut provider = PrefixAclProvider::new(default);
        for (prefix, entries) in &self.paths {
            validate_path(prefix)?;
            provider.insert(prefix.clone(), convert_acl(prefix, entries)?);
        }
        Ok(provider)
    }
}

impl PrefixAclProvider {
    /// Build a provider from a parsed policy.
    pub fn from_config(config: &AclPolicyConfig) -> Result<Self, ConfigError> {
        config.build()
    }

    /// Build a provider from a JSON policy document.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        AclPolicyConfig::from_json(data)?.build()
    }
}

fn convert_acl(scope: &str, entries: &[AclEntryConfig]) -> Result<Acl, ConfigError> {
    if entries.is_empty() {
        return Err(ConfigError::EmptyAcl {
            scope: scope.to_string(),
        });
    }

    entries
        .iter()
        .map(|entry| -> Result<AclEntry, ConfigError> {
            let perms =
                Perms::from_letters(&entry.perms).ok_or_else(|| ConfigError::InvalidPerms {
                    scope: scope.to_string(),
                    perms: entry.perms.clone(),
                })?;
            Ok(AclEntry::new(perms, Id::new(&entry.scheme, &entry.id)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AclProvider;

    const POLICY: &str = r#"{
        "default": [{ "perms": "r", "scheme": "world", "id": "anyone" }],
        "paths": {
            "/app": [
                { "perms": "all", "scheme": "digest", "id": "app:hash" },
                { "perms": "r", "scheme": "world", "id": "anyone" }
            ]
        }
    }"#;

    #[test]
    fn test_parse_policy() {
        let config = AclPolicyConfig::from_json(POLICY).unwrap();
        assert_eq!(config.paths.len(), 1);
        assert_eq!(config.default.as_ref().unwrap()[0].perms, "r");
    }

    #[test]
    fn test_build_provider() {
        let provider = PrefixAclProvider::from_json(POLICY).unwrap();

        assert_eq!(provider.default_acl()[0].perms, Perms::READ);

        let app = provider.acl_for_path(Some("/app/locks")).unwrap();
        assert_eq!(app.len(), 2);
        assert_eq!(app[0].perms, Perms::ALL);
        assert_eq!(app[0].id, Id::new("digest", "app:hash"));

        assert_eq!(provider.acl_for_path(Some("/elsewhere")), None);
    }

    #[test]
    fn test_empty_policy_is_open() {
        let provider = PrefixAclProvider::from_json("{}").unwrap();
        assert_eq!(provider.default_acl(), open_acl_unsafe());
        assert!(provider.is_empty());
    }

    #[test]
    fn test_invalid_perms() {
        let err = PrefixAclProvider::from_json(
            r#"{ "paths": { "/a": [{ "perms": "rx", "scheme": "world", "id": "anyone" }] } }"#,
        )
        .unwrap_err();
        match err {
            ConfigError::InvalidPerms { scope, perms } => {
                assert_eq!(scope, "/a");
                assert_eq!(perms, "rx");
            }
            other => panic!("expected InvalidPerms, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_acl_rejected() {
        let err = PrefixAclProvider::from_json(r#"{ "default": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAcl { .. }));
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let err = PrefixAclProvider::from_json(
            r#"{ "paths": { "app/": [{ "perms": "all", "scheme": "world", "id": "anyone" }] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = AclPolicyConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
