//! Identities and role-based capabilities.
//!
//! Identities arrive pre-authenticated; this crate never creates them. The
//! role is a closed enum mapped to a permission set by a pure function, and
//! the check happens once at the action boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role an identity holds within the signing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May sign documents and verify signatures.
    Signer,
    /// May sign, verify, and manage the ledger.
    Admin,
    /// May only verify.
    Viewer,
}

/// A capability granted by a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Create signatures over documents.
    Sign,
    /// Verify signatures and scan proofs.
    Verify,
    /// Remove or purge ledger records.
    ManageLedger,
}

impl Role {
    /// The full permission set for this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Signer => &[Permission::Sign, Permission::Verify],
            Role::Admin => &[Permission::Sign, Permission::Verify, Permission::ManageLedger],
            Role::Viewer => &[Permission::Verify],
        }
    }

    /// Whether this role holds the given permission.
    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Whether this role may sign documents.
    pub fn can_sign(self) -> bool {
        self.allows(Permission::Sign)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Signer => "signer",
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        };
        write!(f, "{name}")
    }
}

/// A pre-authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable address for the identity; keys are stored against it.
    pub email: String,
    /// Human-readable name recorded on signatures.
    pub display_name: String,
    /// Capability role.
    pub role: Role,
}

impl Identity {
    /// Create an identity.
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_and_admin_can_sign() {
        assert!(Role::Signer.can_sign());
        assert!(Role::Admin.can_sign());
        assert!(!Role::Viewer.can_sign());
    }

    #[test]
    fn test_only_admin_manages_ledger() {
        assert!(Role::Admin.allows(Permission::ManageLedger));
        assert!(!Role::Signer.allows(Permission::ManageLedger));
        assert!(!Role::Viewer.allows(Permission::ManageLedger));
    }

    #[test]
    fn test_everyone_verifies() {
        for role in [Role::Signer, Role::Admin, Role::Viewer] {
            assert!(role.allows(Permission::Verify));
        }
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let back: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(back, Role::Viewer);
    }

    #[test]
    fn test_identity_serde_camel_case() {
        let id = Identity::new("ana@example.org", "Ana Torres", Role::Signer);
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("\"displayName\":\"Ana Torres\""));
        assert!(json.contains("\"role\":\"signer\""));
    }
}
