//! Role definitions and the join records that connect them.
//!
//! Roles are named, administration-managed bundles of permission grants.
//! A user may hold any number of roles; a role may carry any number of
//! permissions. Both relations are explicit join records, unique per
//! pair.

use chrono::{DateTime, Utc};
use palisade_types::{PermissionId, RoleId, UserId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Role
// ============================================================================

/// A role in the access control system.
///
/// Unlike a fixed role ladder, roles here are data: the seed
/// configuration ships `admin`, `user` and `guest`, but deployments
/// define their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Row identifier.
    pub id: RoleId,
    /// Unique role name (e.g. "admin").
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role with a fresh id and current timestamps.
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: RoleId::new(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

// ============================================================================
// Join records
// ============================================================================

/// Grants one permission to one role. Unique per `(role, permission)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleGrant {
    /// The role receiving the permission.
    pub role_id: RoleId,
    /// The permission being granted.
    pub permission_id: PermissionId,
}

/// Places one user in one role. Unique per `(user, role)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleMembership {
    /// The member user.
    pub user_id: UserId,
    /// The role the user belongs to.
    pub role_id: RoleId,
}

// ============================================================================
// Tests
// ============================================================================
