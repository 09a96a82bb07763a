//! Permission types for access control.
//!
//! A permission is a named `(resource, action)` capability, e.g.
//! `users.read` covers `resource = "users", action = "read"`. The
//! `(resource, action)` pair is unique across all permissions, as is the
//! name.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use palisade_types::PermissionId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Permission
// ============================================================================

/// A capability that can be granted to a role.
///
/// Permissions are configuration rows: created and deleted by
/// administration, read-only to the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Row identifier.
    pub id: PermissionId,
    /// Unique human-readable name, conventionally `resource.action`.
    pub name: String,
    /// The resource kind this permission covers (e.g. "users").
    pub resource: String,
    /// The action this permission covers (e.g. "read").
    pub action: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Creates a new permission with a fresh id and current timestamps.
    pub fn new(name: &str, resource: &str, action: &str) -> Self {
        let now = Utc::now();
        Self {
            id: PermissionId::new(),
            name: name.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
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

    /// Returns whether this permission covers the given request pair.
    pub fn covers(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

// ============================================================================
// PermissionSet
// ============================================================================

/// The effective set of `(resource, action)` capabilities held by a
/// principal, flattened across all of their roles.
///
/// Lookup is by pair, so the set answers "may `write` on `users`?"
/// without caring which role contributed the grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    entries: BTreeSet<(String, String)>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collects the `(resource, action)` pairs of the given permissions.
    pub fn from_permissions<'a>(permissions: impl IntoIterator<Item = &'a Permission>) -> Self {
        let entries = permissions
            .into_iter()
            .map(|p| (p.resource.clone(), p.action.clone()))
            .collect();
        Self { entries }
    }

    /// Adds a capability to the set. Duplicate grants are no-ops.
    pub fn grant(&mut self, resource: &str, action: &str) {
        self.entries
            .insert((resource.to_string(), action.to_string()));
    }

    /// Removes a capability from the set.
    pub fn revoke(&mut self, resource: &str, action: &str) {
        self.entries
            .remove(&(resource.to_string(), action.to_string()));
    }

    /// Returns whether this set covers the given request pair.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.entries
            .contains(&(resource.to_string(), action.to_string()))
    }

    /// Returns the number of distinct capabilities in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the set holds no capabilities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the `(resource, action)` pairs in the set.
    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
