//! The read-only store contract the decision engine evaluates against.
//!
//! Production deployments back this with a database; tests use
//! [`MemoryStore`](crate::MemoryStore). The engine has no dependency on
//! any particular persistence technology.

use std::collections::HashMap;

use palisade_abac::Policy;
use palisade_rbac::Permission;
use palisade_types::{RoleId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors from store operations.
///
/// Reads distinguish "no such data" (empty results, not an error) from
/// infrastructure failure (`Io`, `Corrupt`). Masking an outage as an
/// empty result would make it indistinguishable from a legitimate
/// deny-by-default outcome downstream.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write referenced an entity that does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// A write collided with an existing unique name or pair.
    #[error("{entity} '{name}' already exists")]
    AlreadyExists {
        entity: &'static str,
        name: String,
    },

    /// A policy is already assigned to the requested subject.
    #[error("policy '{policy}' is already assigned to this subject")]
    DuplicateAssignment { policy: String },

    /// A rule value failed write-time validation.
    #[error("rule on '{attribute}' has a malformed value: {detail}")]
    InvalidRule { attribute: String, detail: String },

    /// Underlying I/O failed.
    #[error("store i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be decoded.
    #[error("snapshot is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// RoleRef
// ============================================================================

/// A role membership as seen by the engine: id for assignment lookups,
/// name for principals and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    /// The role's row identifier.
    pub id: RoleId,
    /// The role's unique name.
    pub name: String,
}

// ============================================================================
// IdentityStore
// ============================================================================

/// Read accessors the evaluation path consumes.
///
/// All accessors treat an unknown user or role as "no data" and return
/// empty collections; only infrastructure failures surface as errors.
/// Implementations must be shareable across concurrent evaluations.
pub trait IdentityStore: Send + Sync {
    /// Returns every attribute row for the user, keyed by attribute name.
    fn user_attributes(&self, user_id: UserId) -> Result<HashMap<String, String>>;

    /// Returns the roles the user is a member of.
    fn user_roles(&self, user_id: UserId) -> Result<Vec<RoleRef>>;

    /// Returns the policies assigned directly to the user, rules included.
    fn policies_for_user(&self, user_id: UserId) -> Result<Vec<Policy>>;

    /// Returns the policies assigned to any of the given roles, rules
    /// included. A policy assigned to several of the roles appears once
    /// per assignment; de-duplication is the resolver's concern.
    fn policies_for_roles(&self, role_ids: &[RoleId]) -> Result<Vec<Policy>>;

    /// Returns the permissions granted to a role.
    fn role_permissions(&self, role_id: RoleId) -> Result<Vec<Permission>>;
}
