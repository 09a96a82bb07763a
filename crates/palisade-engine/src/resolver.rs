//! Attribute and policy resolution against the identity store.

use std::collections::{HashMap, HashSet};

use palisade_abac::Policy;
use palisade_store::{IdentityStore, Result, RoleRef};
use palisade_types::{RoleId, UserId};
use tracing::debug;

// ============================================================================
// AttributeResolver
// ============================================================================

/// Resolves a principal's stored attribute rows.
///
/// An unknown principal resolves to an empty map rather than an error;
/// the decision engine's deny-by-default posture covers the rest. Each
/// call re-reads the store — callers wanting caching can wrap the
/// store behind the same trait.
#[derive(Debug)]
pub struct AttributeResolver<'a, S> {
    store: &'a S,
}

impl<'a, S: IdentityStore> AttributeResolver<'a, S> {
    /// Creates a resolver over the given store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns the user's attribute rows keyed by attribute name.
    pub fn resolve(&self, user_id: UserId) -> Result<HashMap<String, String>> {
        self.store.user_attributes(user_id)
    }

    /// Overlays the stored rows onto a caller-supplied base map.
    ///
    /// The store is authoritative: a stored row replaces a claimed one
    /// under the same key.
    pub fn resolve_over(
        &self,
        user_id: UserId,
        base: &HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let mut merged = base.clone();
        merged.extend(self.resolve(user_id)?);
        Ok(merged)
    }
}

// ============================================================================
// PolicyResolver
// ============================================================================

/// Determines the set of policies applicable to a principal.
#[derive(Debug)]
pub struct PolicyResolver<'a, S> {
    store: &'a S,
}

impl<'a, S: IdentityStore> PolicyResolver<'a, S> {
    /// Creates a resolver over the given store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns the policies assigned directly to the user or to any of
    /// the user's roles, de-duplicated by policy id.
    ///
    /// A policy reachable both directly and through a role counts
    /// once. An unknown user resolves to an empty set.
    pub fn resolve(&self, user_id: UserId) -> Result<Vec<Policy>> {
        let roles = self.store.user_roles(user_id)?;
        let role_ids: Vec<RoleId> = roles.iter().map(|role| role.id).collect();

        let mut policies = self.store.policies_for_user(user_id)?;
        policies.extend(self.store.policies_for_roles(&role_ids)?);

        let mut seen = HashSet::new();
        policies.retain(|policy| seen.insert(policy.id));

        debug!(
            user = %user_id,
            roles = roles.len(),
            policies = policies.len(),
            "resolved applicable policies"
        );
        Ok(policies)
    }

    /// Returns the user's role memberships (ids and names).
    pub fn roles(&self, user_id: UserId) -> Result<Vec<RoleRef>> {
        self.store.user_roles(user_id)
    }
}

// ============================================================================
// Tests
// ============================================================================
