//! Arena-style in-memory store.
//!
//! Every entity lives in an id-keyed map; join rows are plain pair
//! sets. Ownership follows the configuration model: a policy owns its
//! rules (they live inside the [`Policy`] value) and its assignments,
//! so removing a policy removes both. Removing a role or user removes
//! the join rows and assignments that reference it — never the policy
//! on the other end.
//!
//! Write operations enforce the uniqueness and existence invariants at
//! the edge, so a `MemoryStore` reachable through safe operations is
//! always internally consistent.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use palisade_abac::{AssignmentSubject, Policy, PolicyAssignment};
use palisade_rbac::{Permission, Role, RoleGrant, RoleMembership};
use palisade_types::{AssignmentId, PermissionId, PolicyId, RoleId, UserId};
use serde::{Deserialize, Serialize};

use crate::traits::{IdentityStore, Result, RoleRef, StoreError};
use crate::users::User;

/// In-memory identity and policy configuration.
///
/// Deterministic: iteration order follows id order, so repeated
/// evaluations against the same configuration walk policies in the
/// same sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    users: BTreeMap<UserId, User>,
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    policies: BTreeMap<PolicyId, Policy>,
    assignments: BTreeMap<AssignmentId, PolicyAssignment>,
    grants: BTreeSet<RoleGrant>,
    memberships: BTreeSet<RoleMembership>,
    attributes: BTreeMap<UserId, BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Inserts
    // ------------------------------------------------------------------

    /// Adds a user. The email must be unique.
    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::AlreadyExists {
                entity: "user",
                name: user.email,
            });
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    /// Adds a role. The name must be unique.
    pub fn insert_role(&mut self, role: Role) -> Result<()> {
        if self.roles.values().any(|r| r.name == role.name) {
            return Err(StoreError::AlreadyExists {
                entity: "role",
                name: role.name,
            });
        }
        self.roles.insert(role.id, role);
        Ok(())
    }

    /// Adds a permission. Both the name and the `(resource, action)`
    /// pair must be unique.
    pub fn insert_permission(&mut self, permission: Permission) -> Result<()> {
        if self.permissions.values().any(|p| p.name == permission.name) {
            return Err(StoreError::AlreadyExists {
                entity: "permission",
                name: permission.name,
            });
        }
        if self
            .permissions
            .values()
            .any(|p| p.covers(&permission.resource, &permission.action))
        {
            return Err(StoreError::AlreadyExists {
                entity: "permission",
                name: format!("{}.{}", permission.resource, permission.action),
            });
        }
        self.permissions.insert(permission.id, permission);
        Ok(())
    }

    /// Adds a policy, rules included. The name must be unique, and
    /// `in`/`notIn` rule values must parse as JSON string arrays —
    /// catching the malformation at write time instead of silently
    /// never matching. Snapshots loaded from disk bypass this check;
    /// evaluation stays fail-closed either way.
    pub fn insert_policy(&mut self, policy: Policy) -> Result<()> {
        if self.policies.values().any(|p| p.name == policy.name) {
            return Err(StoreError::AlreadyExists {
                entity: "policy",
                name: policy.name,
            });
        }
        for rule in &policy.rules {
            if rule.operator.takes_list_value() {
                if let Err(err) = serde_json::from_str::<Vec<String>>(&rule.value) {
                    return Err(StoreError::InvalidRule {
                        attribute: rule.attribute.clone(),
                        detail: err.to_string(),
                    });
                }
            }
        }
        self.policies.insert(policy.id, policy);
        Ok(())
    }

    /// Grants a permission to a role. Unique per pair.
    pub fn grant_permission(&mut self, role_id: RoleId, permission_id: PermissionId) -> Result<()> {
        self.require_role(role_id)?;
        if !self.permissions.contains_key(&permission_id) {
            return Err(StoreError::NotFound {
                entity: "permission",
                id: permission_id.to_string(),
            });
        }
        let grant = RoleGrant {
            role_id,
            permission_id,
        };
        if !self.grants.insert(grant) {
            return Err(StoreError::AlreadyExists {
                entity: "grant",
                name: format!("{role_id}:{permission_id}"),
            });
        }
        Ok(())
    }

    /// Places a user in a role. Unique per pair.
    pub fn add_role_member(&mut self, user_id: UserId, role_id: RoleId) -> Result<()> {
        self.require_user(user_id)?;
        self.require_role(role_id)?;
        let membership = RoleMembership { user_id, role_id };
        if !self.memberships.insert(membership) {
            return Err(StoreError::AlreadyExists {
                entity: "membership",
                name: format!("{user_id}:{role_id}"),
            });
        }
        Ok(())
    }

    /// Records one attribute row for a user. Unique per `(user, key)`.
    pub fn insert_attribute(&mut self, user_id: UserId, key: &str, value: &str) -> Result<()> {
        self.require_user(user_id)?;
        let rows = self.attributes.entry(user_id).or_default();
        if rows.contains_key(key) {
            return Err(StoreError::AlreadyExists {
                entity: "attribute",
                name: key.to_string(),
            });
        }
        rows.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Assigns a policy to a role.
    ///
    /// Checked by existence scan, not a mere uniqueness key: the
    /// `(policy, role)` and `(policy, user)` scopes are independent, so
    /// the same policy may also be assigned to any number of users.
    pub fn assign_policy_to_role(&mut self, policy_id: PolicyId, role_id: RoleId) -> Result<()> {
        let policy_name = self.require_policy(policy_id)?.name.clone();
        self.require_role(role_id)?;
        let subject = AssignmentSubject::Role(role_id);
        if self
            .assignments
            .values()
            .any(|a| a.policy_id == policy_id && a.subject == subject)
        {
            return Err(StoreError::DuplicateAssignment {
                policy: policy_name,
            });
        }
        let assignment = PolicyAssignment::to_role(policy_id, role_id);
        self.assignments.insert(assignment.id, assignment);
        Ok(())
    }

    /// Assigns a policy directly to a user.
    pub fn assign_policy_to_user(&mut self, policy_id: PolicyId, user_id: UserId) -> Result<()> {
        let policy_name = self.require_policy(policy_id)?.name.clone();
        self.require_user(user_id)?;
        let subject = AssignmentSubject::User(user_id);
        if self
            .assignments
            .values()
            .any(|a| a.policy_id == policy_id && a.subject == subject)
        {
            return Err(StoreError::DuplicateAssignment {
                policy: policy_name,
            });
        }
        let assignment = PolicyAssignment::to_user(policy_id, user_id);
        self.assignments.insert(assignment.id, assignment);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Removals (cascading)
    // ------------------------------------------------------------------

    /// Removes a policy together with its rules and assignments.
    pub fn remove_policy(&mut self, policy_id: PolicyId) -> Result<()> {
        if self.policies.remove(&policy_id).is_none() {
            return Err(StoreError::NotFound {
                entity: "policy",
                id: policy_id.to_string(),
            });
        }
        self.assignments.retain(|_, a| a.policy_id != policy_id);
        Ok(())
    }

    /// Removes a role together with its grants, memberships, and
    /// policy assignments. Policies assigned to the role survive.
    pub fn remove_role(&mut self, role_id: RoleId) -> Result<()> {
        if self.roles.remove(&role_id).is_none() {
            return Err(StoreError::NotFound {
                entity: "role",
                id: role_id.to_string(),
            });
        }
        self.grants.retain(|g| g.role_id != role_id);
        self.memberships.retain(|m| m.role_id != role_id);
        self.assignments
            .retain(|_, a| a.subject != AssignmentSubject::Role(role_id));
        Ok(())
    }

    /// Removes a user together with their memberships, attributes, and
    /// direct policy assignments. Policies assigned to the user survive.
    pub fn remove_user(&mut self, user_id: UserId) -> Result<()> {
        if self.users.remove(&user_id).is_none() {
            return Err(StoreError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            });
        }
        self.memberships.retain(|m| m.user_id != user_id);
        self.attributes.remove(&user_id);
        self.assignments
            .retain(|_, a| a.subject != AssignmentSubject::User(user_id));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Finds a user by unique email.
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    /// Finds a role by unique name.
    pub fn role_named(&self, name: &str) -> Option<&Role> {
        self.roles.values().find(|r| r.name == name)
    }

    /// Finds a permission by unique name.
    pub fn permission_named(&self, name: &str) -> Option<&Permission> {
        self.permissions.values().find(|p| p.name == name)
    }

    /// Finds a policy by unique name.
    pub fn policy_named(&self, name: &str) -> Option<&Policy> {
        self.policies.values().find(|p| p.name == name)
    }

    fn require_user(&self, user_id: UserId) -> Result<&User> {
        self.users.get(&user_id).ok_or(StoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
    }

    fn require_role(&self, role_id: RoleId) -> Result<&Role> {
        self.roles.get(&role_id).ok_or(StoreError::NotFound {
            entity: "role",
            id: role_id.to_string(),
        })
    }

    fn require_policy(&self, policy_id: PolicyId) -> Result<&Policy> {
        self.policies.get(&policy_id).ok_or(StoreError::NotFound {
            entity: "policy",
            id: policy_id.to_string(),
        })
    }
}

// ============================================================================
// IdentityStore
// ============================================================================

impl IdentityStore for MemoryStore {
    fn user_attributes(&self, user_id: UserId) -> Result<HashMap<String, String>> {
        Ok(self
            .attributes
            .get(&user_id)
            .map(|rows| {
                rows.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn user_roles(&self, user_id: UserId) -> Result<Vec<RoleRef>> {
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| self.roles.get(&m.role_id))
            .map(|role| RoleRef {
                id: role.id,
                name: role.name.clone(),
            })
            .collect())
    }

    fn policies_for_user(&self, user_id: UserId) -> Result<Vec<Policy>> {
        Ok(self
            .assignments
            .values()
            .filter(|a| a.subject == AssignmentSubject::User(user_id))
            .filter_map(|a| self.policies.get(&a.policy_id))
            .cloned()
            .collect())
    }

    fn policies_for_roles(&self, role_ids: &[RoleId]) -> Result<Vec<Policy>> {
        Ok(self
            .assignments
            .values()
            .filter(|a| match a.subject {
                AssignmentSubject::Role(role_id) => role_ids.contains(&role_id),
                AssignmentSubject::User(_) => false,
            })
            .filter_map(|a| self.policies.get(&a.policy_id))
            .cloned()
            .collect())
    }

    fn role_permissions(&self, role_id: RoleId) -> Result<Vec<Permission>> {
        Ok(self
            .grants
            .iter()
            .filter(|g| g.role_id == role_id)
            .filter_map(|g| self.permissions.get(&g.permission_id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
