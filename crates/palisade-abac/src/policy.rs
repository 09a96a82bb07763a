//! Policy and assignment definitions.
//!
//! A policy targets one `(resource, action)` pair, asserts an effect
//! (allow or deny), and owns a set of rules that must all match. A
//! policy with no rules is a blanket policy: it matches unconditionally
//! once its resource/action guard passes.

use chrono::{DateTime, Utc};
use palisade_types::{AssignmentId, PolicyId, RoleId, UserId};
use serde::{Deserialize, Serialize};

use crate::rule::{PolicyRule, RuleOperator};

// ============================================================================
// Effect
// ============================================================================

/// The outcome a policy asserts when its rules match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Deny access. Any matching deny policy wins over any allow.
    Deny,
}

// ============================================================================
// Policy
// ============================================================================

/// An attribute-based access control policy.
///
/// Owns its rules; deleting a policy deletes them with it. Assignment
/// to roles and users is a separate record ([`PolicyAssignment`]), also
/// owned by the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Row identifier.
    pub id: PolicyId,
    /// Unique policy name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// The resource kind this policy applies to.
    pub resource: String,
    /// The action this policy applies to.
    pub action: String,
    /// Allow or deny.
    pub effect: Effect,
    /// The policy's rules. Order carries no meaning; all must match.
    pub rules: Vec<PolicyRule>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Creates a policy with a fresh id and no rules.
    pub fn new(name: &str, resource: &str, action: &str, effect: Effect) -> Self {
        let now = Utc::now();
        Self {
            id: PolicyId::new(),
            name: name.to_string(),
            description: None,
            resource: resource.to_string(),
            action: action.to_string(),
            effect,
            rules: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Adds a rule to the policy (builder pattern).
    pub fn with_rule(mut self, attribute: &str, operator: RuleOperator, value: &str) -> Self {
        self.rules
            .push(PolicyRule::new(self.id, attribute, operator, value));
        self
    }

    /// Returns whether this policy targets the given request pair.
    pub fn targets(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }

    /// Returns whether this is a blanket policy (no rules).
    pub fn is_blanket(&self) -> bool {
        self.rules.is_empty()
    }
}

// ============================================================================
// PolicyAssignment
// ============================================================================

/// The subject a policy is assigned to: a role or a user, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentSubject {
    /// Assigned to every member of a role.
    Role(RoleId),
    /// Assigned directly to one user.
    User(UserId),
}

/// Binds one policy to one subject.
///
/// Owned by the policy (deleted with it); also removed when the subject
/// role or user is deleted. Unique per `(policy, role)` and per
/// `(policy, user)` — the two uniqueness scopes are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAssignment {
    /// Row identifier.
    pub id: AssignmentId,
    /// The assigned policy.
    pub policy_id: PolicyId,
    /// The role or user receiving the policy.
    pub subject: AssignmentSubject,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PolicyAssignment {
    /// Assigns a policy to a role.
    pub fn to_role(policy_id: PolicyId, role_id: RoleId) -> Self {
        Self {
            id: AssignmentId::new(),
            policy_id,
            subject: AssignmentSubject::Role(role_id),
            created_at: Utc::now(),
        }
    }

    /// Assigns a policy directly to a user.
    pub fn to_user(policy_id: PolicyId, user_id: UserId) -> Self {
        Self {
            id: AssignmentId::new(),
            policy_id,
            subject: AssignmentSubject::User(user_id),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_builder_owns_rules() {
        let policy = Policy::new("eng-write", "users", "write", Effect::Allow)
            .with_rule("user.department", RuleOperator::Equals, "engineering")
            .with_rule("user.level", RuleOperator::Equals, "senior");

        assert_eq!(policy.rules.len(), 2);
        for rule in &policy.rules {
            assert_eq!(rule.policy_id, policy.id, "rules belong to their policy");
        }
    }

    #[test]
    fn test_policy_targets() {
        let policy = Policy::new("p", "users", "write", Effect::Allow);
        assert!(policy.targets("users", "write"));
        assert!(!policy.targets("users", "read"));
        assert!(!policy.targets("roles", "write"));
    }

    #[test]
    fn test_blanket_policy() {
        let blanket = Policy::new("blanket", "users", "read", Effect::Allow);
        assert!(blanket.is_blanket());

        let guarded = blanket.with_rule("user.level", RuleOperator::Equals, "senior");
        assert!(!guarded.is_blanket());
    }

    #[test]
    fn test_effect_wire_form() {
        assert_eq!(
            serde_json::to_string(&Effect::Allow).expect("serialize effect"),
            "\"allow\""
        );
        assert_eq!(
            serde_json::to_string(&Effect::Deny).expect("serialize effect"),
            "\"deny\""
        );
    }

    #[test]
    fn test_assignment_subjects() {
        let policy_id = PolicyId::new();
        let role_assignment = PolicyAssignment::to_role(policy_id, RoleId::new());
        let user_assignment = PolicyAssignment::to_user(policy_id, UserId::new());

        assert!(matches!(
            role_assignment.subject,
            AssignmentSubject::Role(_)
        ));
        assert!(matches!(
            user_assignment.subject,
            AssignmentSubject::User(_)
        ));
    }

    #[test]
    fn test_policy_serialization_roundtrip() {
        let policy = Policy::new("eng-write", "users", "write", Effect::Deny)
            .with_description("deny writes outside engineering")
            .with_rule("user.department", RuleOperator::NotEquals, "engineering");

        let json = serde_json::to_string(&policy).expect("serialize policy");
        let back: Policy = serde_json::from_str(&json).expect("deserialize policy");
        assert_eq!(back, policy);
    }
}
