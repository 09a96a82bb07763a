//! Policy rules and their comparison operators.
//!
//! A rule is one `attribute path ∘ operator ∘ value` predicate. A
//! policy matches only when every one of its rules evaluates `true`
//! (a single AND-conjunction; there is no rule nesting).

use chrono::{DateTime, Utc};
use palisade_types::{PolicyId, RuleId};
use serde::{Deserialize, Serialize};

// ============================================================================
// RuleOperator
// ============================================================================

/// The comparison a rule applies between the resolved attribute value
/// and the rule's stored value.
///
/// Operators are persisted in their wire form (`equals`, `notEquals`,
/// ...). Strings outside the known set are preserved as [`Other`] so a
/// snapshot written by a newer version still loads; such rules simply
/// evaluate `false`.
///
/// [`Other`]: RuleOperator::Other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleOperator {
    /// String equality against the rule value.
    Equals,
    /// String inequality against the rule value.
    NotEquals,
    /// Membership in the rule value, a JSON array of strings.
    In,
    /// Non-membership in the rule value, a JSON array of strings.
    NotIn,
    /// Substring containment of the rule value in the attribute value.
    Contains,
    /// Numeric `>` with both sides parsed as floats.
    GreaterThan,
    /// Numeric `<` with both sides parsed as floats.
    LessThan,
    /// An operator this version does not know. Always evaluates `false`.
    Other(String),
}

impl RuleOperator {
    /// The wire form of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Contains => "contains",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::Other(tag) => tag,
        }
    }

    /// Returns whether the rule value is expected to be a JSON array.
    pub fn takes_list_value(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl From<String> for RuleOperator {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "equals" => Self::Equals,
            "notEquals" => Self::NotEquals,
            "in" => Self::In,
            "notIn" => Self::NotIn,
            "contains" => Self::Contains,
            "greaterThan" => Self::GreaterThan,
            "lessThan" => Self::LessThan,
            _ => Self::Other(tag),
        }
    }
}

impl From<RuleOperator> for String {
    fn from(op: RuleOperator) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PolicyRule
// ============================================================================

/// A single attribute predicate within a policy.
///
/// Rules are owned by their policy and are deleted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Row identifier.
    pub id: RuleId,
    /// The owning policy.
    pub policy_id: PolicyId,
    /// Dotted attribute path, e.g. `user.department`.
    pub attribute: String,
    /// The comparison to apply.
    pub operator: RuleOperator,
    /// The comparison operand. For `in`/`notIn`, a JSON-encoded array
    /// of strings.
    pub value: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PolicyRule {
    /// Creates a rule owned by the given policy.
    pub fn new(policy_id: PolicyId, attribute: &str, operator: RuleOperator, value: &str) -> Self {
        let now = Utc::now();
        Self {
            id: RuleId::new(),
            policy_id,
            attribute: attribute.to_string(),
            operator,
            value: value.to_string(),
            created_at: now,
            updated_at: now,
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
    fn test_operator_wire_roundtrip() {
        for tag in [
            "equals",
            "notEquals",
            "in",
            "notIn",
            "contains",
            "greaterThan",
            "lessThan",
        ] {
            let op = RuleOperator::from(tag.to_string());
            assert!(!matches!(op, RuleOperator::Other(_)), "{tag} is a known operator");
            assert_eq!(op.as_str(), tag);
        }
    }

    #[test]
    fn test_unknown_operator_is_preserved() {
        let op = RuleOperator::from("matchesRegex".to_string());
        assert_eq!(op, RuleOperator::Other("matchesRegex".to_string()));
        assert_eq!(op.as_str(), "matchesRegex");
    }

    #[test]
    fn test_operator_serde_uses_wire_form() {
        let json = serde_json::to_string(&RuleOperator::NotEquals).expect("serialize operator");
        assert_eq!(json, "\"notEquals\"");

        let op: RuleOperator = serde_json::from_str("\"in\"").expect("deserialize operator");
        assert_eq!(op, RuleOperator::In);

        let op: RuleOperator = serde_json::from_str("\"regex\"").expect("unknown still loads");
        assert_eq!(op, RuleOperator::Other("regex".to_string()));
    }

    #[test]
    fn test_list_valued_operators() {
        assert!(RuleOperator::In.takes_list_value());
        assert!(RuleOperator::NotIn.takes_list_value());
        assert!(!RuleOperator::Equals.takes_list_value());
        assert!(!RuleOperator::Contains.takes_list_value());
    }
}
