//! Rule and policy evaluation.
//!
//! Evaluation is fail-closed: every malformed input degrades to the
//! rule evaluating `false`, never to an error. Denying on bad
//! configuration is acceptable; allowing on bad configuration is not.

use tracing::trace;

use crate::context::EvaluationContext;
use crate::policy::Policy;
use crate::rule::{PolicyRule, RuleOperator};

// ============================================================================
// Rule evaluation
// ============================================================================

/// Evaluates one rule against the context.
///
/// Resolves the rule's attribute path, then applies the operator. An
/// attribute absent from the context evaluates `false` for every
/// operator — including `notEquals` and `notIn`, which might otherwise
/// be expected to default `true`. Absence is not knowledge.
pub fn evaluate_rule(rule: &PolicyRule, context: &EvaluationContext) -> bool {
    let Some(value) = context.resolve_path(&rule.attribute) else {
        trace!(attribute = %rule.attribute, "attribute absent from context; rule is false");
        return false;
    };

    let matched = match &rule.operator {
        RuleOperator::Equals => value == rule.value,
        RuleOperator::NotEquals => value != rule.value,
        RuleOperator::In => parse_string_array(&rule.value)
            .is_some_and(|members| members.iter().any(|m| m == value)),
        RuleOperator::NotIn => parse_string_array(&rule.value)
            .is_some_and(|members| !members.iter().any(|m| m == value)),
        RuleOperator::Contains => value.contains(&rule.value),
        RuleOperator::GreaterThan => numeric_pair(value, &rule.value).is_some_and(|(a, b)| a > b),
        RuleOperator::LessThan => numeric_pair(value, &rule.value).is_some_and(|(a, b)| a < b),
        RuleOperator::Other(tag) => {
            trace!(operator = %tag, "unknown operator; rule is false");
            false
        }
    };

    trace!(
        attribute = %rule.attribute,
        operator = %rule.operator,
        matched,
        "rule evaluated"
    );
    matched
}

/// Parses a rule value expected to hold a JSON array of strings.
///
/// Malformed JSON yields `None`, which makes both `in` and `notIn`
/// evaluate `false` — a parse failure is a rule failure, not a negated
/// success.
fn parse_string_array(value: &str) -> Option<Vec<String>> {
    serde_json::from_str(value).ok()
}

/// Parses both comparison operands as floats.
fn numeric_pair(attribute_value: &str, rule_value: &str) -> Option<(f64, f64)> {
    let a = attribute_value.trim().parse::<f64>().ok()?;
    let b = rule_value.trim().parse::<f64>().ok()?;
    Some((a, b))
}

// ============================================================================
// Policy evaluation
// ============================================================================

/// Evaluates a full policy against the context.
///
/// The policy must target the context's resource kind and action; a
/// mismatch (or an absent resource) means the policy is simply not
/// applicable. Past the guard, all rules must match. An empty rule set
/// matches unconditionally — the blanket policy case.
pub fn evaluate_policy(policy: &Policy, context: &EvaluationContext) -> bool {
    if context.resource_kind() != Some(policy.resource.as_str())
        || context.action() != policy.action
    {
        return false;
    }

    // `all` over an empty rule set is vacuously true (blanket policy).
    policy.rules.iter().all(|rule| evaluate_rule(rule, context))
}

// ============================================================================
// Tests
// ============================================================================
