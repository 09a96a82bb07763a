//! # palisade-abac: Attribute-Based Access Control
//!
//! The dynamic half of the Palisade model: policies whose rules are
//! evaluated against the attributes of the requesting user, the target
//! resource, and the request environment.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Evaluation Context                          │
//! │  (user / resource / environment attributes)  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Policy Evaluator                            │
//! │  ├─ Resource/action match guard              │
//! │  ├─ AND over the policy's rules              │
//! │  └─ Empty rule set matches unconditionally   │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Matched / not matched                       │
//! │  (combination across policies happens in     │
//! │   palisade-engine)                           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Fail-closed evaluation
//!
//! Rule evaluation never errors. An absent attribute, an unknown scope
//! tag, an unknown operator, a malformed `in`/`notIn` JSON array, or an
//! unparseable numeric operand all make the rule evaluate `false`.
//! Malformed policy data can only make access more restrictive.
//!
//! ## Examples
//!
//! ```
//! use palisade_abac::context::EvaluationContext;
//! use palisade_abac::evaluator::evaluate_policy;
//! use palisade_abac::policy::{Effect, Policy};
//! use palisade_abac::rule::RuleOperator;
//!
//! let policy = Policy::new("senior-engineers-write", "users", "write", Effect::Allow)
//!     .with_rule("user.department", RuleOperator::Equals, "engineering")
//!     .with_rule("user.level", RuleOperator::Equals, "senior");
//!
//! let context = EvaluationContext::new("write")
//!     .with_resource_kind("users")
//!     .with_user_attribute("department", "engineering")
//!     .with_user_attribute("level", "senior");
//!
//! assert!(evaluate_policy(&policy, &context));
//! ```

pub mod context;
pub mod evaluator;
pub mod policy;
pub mod rule;

// Re-export commonly used types
pub use context::{AttributeScope, EvaluationContext};
pub use evaluator::{evaluate_policy, evaluate_rule};
pub use policy::{AssignmentSubject, Effect, Policy, PolicyAssignment};
pub use rule::{PolicyRule, RuleOperator};
