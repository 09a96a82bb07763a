//! # palisade-engine: the access decision engine
//!
//! Decides whether an authenticated principal may perform a
//! `(resource, action)` pair, by combining statically-assigned
//! role/user permissions with dynamically evaluated attribute
//! policies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Access Request                              │
//! │  (principal, resource, action, environment)  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  AccessEngine                                │
//! │  ├─ Resolve user attributes (store)          │
//! │  ├─ Resolve applicable policies              │
//! │  │    (direct ∪ role-assigned, de-duped)     │
//! │  ├─ Phase 1: scan every deny policy          │
//! │  └─ Phase 2: scan allow policies             │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  AccessDecision                              │
//! │  - Effect (allow/deny)                       │
//! │  - Matched policy name                       │
//! │  - Human-readable reason                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Combination algorithm
//!
//! Deny overrides allow, and absence denies: the deny scan always runs
//! to completion before any allow policy is consulted, and a request no
//! policy covers is denied. There is no implicit allow.
//!
//! Store failures are *not* denials: they surface as
//! [`EngineError::Store`] so callers can tell an outage from a
//! legitimate deny (and typically fail closed while alerting).
//!
//! ## Examples
//!
//! ```
//! use palisade_abac::{Effect, Policy, RuleOperator};
//! use palisade_engine::{AccessEngine, AccessRequest, Principal, ResourceRef};
//! use palisade_store::seed;
//!
//! let mut store = seed();
//! let alice = store.user_by_email("admin@example.com").unwrap().id;
//! store.insert_attribute(alice, "department", "engineering").unwrap();
//!
//! let policy = Policy::new("eng-write", "users", "write", Effect::Allow)
//!     .with_rule("user.department", RuleOperator::Equals, "engineering");
//! let policy_id = policy.id;
//! store.insert_policy(policy).unwrap();
//! store.assign_policy_to_user(policy_id, alice).unwrap();
//!
//! let engine = AccessEngine::new(store);
//! let request = AccessRequest::new(Principal::new(alice, "admin@example.com"), "write")
//!     .with_resource(ResourceRef::new("users"));
//! assert!(engine.check_access(&request).unwrap());
//! ```

pub mod engine;
pub mod request;
pub mod resolver;

// Re-export commonly used types
pub use engine::{AccessDecision, AccessEngine, EngineError, Result};
pub use request::{AccessRequest, Principal, ResourceRef};
pub use resolver::{AttributeResolver, PolicyResolver};
