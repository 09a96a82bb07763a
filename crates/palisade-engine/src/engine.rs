//! The access decision engine.
//!
//! Stateless per call: each decision resolves its own context, scans
//! every applicable deny policy to completion, and only then consults
//! the allow policies. Deny overrides allow; absence of coverage
//! denies.

use palisade_abac::{Effect, evaluate_policy};
use palisade_store::{IdentityStore, StoreError};
use thiserror::Error;
use tracing::{info, warn};

use crate::request::AccessRequest;
use crate::resolver::{AttributeResolver, PolicyResolver};

// ============================================================================
// Errors
// ============================================================================

/// Errors from the decision path.
///
/// A store failure is deliberately distinct from a denial: masking an
/// outage as "denied" would hide it behind legitimate authorization
/// noise. Middleware should treat `Store` as fail-closed *and* alert.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The identity store could not be read.
    #[error("identity store failure: {0}")]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

// ============================================================================
// AccessDecision
// ============================================================================

/// The result of evaluating an access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether access is allowed or denied.
    pub effect: Effect,
    /// The name of the policy that decided the outcome, or `None` for
    /// the deny-by-default case.
    pub matched_policy: Option<String>,
    /// Human-readable explanation of why this decision was made.
    pub reason: String,
}

impl AccessDecision {
    /// Returns whether access was granted.
    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }

    fn denied_by(policy: &str) -> Self {
        Self {
            effect: Effect::Deny,
            matched_policy: Some(policy.to_string()),
            reason: format!("deny policy '{policy}' matched"),
        }
    }

    fn allowed_by(policy: &str) -> Self {
        Self {
            effect: Effect::Allow,
            matched_policy: Some(policy.to_string()),
            reason: format!("allow policy '{policy}' matched"),
        }
    }

    fn default_deny() -> Self {
        Self {
            effect: Effect::Deny,
            matched_policy: None,
            reason: "no policy matched; denying by default".to_string(),
        }
    }
}

// ============================================================================
// AccessEngine
// ============================================================================

/// Evaluates access requests against the identity store.
///
/// Holds no per-request state; concurrent calls share nothing mutable
/// and may run fully in parallel.
#[derive(Debug)]
pub struct AccessEngine<S> {
    store: S,
    audit_enabled: bool,
}

impl<S: IdentityStore> AccessEngine<S> {
    /// Creates an engine over the given store, with audit logging on.
    pub fn new(store: S) -> Self {
        Self {
            store,
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Answers the boolean contract: may this request proceed?
    pub fn check_access(&self, request: &AccessRequest) -> Result<bool> {
        self.decide(request).map(|decision| decision.is_allowed())
    }

    /// Evaluates the request and explains the outcome.
    ///
    /// Two-phase scan: every applicable deny policy is evaluated
    /// before any allow policy — a deny is never skipped because an
    /// allow already matched, and an allow is never honored ahead of
    /// an unconfirmed deny. If neither phase produces a match, the
    /// default is denial.
    pub fn decide(&self, request: &AccessRequest) -> Result<AccessDecision> {
        let attributes = AttributeResolver::new(&self.store)
            .resolve_over(request.user.id, &request.user.attributes)?;
        let policies = PolicyResolver::new(&self.store).resolve(request.user.id)?;
        let context = request.evaluation_context(attributes);

        // Phase 1: the deny scan runs to completion first.
        let mut decision = None;
        for policy in policies.iter().filter(|p| p.effect == Effect::Deny) {
            if evaluate_policy(policy, &context) {
                decision = Some(AccessDecision::denied_by(&policy.name));
                break;
            }
        }

        // Phase 2: allow scan, only reached when no deny matched.
        if decision.is_none() {
            for policy in policies.iter().filter(|p| p.effect == Effect::Allow) {
                if evaluate_policy(policy, &context) {
                    decision = Some(AccessDecision::allowed_by(&policy.name));
                    break;
                }
            }
        }

        let decision = decision.unwrap_or_else(AccessDecision::default_deny);
        if self.audit_enabled {
            self.audit(request, &decision);
        }
        Ok(decision)
    }

    /// Answers the static RBAC layer: does any of the user's roles
    /// hold a permission covering `(resource, action)`?
    ///
    /// Missing users and roles resolve to `false`; only store failures
    /// error.
    pub fn has_permission(&self, request: &AccessRequest) -> Result<bool> {
        let Some(resource) = request.resource.as_ref() else {
            return Ok(false);
        };
        for role in self.store.user_roles(request.user.id)? {
            let permissions = self.store.role_permissions(role.id)?;
            if permissions
                .iter()
                .any(|p| p.covers(&resource.kind, &request.action))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn audit(&self, request: &AccessRequest, decision: &AccessDecision) {
        let resource = request
            .resource
            .as_ref()
            .map_or("<none>", |r| r.kind.as_str());
        match decision.effect {
            Effect::Allow => info!(
                user = %request.user.id,
                resource = %resource,
                action = %request.action,
                policy = decision.matched_policy.as_deref(),
                "access granted"
            ),
            Effect::Deny => warn!(
                user = %request.user.id,
                resource = %resource,
                action = %request.action,
                policy = decision.matched_policy.as_deref(),
                reason = %decision.reason,
                "access denied"
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
