//! The inbound call contract.
//!
//! An [`AccessRequest`] is what an authorization guard hands the
//! engine: the already-authenticated principal, the target resource,
//! the action, and any request-time environment facts. The engine
//! turns it into an [`EvaluationContext`] after resolving the
//! principal's stored attributes.

use std::collections::HashMap;

use palisade_abac::EvaluationContext;
use palisade_types::UserId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Principal
// ============================================================================

/// The authenticated entity whose access is being evaluated.
///
/// Typically built from verified token claims. The role names and
/// attributes here are the caller's view; policy resolution reads
/// memberships and attribute rows from the store, so a stale or
/// tampered claim set cannot widen access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user's identifier.
    pub id: UserId,
    /// The user's email.
    pub email: String,
    /// Role names as claimed by the caller.
    pub roles: Vec<String>,
    /// OAuth-style scope strings carried through from the token.
    pub scopes: Vec<String>,
    /// Attribute key/value pairs as claimed by the caller. Stored
    /// attribute rows overlay these during resolution.
    pub attributes: HashMap<String, String>,
}

impl Principal {
    /// Creates a principal with no claimed roles or attributes.
    pub fn new(id: UserId, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            roles: Vec::new(),
            scopes: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Adds a claimed role name.
    pub fn with_role(mut self, role: &str) -> Self {
        self.roles.push(role.to_string());
        self
    }

    /// Adds a claimed scope string.
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scopes.push(scope.to_string());
        self
    }

    /// Adds a claimed attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

// ============================================================================
// ResourceRef
// ============================================================================

/// The target of the request.
///
/// Resource attributes are supplied by the caller; the engine does not
/// fetch them from a resource store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Optional instance identifier (e.g. a route parameter).
    pub id: Option<String>,
    /// The resource kind the policies target (e.g. "users").
    pub kind: String,
    /// Caller-supplied resource attributes.
    pub attributes: HashMap<String, String>,
}

impl ResourceRef {
    /// Creates a resource reference of the given kind.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    /// Sets the instance identifier.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds a resource attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

// ============================================================================
// AccessRequest
// ============================================================================

/// One authorization question: may this principal perform this action
/// on this resource, in this environment?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// The authenticated principal.
    pub user: Principal,
    /// The target resource, if the route names one.
    pub resource: Option<ResourceRef>,
    /// The action being performed (e.g. "read", "write").
    pub action: String,
    /// Request-time environment facts.
    pub environment: HashMap<String, String>,
}

impl AccessRequest {
    /// Creates a request with no resource or environment.
    pub fn new(user: Principal, action: &str) -> Self {
        Self {
            user,
            resource: None,
            action: action.to_string(),
            environment: HashMap::new(),
        }
    }

    /// Sets the target resource.
    pub fn with_resource(mut self, resource: ResourceRef) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Adds an environment fact.
    pub fn with_environment_attribute(mut self, key: &str, value: &str) -> Self {
        self.environment.insert(key.to_string(), value.to_string());
        self
    }

    /// Builds the evaluation context, with `user_attributes` as the
    /// resolved (store-overlaid) user attribute map.
    pub(crate) fn evaluation_context(
        &self,
        user_attributes: HashMap<String, String>,
    ) -> EvaluationContext {
        let mut context = EvaluationContext::new(&self.action)
            .with_user_attributes(user_attributes)
            .with_environment(self.environment.clone());
        if let Some(resource) = &self.resource {
            context = context
                .with_resource_kind(&resource.kind)
                .with_resource_attributes(resource.attributes.clone());
        }
        context
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = AccessRequest::new(
            Principal::new(UserId::new(), "alice@example.com")
                .with_role("admin")
                .with_scope("api")
                .with_attribute("department", "engineering"),
            "write",
        )
        .with_resource(ResourceRef::new("users").with_id("42").with_attribute("owner", "alice"))
        .with_environment_attribute("network", "vpn");

        assert_eq!(request.action, "write");
        assert_eq!(request.user.roles, vec!["admin"]);
        let resource = request.resource.as_ref().expect("resource set");
        assert_eq!(resource.kind, "users");
        assert_eq!(resource.id.as_deref(), Some("42"));
        assert_eq!(request.environment.get("network").map(String::as_str), Some("vpn"));
    }

    #[test]
    fn test_evaluation_context_carries_all_scopes() {
        let user_id = UserId::new();
        let request = AccessRequest::new(Principal::new(user_id, "a@example.com"), "read")
            .with_resource(ResourceRef::new("files").with_attribute("owner", "alice"))
            .with_environment_attribute("network", "vpn");

        let mut attributes = HashMap::new();
        attributes.insert("department".to_string(), "engineering".to_string());
        let context = request.evaluation_context(attributes);

        assert_eq!(context.action(), "read");
        assert_eq!(context.resource_kind(), Some("files"));
        assert_eq!(context.resolve_path("user.department"), Some("engineering"));
        assert_eq!(context.resolve_path("resource.owner"), Some("alice"));
        assert_eq!(context.resolve_path("environment.network"), Some("vpn"));
    }

    #[test]
    fn test_evaluation_context_without_resource() {
        let request = AccessRequest::new(Principal::new(UserId::new(), "a@example.com"), "read");
        let context = request.evaluation_context(HashMap::new());
        assert_eq!(context.resource_kind(), None);
    }
}
