//! The evaluation context: attribute maps rules are matched against.
//!
//! Three attribute scopes drive access decisions:
//! - **User attributes**: resolved from the identity store (department,
//!   level, custom keys)
//! - **Resource attributes**: supplied by the caller alongside the
//!   resource kind
//! - **Environment attributes**: request-time facts supplied by the
//!   caller (source network, time of day, ...)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Attribute Scope
// ============================================================================

/// The scope half of a dotted attribute path.
///
/// `user.department` selects the `department` key of the [`User`]
/// scope. Scope tags outside the three known ones do not resolve to a
/// value, so rules referencing them evaluate `false`.
///
/// [`User`]: AttributeScope::User
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeScope {
    /// Attributes of the requesting user.
    User,
    /// Attributes of the target resource.
    Resource,
    /// Attributes of the request environment.
    Environment,
}

impl AttributeScope {
    /// Parses a scope tag. Unknown tags yield `None`, not an error.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(Self::User),
            "resource" => Some(Self::Resource),
            "environment" => Some(Self::Environment),
            _ => None,
        }
    }
}

// ============================================================================
// Evaluation Context
// ============================================================================

/// The flat attribute maps a request is evaluated against.
///
/// Built once per `check_access` call and immutable during evaluation.
/// The resource kind is carried separately from the resource attribute
/// map because the policy match guard compares against it, not against
/// an attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationContext {
    action: String,
    resource_kind: Option<String>,
    user: HashMap<String, String>,
    resource: HashMap<String, String>,
    environment: HashMap<String, String>,
}

impl EvaluationContext {
    /// Creates a context for the given action with no attributes.
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            ..Self::default()
        }
    }

    /// Sets the kind of the target resource (e.g. "users").
    pub fn with_resource_kind(mut self, kind: &str) -> Self {
        self.resource_kind = Some(kind.to_string());
        self
    }

    /// Adds a single user attribute.
    pub fn with_user_attribute(mut self, key: &str, value: &str) -> Self {
        self.user.insert(key.to_string(), value.to_string());
        self
    }

    /// Replaces the user attribute map.
    pub fn with_user_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.user = attributes;
        self
    }

    /// Adds a single resource attribute.
    pub fn with_resource_attribute(mut self, key: &str, value: &str) -> Self {
        self.resource.insert(key.to_string(), value.to_string());
        self
    }

    /// Replaces the resource attribute map.
    pub fn with_resource_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.resource = attributes;
        self
    }

    /// Adds a single environment attribute.
    pub fn with_environment_attribute(mut self, key: &str, value: &str) -> Self {
        self.environment.insert(key.to_string(), value.to_string());
        self
    }

    /// Replaces the environment attribute map.
    pub fn with_environment(mut self, attributes: HashMap<String, String>) -> Self {
        self.environment = attributes;
        self
    }

    /// The action being requested.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The kind of the target resource, if one was supplied.
    pub fn resource_kind(&self) -> Option<&str> {
        self.resource_kind.as_deref()
    }

    /// Looks up an attribute in one scope.
    pub fn value_of(&self, scope: AttributeScope, key: &str) -> Option<&str> {
        let map = match scope {
            AttributeScope::User => &self.user,
            AttributeScope::Resource => &self.resource,
            AttributeScope::Environment => &self.environment,
        };
        map.get(key).map(String::as_str)
    }

    /// Resolves a dotted attribute path like `user.department`.
    ///
    /// The path splits on the first `.` only; the remainder is the key,
    /// dots intact (`user.org.department` looks up `org.department` in
    /// the user scope). Paths with no dot, or with an unknown scope
    /// tag, resolve to nothing.
    pub fn resolve_path(&self, path: &str) -> Option<&str> {
        let (tag, key) = path.split_once('.')?;
        let scope = AttributeScope::parse(tag)?;
        self.value_of(scope, key)
    }
}

// ============================================================================
// Tests
// ============================================================================
