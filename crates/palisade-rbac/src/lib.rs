//! # palisade-rbac: Role-Based Access Control
//!
//! The static half of the Palisade identity model:
//! - **Permissions**: named `(resource, action)` capabilities
//! - **Roles**: named bundles of permission grants
//! - **Grants and memberships**: the explicit join records binding
//!   permissions to roles and roles to users
//!
//! Permissions and roles are administration-managed configuration; the
//! decision engine only ever reads them. Dynamic, attribute-driven
//! policies layer on top of this model in `palisade-abac`.

pub mod permissions;
pub mod roles;

// Re-export commonly used types
pub use permissions::{Permission, PermissionSet};
pub use roles::{Role, RoleGrant, RoleMembership};
