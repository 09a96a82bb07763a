//! Stock configuration dataset.
//!
//! Mirrors the deployment bootstrap: three roles, the full permission
//! grid over the five stock resources, and one user per role. Tests
//! and demos start from this and layer policies on top.

use palisade_rbac::{Permission, Role};
use tracing::debug;

use crate::memory::MemoryStore;
use crate::users::User;

const ROLES: &[(&str, &str)] = &[
    ("admin", "Administrator role with full access"),
    ("user", "Regular user role"),
    ("guest", "Guest user role with limited access"),
];

const PERMISSIONS: &[(&str, &str, &str)] = &[
    ("users.create", "users", "create"),
    ("users.read", "users", "read"),
    ("users.update", "users", "update"),
    ("users.delete", "users", "delete"),
    ("roles.create", "roles", "create"),
    ("roles.read", "roles", "read"),
    ("roles.update", "roles", "update"),
    ("roles.delete", "roles", "delete"),
    ("permissions.create", "permissions", "create"),
    ("permissions.read", "permissions", "read"),
    ("permissions.update", "permissions", "update"),
    ("permissions.delete", "permissions", "delete"),
    ("files.upload", "files", "upload"),
    ("files.read", "files", "read"),
    ("files.delete", "files", "delete"),
    ("catalog.create", "catalog", "create"),
    ("catalog.read", "catalog", "read"),
    ("catalog.update", "catalog", "update"),
    ("catalog.delete", "catalog", "delete"),
];

const USERS: &[(&str, &str, &str)] = &[
    ("admin@example.com", "Administrator", "admin"),
    ("user@example.com", "Regular User", "user"),
    ("guest@example.com", "Guest User", "guest"),
];

/// Builds the stock dataset.
///
/// Grants: `admin` holds every permission; `user` holds every `read`
/// plus `files.upload`; `guest` holds every `read`.
///
/// # Panics
///
/// Never on the shipped dataset; the inserts only fail on duplicate
/// names, and the constants hold none.
pub fn seed() -> MemoryStore {
    let mut store = MemoryStore::new();

    for (name, description) in ROLES {
        let role = Role::new(name).with_description(description);
        store.insert_role(role).expect("seed roles are unique");
    }

    for (name, resource, action) in PERMISSIONS {
        let permission = Permission::new(name, resource, action);
        store
            .insert_permission(permission)
            .expect("seed permissions are unique");
    }

    let admin = store.role_named("admin").expect("seeded").id;
    let user = store.role_named("user").expect("seeded").id;
    let guest = store.role_named("guest").expect("seeded").id;

    for (name, resource, action) in PERMISSIONS {
        let permission_id = store.permission_named(name).expect("seeded").id;

        store
            .grant_permission(admin, permission_id)
            .expect("admin grants are unique");

        if *action == "read" || (*resource == "files" && *action == "upload") {
            store
                .grant_permission(user, permission_id)
                .expect("user grants are unique");
        }

        if *action == "read" {
            store
                .grant_permission(guest, permission_id)
                .expect("guest grants are unique");
        }
    }

    for (email, name, role_name) in USERS {
        let account = User::new(email, name);
        let account_id = account.id;
        store.insert_user(account).expect("seed users are unique");

        let role_id = store.role_named(role_name).expect("seeded").id;
        store
            .add_role_member(account_id, role_id)
            .expect("seed memberships are unique");
    }

    debug!("seeded stock identity configuration");
    store
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::traits::IdentityStore;

    use super::*;

    #[test]
    fn test_seed_shape() {
        let store = seed();
        for (name, _) in ROLES {
            assert!(store.role_named(name).is_some(), "role {name} seeded");
        }
        for (name, _, _) in PERMISSIONS {
            assert!(
                store.permission_named(name).is_some(),
                "permission {name} seeded"
            );
        }
        for (email, _, _) in USERS {
            assert!(store.user_by_email(email).is_some(), "user {email} seeded");
        }
    }

    #[test]
    fn test_seed_grant_tiers() {
        let store = seed();
        let admin = store.role_named("admin").expect("seeded").id;
        let user = store.role_named("user").expect("seeded").id;
        let guest = store.role_named("guest").expect("seeded").id;

        assert_eq!(
            store.role_permissions(admin).expect("read").len(),
            PERMISSIONS.len(),
            "admin holds the full grid"
        );
        // user: 5 reads + files.upload
        assert_eq!(store.role_permissions(user).expect("read").len(), 6);
        // guest: 5 reads
        assert_eq!(store.role_permissions(guest).expect("read").len(), 5);
    }

    #[test]
    fn test_seed_memberships() {
        let store = seed();
        let admin_user = store.user_by_email("admin@example.com").expect("seeded").id;
        let roles = store.user_roles(admin_user).expect("read");
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "admin");
    }
}
