//! End-to-end decision scenarios against an in-memory store.

use std::collections::HashMap;

use palisade_abac::{Effect, Policy, RuleOperator};
use palisade_engine::{AccessEngine, AccessRequest, EngineError, Principal, ResourceRef};
use palisade_rbac::Role;
use palisade_store::{IdentityStore, MemoryStore, Result as StoreResult, RoleRef, StoreError, User, seed};
use palisade_types::{RoleId, UserId};
use proptest::prelude::*;

/// A store with one user in one role, carrying the usual attributes.
fn senior_engineer() -> (MemoryStore, UserId, RoleId) {
    let mut store = MemoryStore::new();
    let user = User::new("alice@example.com", "Alice");
    let role = Role::new("engineer");
    let (user_id, role_id) = (user.id, role.id);
    store.insert_user(user).expect("user");
    store.insert_role(role).expect("role");
    store.add_role_member(user_id, role_id).expect("membership");
    store
        .insert_attribute(user_id, "department", "engineering")
        .expect("attribute");
    store
        .insert_attribute(user_id, "level", "senior")
        .expect("attribute");
    (store, user_id, role_id)
}

fn write_users(user_id: UserId) -> AccessRequest {
    AccessRequest::new(Principal::new(user_id, "alice@example.com"), "write")
        .with_resource(ResourceRef::new("users"))
}

#[test]
fn scenario_a_role_assigned_conjunction_allows() {
    let (mut store, user_id, role_id) = senior_engineer();
    let policy = Policy::new("p1", "users", "write", Effect::Allow)
        .with_rule("user.department", RuleOperator::Equals, "engineering")
        .with_rule("user.level", RuleOperator::Equals, "senior");
    let policy_id = policy.id;
    store.insert_policy(policy).expect("policy");
    store.assign_policy_to_role(policy_id, role_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    assert!(engine.check_access(&write_users(user_id)).expect("check"));
}

#[test]
fn scenario_b_added_deny_overrides() {
    let (mut store, user_id, role_id) = senior_engineer();
    let allow = Policy::new("p1", "users", "write", Effect::Allow)
        .with_rule("user.department", RuleOperator::Equals, "engineering")
        .with_rule("user.level", RuleOperator::Equals, "senior");
    let deny = Policy::new("p2", "users", "write", Effect::Deny).with_rule(
        "user.level",
        RuleOperator::Equals,
        "senior",
    );
    let (allow_id, deny_id) = (allow.id, deny.id);
    store.insert_policy(allow).expect("policy");
    store.insert_policy(deny).expect("policy");
    store.assign_policy_to_role(allow_id, role_id).expect("assign");
    store.assign_policy_to_role(deny_id, role_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    let decision = engine.decide(&write_users(user_id)).expect("decide");
    assert_eq!(decision.effect, Effect::Deny);
    assert_eq!(decision.matched_policy.as_deref(), Some("p2"));
}

#[test]
fn scenario_c_attributeless_user_is_denied() {
    let mut store = MemoryStore::new();
    let user = User::new("bare@example.com", "Bare");
    let user_id = user.id;
    store.insert_user(user).expect("user");

    let policy = Policy::new("eng-only", "users", "write", Effect::Allow).with_rule(
        "user.department",
        RuleOperator::Equals,
        "engineering",
    );
    let policy_id = policy.id;
    store.insert_policy(policy).expect("policy");
    store.assign_policy_to_user(policy_id, user_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    assert!(!engine.check_access(&write_users(user_id)).expect("check"));
}

#[test]
fn scenario_d_membership_list_values() {
    let (mut store, user_id, _) = senior_engineer();
    let member = Policy::new("in-list", "users", "write", Effect::Allow).with_rule(
        "user.department",
        RuleOperator::In,
        r#"["engineering","product"]"#,
    );
    let member_id = member.id;
    store.insert_policy(member).expect("policy");
    store.assign_policy_to_user(member_id, user_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    assert!(engine.check_access(&write_users(user_id)).expect("check"));

    // Same shape, non-member list: the only allow fails, so deny.
    let (mut store, user_id, _) = senior_engineer();
    let outsider = Policy::new("in-list", "users", "write", Effect::Allow).with_rule(
        "user.department",
        RuleOperator::In,
        r#"["sales"]"#,
    );
    let outsider_id = outsider.id;
    store.insert_policy(outsider).expect("policy");
    store.assign_policy_to_user(outsider_id, user_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    assert!(!engine.check_access(&write_users(user_id)).expect("check"));
}

#[test]
fn blanket_allow_grants_once_guard_passes() {
    let (mut store, user_id, role_id) = senior_engineer();
    let blanket = Policy::new("blanket", "users", "write", Effect::Allow);
    let blanket_id = blanket.id;
    store.insert_policy(blanket).expect("policy");
    store.assign_policy_to_role(blanket_id, role_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    assert!(engine.check_access(&write_users(user_id)).expect("check"));

    // Different action: the guard fails and deny-by-default applies.
    let read = AccessRequest::new(Principal::new(user_id, "alice@example.com"), "read")
        .with_resource(ResourceRef::new("users"));
    assert!(!engine.check_access(&read).expect("check"));
}

#[test]
fn unknown_user_denies_without_error() {
    let (store, _, _) = senior_engineer();
    let engine = AccessEngine::new(store).without_audit();
    let ghost = write_users(UserId::new());
    assert!(!engine.check_access(&ghost).expect("missing data is not an error"));
}

#[test]
fn caller_claims_cannot_override_stored_attributes() {
    let (mut store, user_id, _) = senior_engineer();
    // Deny seniors; the caller claims to be junior.
    let deny = Policy::new("no-seniors", "users", "write", Effect::Deny).with_rule(
        "user.level",
        RuleOperator::Equals,
        "senior",
    );
    let deny_id = deny.id;
    store.insert_policy(deny).expect("policy");
    store.assign_policy_to_user(deny_id, user_id).expect("assign");

    let engine = AccessEngine::new(store).without_audit();
    let request = AccessRequest::new(
        Principal::new(user_id, "alice@example.com").with_attribute("level", "junior"),
        "write",
    )
    .with_resource(ResourceRef::new("users"));
    assert!(
        !engine.check_access(&request).expect("check"),
        "stored attribute rows overlay claimed ones"
    );
}

#[test]
fn seeded_permission_tiers() {
    let store = seed();
    let admin = store.user_by_email("admin@example.com").expect("seeded").id;
    let guest = store.user_by_email("guest@example.com").expect("seeded").id;
    let engine = AccessEngine::new(store).without_audit();

    let delete_users = |id: UserId| {
        AccessRequest::new(Principal::new(id, "x@example.com"), "delete")
            .with_resource(ResourceRef::new("users"))
    };
    let read_users = |id: UserId| {
        AccessRequest::new(Principal::new(id, "x@example.com"), "read")
            .with_resource(ResourceRef::new("users"))
    };

    assert!(engine.has_permission(&delete_users(admin)).expect("check"));
    assert!(engine.has_permission(&read_users(admin)).expect("check"));
    assert!(engine.has_permission(&read_users(guest)).expect("check"));
    assert!(!engine.has_permission(&delete_users(guest)).expect("check"));
}

// ============================================================================
// Store failure propagation
// ============================================================================

/// A store whose every read fails, as an unreachable backend would.
struct UnreachableStore;

fn backend_down() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "backend unreachable",
    ))
}

impl IdentityStore for UnreachableStore {
    fn user_attributes(&self, _: UserId) -> StoreResult<HashMap<String, String>> {
        Err(backend_down())
    }
    fn user_roles(&self, _: UserId) -> StoreResult<Vec<RoleRef>> {
        Err(backend_down())
    }
    fn policies_for_user(&self, _: UserId) -> StoreResult<Vec<palisade_abac::Policy>> {
        Err(backend_down())
    }
    fn policies_for_roles(&self, _: &[RoleId]) -> StoreResult<Vec<palisade_abac::Policy>> {
        Err(backend_down())
    }
    fn role_permissions(&self, _: RoleId) -> StoreResult<Vec<palisade_rbac::Permission>> {
        Err(backend_down())
    }
}

#[test]
fn store_failure_is_an_error_not_a_deny() {
    let engine = AccessEngine::new(UnreachableStore).without_audit();
    let request = write_users(UserId::new());
    let err = engine.check_access(&request).expect_err("outage must surface");
    assert!(matches!(err, EngineError::Store(StoreError::Io(_))));
}

// ============================================================================
// Deny dominance property
// ============================================================================

proptest! {
    /// Adding a matching deny policy forces the decision to `false`
    /// for any mix of allow policies, matching or not.
    #[test]
    fn deny_dominates_any_allow_mix(
        matching_allows in 0usize..4,
        unmatching_allows in 0usize..4,
    ) {
        let (mut store, user_id, _) = senior_engineer();
        for i in 0..matching_allows {
            let policy = Policy::new(&format!("allow-{i}"), "users", "write", Effect::Allow);
            let policy_id = policy.id;
            store.insert_policy(policy).expect("policy");
            store.assign_policy_to_user(policy_id, user_id).expect("assign");
        }
        for i in 0..unmatching_allows {
            let policy = Policy::new(&format!("allow-miss-{i}"), "users", "write", Effect::Allow)
                .with_rule("user.department", RuleOperator::Equals, "sales");
            let policy_id = policy.id;
            store.insert_policy(policy).expect("policy");
            store.assign_policy_to_user(policy_id, user_id).expect("assign");
        }

        // Without the deny, the decision is true iff a matching allow exists.
        let engine = AccessEngine::new(store).without_audit();
        let before = engine.check_access(&write_users(user_id)).expect("check");
        prop_assert_eq!(before, matching_allows > 0);

        // With a matching blanket deny, the decision is always false.
        let mut store = engine.store().clone();
        let deny = Policy::new("the-deny", "users", "write", Effect::Deny);
        let deny_id = deny.id;
        store.insert_policy(deny).expect("policy");
        store.assign_policy_to_user(deny_id, user_id).expect("assign");

        let engine = AccessEngine::new(store).without_audit();
        prop_assert!(!engine.check_access(&write_users(user_id)).expect("check"));
    }
}
