//! JSON snapshot persistence.
//!
//! A [`FileStore`] is a [`MemoryStore`] whose contents load from and
//! save to a JSON file. Suitable for small deployments, fixtures, and
//! durable test configurations; anything bigger belongs behind a real
//! database implementing [`IdentityStore`](crate::IdentityStore)
//! directly.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use palisade_abac::Policy;
use palisade_rbac::Permission;
use palisade_types::{RoleId, UserId};
use tracing::info;

use crate::memory::MemoryStore;
use crate::traits::{IdentityStore, Result, RoleRef};

/// A file-backed identity store.
///
/// Reads are served from the in-memory copy; [`save`](Self::save)
/// writes the whole snapshot back. Load failures are surfaced as
/// [`StoreError::Io`](crate::StoreError::Io) or
/// [`StoreError::Corrupt`](crate::StoreError::Corrupt) — a broken
/// snapshot must never silently present as an empty (all-denying)
/// configuration.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Creates an empty store that will save to `path`.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemoryStore::new(),
        }
    }

    /// Loads a snapshot from disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        let inner: MemoryStore = serde_json::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), "loaded identity snapshot");
        Ok(Self { path, inner })
    }

    /// Writes the current contents back to the snapshot file.
    pub fn save(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.inner)?;
        info!(path = %self.path.display(), "saved identity snapshot");
        Ok(())
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory contents, for configuration edits before a save.
    pub fn contents_mut(&mut self) -> &mut MemoryStore {
        &mut self.inner
    }

    /// The in-memory contents.
    pub fn contents(&self) -> &MemoryStore {
        &self.inner
    }
}

impl IdentityStore for FileStore {
    fn user_attributes(&self, user_id: UserId) -> Result<HashMap<String, String>> {
        self.inner.user_attributes(user_id)
    }

    fn user_roles(&self, user_id: UserId) -> Result<Vec<RoleRef>> {
        self.inner.user_roles(user_id)
    }

    fn policies_for_user(&self, user_id: UserId) -> Result<Vec<Policy>> {
        self.inner.policies_for_user(user_id)
    }

    fn policies_for_roles(&self, role_ids: &[RoleId]) -> Result<Vec<Policy>> {
        self.inner.policies_for_roles(role_ids)
    }

    fn role_permissions(&self, role_id: RoleId) -> Result<Vec<Permission>> {
        self.inner.role_permissions(role_id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use palisade_abac::{Effect, Policy, RuleOperator};
    use palisade_rbac::Role;

    use super::*;
    use crate::traits::StoreError;
    use crate::users::User;

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("identity.json");

        let mut store = FileStore::create(&path);
        let user = User::new("alice@example.com", "Alice");
        let role = Role::new("admin");
        let policy = Policy::new("eng-read", "users", "read", Effect::Allow).with_rule(
            "user.department",
            RuleOperator::Equals,
            "engineering",
        );
        let (user_id, role_id, policy_id) = (user.id, role.id, policy.id);

        {
            let contents = store.contents_mut();
            contents.insert_user(user).expect("user");
            contents.insert_role(role).expect("role");
            contents.insert_policy(policy).expect("policy");
            contents.add_role_member(user_id, role_id).expect("membership");
            contents
                .insert_attribute(user_id, "department", "engineering")
                .expect("attribute");
            contents
                .assign_policy_to_role(policy_id, role_id)
                .expect("assignment");
        }
        store.save().expect("save snapshot");

        let reloaded = FileStore::load(&path).expect("load snapshot");
        assert_eq!(
            reloaded.user_attributes(user_id).expect("attributes"),
            store.user_attributes(user_id).expect("attributes")
        );
        let policies = reloaded.policies_for_roles(&[role_id]).expect("policies");
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].name, "eng-read");
        assert_eq!(policies[0].rules.len(), 1);
    }

    #[test]
    fn test_missing_snapshot_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = FileStore::load(dir.path().join("absent.json")).expect_err("missing file");
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_corrupt_snapshot_is_distinguishable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("identity.json");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"{ not json").expect("write garbage");

        let err = FileStore::load(&path).expect_err("corrupt file");
        assert!(
            matches!(err, StoreError::Corrupt(_)),
            "corruption must not read as an empty store"
        );
    }
}
