//! User records.
//!
//! The engine never authenticates anyone; credentials live with the
//! credential service. A user row here is the identity the rest of the
//! configuration hangs off: role memberships, attribute rows, direct
//! policy assignments.

use chrono::{DateTime, Utc};
use palisade_types::UserId;
use serde::{Deserialize, Serialize};

/// A user known to the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh id and current timestamps.
    pub fn new(email: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
