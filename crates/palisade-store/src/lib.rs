//! # palisade-store: identity and policy configuration store
//!
//! The decision engine consumes identity and policy configuration
//! through the read-only [`IdentityStore`] trait. This crate provides:
//! - the trait and its error type ([`StoreError`])
//! - [`MemoryStore`]: an arena-style in-memory implementation whose
//!   write operations enforce the configuration invariants (unique
//!   names, unique join pairs, referential existence, cascade removal)
//! - [`FileStore`]: a JSON snapshot of a `MemoryStore` persisted to
//!   disk
//! - [`seed`]: the stock dataset (admin/user/guest roles, the
//!   permission grid, three users) used by tests and demos
//!
//! Missing data is not an error: asking for the attributes or policies
//! of an unknown user yields empty collections, which flow into the
//! engine's deny-by-default posture. Errors are reserved for real
//! failures — I/O, corrupt snapshots, invariant violations on write —
//! so that callers can tell an outage from a legitimate deny.

pub mod memory;
pub mod seed;
pub mod snapshot;
pub mod traits;
pub mod users;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use seed::seed;
pub use snapshot::FileStore;
pub use traits::{IdentityStore, Result, RoleRef, StoreError};
pub use users::User;
