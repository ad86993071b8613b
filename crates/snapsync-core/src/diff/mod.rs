//! Inventory diff engine.
//!
//! Partitions the resolved source inventory against the target inventory into
//! a [`SyncPlan`].
//!
//! ## Guarantees
//!
//! - **Determinism**: `common` and `pending` are sorted ascending by ordinal.
//! - **Partition**: every identified source record lands in exactly one of
//!   `common` or `pending`; unidentified records land in neither.
//! - **Integrity is advisory**: provenance mismatches never change
//!   classification, they only add [`IntegrityWarning`]s.

pub mod engine;
pub mod model;

pub use engine::diff_inventories;
pub use model::{
    CommonPair, CommonTarget, IntegrityWarning, PendingSnapshot, SyncPlan, UnverifiedReason,
};
