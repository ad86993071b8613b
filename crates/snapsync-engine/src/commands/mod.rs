//! Command orchestration layer.
//!
//! Coordinates the core reconciliation kernel with the store collaborators.

pub mod dry_run;
pub mod section;
pub mod sync_all;
