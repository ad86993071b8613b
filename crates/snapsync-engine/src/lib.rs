//! snapsync Engine - Orchestration layer
//!
//! Runs whole sections: inventory, diff, then the transfer sequencer, over
//! either the real btrfs collaborators or the dry-run backend.

pub mod commands;

pub use commands::dry_run::DryRunBackend;
pub use commands::section::{
    plan_section, run_section, sync_section, SectionCollaborators, SectionReport, SyncSection,
};
pub use commands::sync_all::{sync_all, RunSummary, SyncOptions};
