//! Provenance sidecar document
//!
//! Written next to every snapshot received on the target. `source_uuid` and
//! `synced` are the only fields a reader relies on; the rest is informational
//! and optional so older or hand-written sidecars still load.

use crate::model::record::{Ordinal, Provenance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the sidecar inside a target snapshot directory
pub const SIDECAR_FILE_NAME: &str = "snapsync.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSidecar {
    /// Content UUID of the originating source snapshot
    pub source_uuid: String,
    /// Set once the transfer has fully completed
    pub synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<Ordinal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl SyncSidecar {
    /// Sidecar for a transfer that has just completed
    pub fn completed(source_uuid: impl Into<String>, ordinal: Ordinal) -> Self {
        Self {
            source_uuid: source_uuid.into(),
            synced: true,
            ordinal: Some(ordinal),
            synced_at: Some(Utc::now()),
        }
    }

    pub fn provenance(&self) -> Provenance {
        Provenance {
            source_uuid: self.source_uuid.clone(),
            synced: self.synced,
        }
    }
}
