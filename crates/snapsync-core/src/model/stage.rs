//! Stage labels used in error context and structured logs

use serde::{Deserialize, Serialize};

/// One half of the send/receive replication pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Send,
    Receive,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Send => "send",
            PipelineStage::Receive => "receive",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-snapshot steps of the transfer sequencer, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerStage {
    Prepare,
    SelectAncestor,
    Transfer,
    RecordProvenance,
    PromoteToCommon,
}

impl SequencerStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequencerStage::Prepare => "prepare",
            SequencerStage::SelectAncestor => "select_ancestor",
            SequencerStage::Transfer => "transfer",
            SequencerStage::RecordProvenance => "record_provenance",
            SequencerStage::PromoteToCommon => "promote_to_common",
        }
    }
}

impl std::fmt::Display for SequencerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
