use crate::model::{Ordinal, PipelineStage};
use thiserror::Error;

/// Result type alias using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log assertions and exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Inventory
    /// A listing line matched neither the blank nor the record pattern
    Parse,
    /// The listing query itself could not be run or exited non-zero
    Listing,

    // Transfer pipeline
    Destination,
    Transfer,
    SidecarWrite,
    /// Only surfaced by sidecar stores; resolution treats it as "no provenance"
    SidecarRead,

    // Collaborators upstream of the core
    InvalidConfig,
    Preflight,

    // Local filesystem
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Listing => "ERR_LISTING",
            ExErrorKind::Destination => "ERR_DESTINATION",
            ExErrorKind::Transfer => "ERR_TRANSFER",
            ExErrorKind::SidecarWrite => "ERR_SIDECAR_WRITE",
            ExErrorKind::SidecarRead => "ERR_SIDECAR_READ",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Preflight => "ERR_PREFLIGHT",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context needed to diagnose a failed
/// run: which operation, which ordinal, which pipeline stage, which path.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    ordinal: Option<Ordinal>,
    stage: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            ordinal: None,
            stage: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add ordinal context
    pub fn with_ordinal(mut self, ordinal: Ordinal) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    /// Add pipeline/sequencer stage context
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn ordinal(&self) -> Option<Ordinal> {
        self.ordinal
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(ordinal) = self.ordinal {
            write!(f, " (ordinal: {})", ordinal)?;
        }
        if let Some(stage) = &self.stage {
            write!(f, " (stage: {})", stage)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for snapsync operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    // ===== Inventory =====
    /// A non-blank listing line did not match the record pattern
    #[error("Unrecognized listing line {line_no} for {mount}: {line:?}")]
    Parse {
        mount: String,
        line_no: usize,
        line: String,
    },

    /// The listing query could not produce output
    #[error("Snapshot listing failed for {mount}: {reason}")]
    Listing { mount: String, reason: String },

    // ===== Transfer pipeline =====
    /// Destination directory could not be created or is unusable
    #[error("Cannot prepare destination {path} for snapshot {ordinal}: {reason}")]
    Destination {
        ordinal: Ordinal,
        path: String,
        reason: String,
    },

    /// One stage of the send/receive pipeline failed
    #[error("Transfer of snapshot {ordinal} failed in {stage} stage: {reason}")]
    Transfer {
        ordinal: Ordinal,
        stage: PipelineStage,
        reason: String,
    },

    /// Provenance sidecar could not be written after a transfer
    #[error("Cannot write sidecar {path} for snapshot {ordinal}: {reason}")]
    SidecarWrite {
        ordinal: Ordinal,
        path: String,
        reason: String,
    },

    /// Provenance sidecar exists but could not be read or parsed
    #[error("Cannot read sidecar {path}: {reason}")]
    SidecarRead { path: String, reason: String },

    // ===== Upstream collaborators =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Medium verification or free-space guard rejected a section
    #[error("Preflight check failed for section {section}: {reason}")]
    Preflight { section: String, reason: String },

    // ===== Integration =====
    #[error("I/O error in {op}: {message}")]
    Io { op: String, message: String },
}

impl SyncError {
    /// Ordinal of the snapshot being processed when the error occurred
    pub fn ordinal(&self) -> Option<Ordinal> {
        match self {
            SyncError::Destination { ordinal, .. }
            | SyncError::Transfer { ordinal, .. }
            | SyncError::SidecarWrite { ordinal, .. } => Some(*ordinal),
            _ => None,
        }
    }
}

impl From<SyncError> for ExError {
    fn from(err: SyncError) -> Self {
        let message = err.to_string();
        match err {
            SyncError::Parse { mount, .. } => ExError::new(ExErrorKind::Parse)
                .with_op("collect_inventory")
                .with_path(mount)
                .with_message(message),

            SyncError::Listing { mount, .. } => ExError::new(ExErrorKind::Listing)
                .with_op("collect_inventory")
                .with_path(mount)
                .with_message(message),

            SyncError::Destination { ordinal, path, .. } => {
                ExError::new(ExErrorKind::Destination)
                    .with_op("prepare_destination")
                    .with_ordinal(ordinal)
                    .with_stage("prepare")
                    .with_path(path)
                    .with_message(message)
            }

            SyncError::Transfer { ordinal, stage, .. } => ExError::new(ExErrorKind::Transfer)
                .with_op("replicate")
                .with_ordinal(ordinal)
                .with_stage(stage.as_str())
                .with_message(message),

            SyncError::SidecarWrite { ordinal, path, .. } => {
                ExError::new(ExErrorKind::SidecarWrite)
                    .with_op("record_provenance")
                    .with_ordinal(ordinal)
                    .with_stage("record_provenance")
                    .with_path(path)
                    .with_message(message)
            }

            SyncError::SidecarRead { path, .. } => ExError::new(ExErrorKind::SidecarRead)
                .with_op("load_sidecar")
                .with_path(path)
                .with_message(message),

            SyncError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            SyncError::Preflight { .. } => ExError::new(ExErrorKind::Preflight)
                .with_op("preflight")
                .with_message(message),

            SyncError::Io { op, .. } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),
        }
    }
}
