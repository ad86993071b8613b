//! btrfs process collaborators
//!
//! Every invocation goes through a configurable command prefix, so a
//! deployment can run `ionice -c3 btrfs` or `sudo btrfs` instead of plain
//! `btrfs`.

use crate::errors::{listing_failed, transfer_failed, Result};
use snapsync_core::collaborators::{ListingSource, ReplicationRequest, Replicator};
use snapsync_core::model::{PipelineStage, Side};
use snapsync_core::SyncError;
use std::ffi::OsString;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::debug;

/// Program plus leading arguments used to invoke btrfs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BtrfsCommand {
    program: OsString,
    base_args: Vec<OsString>,
}

impl Default for BtrfsCommand {
    fn default() -> Self {
        Self {
            program: OsString::from("btrfs"),
            base_args: Vec::new(),
        }
    }
}

impl BtrfsCommand {
    /// Build from a full argument vector such as `["ionice", "-c3", "btrfs"]`
    ///
    /// # Errors
    ///
    /// `SyncError::InvalidConfig` if `argv` is empty.
    pub fn from_argv<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().ok_or_else(|| SyncError::InvalidConfig {
            reason: "btrfs_command must name a program".to_string(),
        })?;
        Ok(Self {
            program,
            base_args: argv.collect(),
        })
    }

    /// A fresh `Command` with the prefix applied
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args);
        cmd
    }
}

/// `btrfs subvolume list` as a listing source
#[derive(Debug, Clone, Default)]
pub struct BtrfsListing {
    btrfs: BtrfsCommand,
}

impl BtrfsListing {
    pub fn new(btrfs: BtrfsCommand) -> Self {
        Self { btrfs }
    }
}

impl ListingSource for BtrfsListing {
    fn list(&self, mount_point: &Path, side: Side) -> Result<String> {
        let mut cmd = self.btrfs.command();
        cmd.args(["subvolume", "list"]);
        match side {
            // Snapshots only on the source; received subvolumes are plain
            // subvolumes, so the target lists everything.
            Side::Source => cmd.arg("-s"),
            Side::Target => cmd.arg("-a"),
        };
        cmd.arg("-u").arg(mount_point);
        cmd.stdin(Stdio::null());

        debug!(side = side.as_str(), mount = %mount_point.display(), "listing subvolumes");
        let output = cmd.output().map_err(|e| listing_failed(mount_point, e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(listing_failed(
                mount_point,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }
        String::from_utf8(output.stdout).map_err(|e| listing_failed(mount_point, e))
    }
}

/// `btrfs send [-p parent] snapshot | btrfs receive destination`
#[derive(Debug, Clone, Default)]
pub struct BtrfsReplicator {
    btrfs: BtrfsCommand,
}

impl BtrfsReplicator {
    pub fn new(btrfs: BtrfsCommand) -> Self {
        Self { btrfs }
    }
}

/// Pick the stage to blame when one or both exited unsuccessfully
fn failed_stage(send: ExitStatus, receive: ExitStatus) -> Option<(PipelineStage, ExitStatus)> {
    match (send.success(), receive.success()) {
        (true, true) => None,
        (false, true) => Some((PipelineStage::Send, send)),
        (true, false) => Some((PipelineStage::Receive, receive)),
        // A sender killed by a signal most likely got SIGPIPE after the
        // receiver went away first.
        (false, false) if send.signal().is_some() => Some((PipelineStage::Receive, receive)),
        (false, false) => Some((PipelineStage::Send, send)),
    }
}

/// Stop a sender whose receiving end is gone, so it never outlives the call
fn reap(sender: &mut Child) {
    let _ = sender.kill();
    let _ = sender.wait();
}

impl Replicator for BtrfsReplicator {
    fn replicate(&self, request: &ReplicationRequest) -> Result<()> {
        let ordinal = request.ordinal;

        let mut send = self.btrfs.command();
        send.arg("send");
        if let Some(parent) = &request.parent {
            send.arg("-p").arg(parent);
        }
        send.arg(&request.snapshot)
            .stdin(Stdio::null())
            .stdout(Stdio::piped());

        debug!(
            ordinal,
            snapshot = %request.snapshot.display(),
            parent = ?request.parent,
            "spawning send"
        );
        let mut sender = send
            .spawn()
            .map_err(|e| transfer_failed(ordinal, PipelineStage::Send, e))?;
        let stream = match sender.stdout.take() {
            Some(stream) => stream,
            None => {
                reap(&mut sender);
                return Err(transfer_failed(
                    ordinal,
                    PipelineStage::Send,
                    "send stdout was not captured",
                ));
            }
        };

        let mut receive = self.btrfs.command();
        receive
            .arg("receive")
            .arg(&request.destination)
            .stdin(Stdio::from(stream))
            .stdout(Stdio::null());

        debug!(
            ordinal,
            destination = %request.destination.display(),
            "spawning receive"
        );
        let mut receiver = match receive.spawn() {
            Ok(child) => child,
            Err(e) => {
                reap(&mut sender);
                return Err(transfer_failed(ordinal, PipelineStage::Receive, e));
            }
        };

        let receive_status = match receiver.wait() {
            Ok(status) => status,
            Err(e) => {
                reap(&mut sender);
                return Err(transfer_failed(ordinal, PipelineStage::Receive, e));
            }
        };
        let send_status = sender
            .wait()
            .map_err(|e| transfer_failed(ordinal, PipelineStage::Send, e))?;

        match failed_stage(send_status, receive_status) {
            None => Ok(()),
            Some((stage, status)) => Err(transfer_failed(ordinal, stage, status)),
        }
    }
}
