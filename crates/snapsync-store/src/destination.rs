//! Target directory preparation
//!
//! Each received snapshot gets its own `<target>/<n>` directory. The parent
//! (the configured target path) must already exist; it is never created here,
//! so a missing or unmounted medium fails instead of filling the root
//! filesystem.

use crate::errors::{destination_error, Result};
use snapsync_core::collaborators::DestinationPreparer;
use snapsync_core::model::Ordinal;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct FsDestination;

impl FsDestination {
    pub fn new() -> Self {
        Self
    }
}

fn is_empty_dir(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

impl DestinationPreparer for FsDestination {
    fn prepare(&self, ordinal: Ordinal, destination: &Path) -> Result<()> {
        match fs::create_dir(destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if !destination.is_dir() {
                    return Err(destination_error(
                        ordinal,
                        destination,
                        "exists and is not a directory",
                    ));
                }
                match is_empty_dir(destination) {
                    Ok(true) => {
                        // Left behind by an earlier run that failed before receiving.
                        debug!(
                            ordinal,
                            destination = %destination.display(),
                            "reusing empty destination"
                        );
                        Ok(())
                    }
                    Ok(false) => Err(destination_error(
                        ordinal,
                        destination,
                        "already exists and is not empty",
                    )),
                    Err(e) => Err(destination_error(ordinal, destination, e)),
                }
            }
            Err(e) => Err(destination_error(ordinal, destination, e)),
        }
    }
}
