//! Target medium checks run before a section touches the core
//!
//! Both checks are opt-in per section: `target_uuid` verifies the device
//! mounted at the target mount point, `target_min_space` guards free space.

use crate::config::NamedSection;
use snapsync_core::SyncError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

const PROC_MOUNTS: &str = "/proc/mounts";
const GIB: u64 = 1024 * 1024 * 1024;

fn rejected(section: &NamedSection, reason: impl std::fmt::Display) -> SyncError {
    SyncError::Preflight {
        section: section.name.clone(),
        reason: reason.to_string(),
    }
}

/// Run every configured check for `section`
///
/// # Errors
///
/// `SyncError::Preflight` naming the failed check.
pub fn check_section(section: &NamedSection) -> Result<(), SyncError> {
    let target = &section.config.target_mountpoint;

    if let Some(expected) = &section.config.target_uuid {
        let mounts = std::fs::read_to_string(PROC_MOUNTS)
            .map_err(|e| rejected(section, format!("cannot read {}: {}", PROC_MOUNTS, e)))?;
        verify_medium(&mounts, target, expected, blkid_uuid).map_err(|r| rejected(section, r))?;
    }

    if let Some(min_gib) = section.config.target_min_space {
        let available = fs2::available_space(target).map_err(|e| {
            let reason = format!("cannot query free space on {}: {}", target.display(), e);
            rejected(section, reason)
        })?;
        check_free_space(available, min_gib).map_err(|r| rejected(section, r))?;
    }

    Ok(())
}

/// Decode the octal escapes `/proc/mounts` uses for whitespace in paths
fn unescape_mount_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut rest = field;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let code = rest.get(idx + 1..idx + 4);
        match code.and_then(|c| u8::from_str_radix(c, 8).ok()) {
            Some(byte) => {
                out.push(char::from(byte));
                rest = &rest[idx + 4..];
            }
            None => {
                out.push('\\');
                rest = &rest[idx + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Device mounted at `mount_point`; the last matching entry wins
pub fn mounted_device(mounts: &str, mount_point: &Path) -> Option<String> {
    mounts
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mounted_at = unescape_mount_field(fields.next()?);
            (Path::new(&mounted_at) == mount_point).then(|| device.to_string())
        })
        .last()
}

/// Check the device mounted at `mount_point` carries `expected` as its UUID
///
/// # Errors
///
/// A human-readable reason when nothing is mounted there, the UUID lookup
/// fails or the UUIDs differ.
pub fn verify_medium<F>(
    mounts: &str,
    mount_point: &Path,
    expected: &str,
    lookup: F,
) -> Result<(), String>
where
    F: Fn(&str) -> Result<String, String>,
{
    let device = mounted_device(mounts, mount_point)
        .ok_or_else(|| format!("nothing is mounted at {}", mount_point.display()))?;
    let actual = lookup(&device)?;
    debug!(device = %device, uuid = %actual, "target medium");

    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(format!(
            "wrong medium at {}: {} has UUID {}, expected {}",
            mount_point.display(),
            device,
            actual,
            expected
        ));
    }
    Ok(())
}

/// Filesystem UUID of `device` via `blkid`
fn blkid_uuid(device: &str) -> Result<String, String> {
    let output = Command::new("blkid")
        .args(["-s", "UUID", "-o", "value", device])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("cannot run blkid: {}", e))?;
    let uuid = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || uuid.is_empty() {
        return Err(format!("cannot determine UUID of {} ({})", device, output.status));
    }
    Ok(uuid)
}

/// # Errors
///
/// A reason when `available_bytes` is below `min_gib`.
pub fn check_free_space(available_bytes: u64, min_gib: u64) -> Result<(), String> {
    let required = min_gib.saturating_mul(GIB);
    if available_bytes < required {
        return Err(format!(
            "only {:.1} GiB free on target, {} GiB required",
            available_bytes as f64 / GIB as f64,
            min_gib
        ));
    }
    Ok(())
}
