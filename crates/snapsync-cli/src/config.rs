//! Configuration files
//!
//! Every top-level TOML table is one section. Paths below a mount point are
//! relative to that mount point:
//!
//! ```toml
//! [root]
//! source_mountpoint = "/"
//! source_path = ".snapshots"
//! target_mountpoint = "/run/media/backup"
//! target_path = "backup/root"
//! target_uuid = "ed918d69-3e7a-4798-bf83-cb9ad49b6d10"
//! target_min_space = 20
//! btrfs_command = ["ionice", "-c3", "btrfs"]
//! ```

use serde::Deserialize;
use snapsync_core::model::VolumeSpec;
use snapsync_core::SyncError;
use snapsync_engine::SyncSection;
use snapsync_store::BtrfsCommand;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    pub source_mountpoint: PathBuf,
    pub source_path: PathBuf,
    pub target_mountpoint: PathBuf,
    pub target_path: PathBuf,
    /// Filesystem UUID the target device must carry
    #[serde(default)]
    pub target_uuid: Option<String>,
    /// Minimum free space on the target, in GiB
    #[serde(default)]
    pub target_min_space: Option<u64>,
    #[serde(default)]
    pub btrfs_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSection {
    pub name: String,
    pub origin: PathBuf,
    pub config: SectionConfig,
}

impl NamedSection {
    /// # Errors
    ///
    /// `SyncError::InvalidConfig` for an empty `btrfs_command`.
    pub fn to_sync_section(&self) -> Result<SyncSection, SyncError> {
        let btrfs = match &self.config.btrfs_command {
            Some(argv) => BtrfsCommand::from_argv(argv.iter().map(String::as_str)).map_err(|_| {
                invalid(
                    &self.origin,
                    format!("[{}] btrfs_command must not be empty", self.name),
                )
            })?,
            None => BtrfsCommand::default(),
        };
        Ok(SyncSection {
            name: self.name.clone(),
            source: VolumeSpec::new(&self.config.source_mountpoint, &self.config.source_path),
            target: VolumeSpec::new(&self.config.target_mountpoint, &self.config.target_path),
            btrfs,
        })
    }
}

fn invalid(origin: &Path, reason: impl std::fmt::Display) -> SyncError {
    SyncError::InvalidConfig {
        reason: format!("{}: {}", origin.display(), reason),
    }
}

/// Parse one config document, keeping section declaration order
///
/// # Errors
///
/// `SyncError::InvalidConfig` on TOML syntax errors, non-table top-level
/// keys, missing or unknown section keys.
pub fn parse_config(raw: &str, origin: &Path) -> Result<Vec<NamedSection>, SyncError> {
    let table: toml::Table = raw.parse().map_err(|e| invalid(origin, e))?;

    table
        .into_iter()
        .map(|(name, value)| {
            if !value.is_table() {
                return Err(invalid(origin, format!("'{}' is not a section", name)));
            }
            let config: SectionConfig = value
                .try_into()
                .map_err(|e| invalid(origin, format!("[{}] {}", name, e)))?;
            Ok(NamedSection {
                name,
                origin: origin.to_path_buf(),
                config,
            })
        })
        .collect()
}

/// Load and merge config files in order
///
/// # Errors
///
/// `SyncError::InvalidConfig` if a file cannot be read or parsed, a section
/// name repeats, or no section is defined at all.
pub fn load_config(paths: &[PathBuf]) -> Result<Vec<NamedSection>, SyncError> {
    let mut sections = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        let raw = std::fs::read_to_string(path).map_err(|e| invalid(path, e))?;
        for section in parse_config(&raw, path)? {
            if !seen.insert(section.name.clone()) {
                return Err(invalid(
                    path,
                    format!("section [{}] is defined more than once", section.name),
                ));
            }
            sections.push(section);
        }
    }

    if sections.is_empty() {
        return Err(SyncError::InvalidConfig {
            reason: "no sections configured".to_string(),
        });
    }
    Ok(sections)
}

/// Keep only the requested sections, in config order
///
/// # Errors
///
/// `SyncError::InvalidConfig` for a requested name that is not configured.
pub fn select_sections(
    sections: Vec<NamedSection>,
    wanted: &[String],
) -> Result<Vec<NamedSection>, SyncError> {
    if wanted.is_empty() {
        return Ok(sections);
    }
    if let Some(missing) = wanted.iter().find(|w| !sections.iter().any(|s| &s.name == *w)) {
        return Err(SyncError::InvalidConfig {
            reason: format!("no section named [{}]", missing),
        });
    }
    Ok(sections
        .into_iter()
        .filter(|s| wanted.contains(&s.name))
        .collect())
}
