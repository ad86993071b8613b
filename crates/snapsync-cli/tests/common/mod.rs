#![allow(dead_code)]

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const TARGET_PATH: &str = "backup/root";

/// Temp workspace with a fake btrfs script and a target mount directory
pub struct Fixture {
    pub dir: TempDir,
    pub script: PathBuf,
    pub target_mount: PathBuf,
}

impl Fixture {
    /// `source` lists the snapper ordinals present on the source side
    pub fn new(source: &[u64]) -> Self {
        let dir = TempDir::new().unwrap();
        let target_mount = dir.path().join("target");
        fs::create_dir_all(target_mount.join(TARGET_PATH)).unwrap();

        let state = dir.path().join("target-listing");
        let source_lines: String = source
            .iter()
            .map(|n| {
                format!(
                    "ID {} gen 10 top level 5 uuid uuid-{} path .snapshots/{}/snapshot\n",
                    256 + n,
                    n,
                    n
                )
            })
            .collect();
        let script = dir.path().join("btrfs.sh");
        fs::write(
            &script,
            format!(
                r#"#!/bin/sh
STATE='{state}'
case "$1" in
  subvolume)
    case "$3" in
      -s) printf '%s' '{source_lines}' ;;
      -a) if [ -f "$STATE" ]; then cat "$STATE"; fi ;;
    esac ;;
  send) printf 'stream' ;;
  receive)
    cat > /dev/null
    n=$(basename "$2")
    mkdir "$2/snapshot"
    row="ID 30$n gen 1 top level 5 uuid recv-$n"
    echo "$row path <FS_TREE>/{target_path}/$n/snapshot" >> "$STATE" ;;
  *) exit 64 ;;
esac
"#,
                state = state.display(),
                source_lines = source_lines,
                target_path = TARGET_PATH,
            ),
        )
        .unwrap();

        Self {
            dir,
            script,
            target_mount,
        }
    }

    /// Section table using this fixture's target and fake btrfs
    pub fn section(&self, name: &str, extra: &str) -> String {
        format!(
            concat!(
                "[{name}]\n",
                "source_mountpoint = \"/\"\n",
                "source_path = \".snapshots\"\n",
                "target_mountpoint = \"{}\"\n",
                "target_path = \"{}\"\n",
                "btrfs_command = [\"sh\", \"{}\"]\n",
                "{extra}\n",
            ),
            self.target_mount.display(),
            TARGET_PATH,
            self.script.display(),
            name = name,
            extra = extra,
        )
    }

    pub fn write_config(&self, file: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(file);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn snapshot_dir(&self, ordinal: u64) -> PathBuf {
        self.target_mount.join(TARGET_PATH).join(ordinal.to_string())
    }
}

pub fn snapsync<P: AsRef<OsStr>>(args: &[P], flags: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snapsync"))
        .args(flags)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
