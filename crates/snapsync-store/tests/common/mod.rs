#![allow(dead_code)]

use snapsync_store::BtrfsCommand;
use std::fs;
use std::path::Path;

/// Write a `sh` script standing in for btrfs and return a command that runs it
///
/// `body` sees the btrfs arguments as `$1..`.
pub fn fake_btrfs(dir: &Path, body: &str) -> BtrfsCommand {
    let script = dir.join("fake-btrfs.sh");
    fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
    BtrfsCommand::from_argv(["sh".into(), script.into_os_string()]).unwrap()
}

/// Fake whose `send` prints its own arguments and whose `receive` stores the
/// stream in `<destination>/stream`
pub fn echoing_btrfs(dir: &Path) -> BtrfsCommand {
    fake_btrfs(
        dir,
        r#"case "$1" in
  send) shift; printf 'stream for %s' "$*"; exit 0 ;;
  receive) cat > "$2/stream" ;;
  *) exit 64 ;;
esac"#,
    )
}
