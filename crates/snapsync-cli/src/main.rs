//! snapsync CLI
//!
//! Brings btrfs backup volumes up to date with local snapper snapshots

use clap::Parser;
use snapsync_core::core_types::RunId;
use snapsync_core::logging_facility::{init, Profile};
use snapsync_engine::{run_section, sync_all, SectionReport, SyncOptions};
use std::path::PathBuf;

mod config;
mod preflight;
mod summary;

use config::NamedSection;

#[derive(Debug, Parser)]
#[command(name = "snapsync")]
#[command(about = "snapsync - Incremental btrfs backup of snapper snapshots", long_about = None)]
struct Cli {
    /// Config files; sections run in file order, then declaration order
    #[arg(required = true, value_name = "CONFIG")]
    configs: Vec<PathBuf>,

    /// Log every pipeline stage
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    json_logs: bool,

    /// Plan and log transfers without creating, sending or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Stop at the first failed section
    #[arg(long)]
    fail_fast: bool,

    /// Only run the named section (repeatable)
    #[arg(long = "section", value_name = "NAME")]
    sections: Vec<String>,
}

impl Cli {
    fn profile(&self) -> Profile {
        if self.json_logs {
            Profile::Production
        } else if self.verbose {
            Profile::Verbose
        } else {
            Profile::Development
        }
    }
}

fn run_named(section: &NamedSection, options: &SyncOptions) -> SectionReport {
    let sync_section = match section.to_sync_section() {
        Ok(s) => s,
        Err(e) => return SectionReport::failed(section.name.clone(), RunId::new(), e),
    };
    if let Err(e) = preflight::check_section(section) {
        return SectionReport::failed(section.name.clone(), RunId::new(), e);
    }
    run_section(&sync_section, options.dry_run)
}

/// Returns whether every section succeeded
fn execute(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let sections = config::load_config(&cli.configs)?;
    let sections = config::select_sections(sections, &cli.sections)?;

    let options = SyncOptions {
        dry_run: cli.dry_run,
        fail_fast: cli.fail_fast,
    };
    let summary = sync_all(&sections, &options, run_named);

    print!("{}", summary::render(&summary));
    for failed in summary.failed() {
        if let Some(err) = &failed.error {
            eprintln!("Error: [{}] {}", failed.name, err);
        }
    }
    Ok(!summary.has_failures())
}

fn main() {
    let cli = Cli::parse();
    init(cli.profile());

    match execute(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
