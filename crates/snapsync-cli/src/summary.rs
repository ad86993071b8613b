//! Run summary printed to stdout

use snapsync_engine::{RunSummary, SectionReport};
use std::fmt::Write;

fn transfers(report: &SectionReport) -> String {
    report
        .completed
        .iter()
        .map(|c| match c.parent {
            Some(p) => format!("{} (from {})", c.ordinal, p),
            None => format!("{} (full)", c.ordinal),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn ordinals(list: &[u64]) -> String {
    list.iter().map(u64::to_string).collect::<Vec<_>>().join(", ")
}

fn render_section(out: &mut String, report: &SectionReport) -> std::fmt::Result {
    let verb = if report.dry_run { "would transfer" } else { "transferred" };

    match &report.error {
        Some(err) => {
            write!(out, "[{}] FAILED: {}", report.name, err)?;
            if !report.completed.is_empty() {
                write!(out, "; {} {}", verb, transfers(report))?;
            }
            if !report.remaining.is_empty() {
                write!(out, "; still pending {}", ordinals(&report.remaining))?;
            }
        }
        None if report.completed.is_empty() => {
            write!(out, "[{}] up to date ({} common)", report.name, report.common.len())?;
        }
        None => write!(out, "[{}] {} {}", report.name, verb, transfers(report))?,
    }

    if !report.warnings.is_empty() {
        write!(out, "; {} warning(s)", report.warnings.len())?;
    }
    out.push('\n');

    for warning in &report.warnings {
        writeln!(out, "  warning: {}", warning)?;
    }
    Ok(())
}

pub fn render(summary: &RunSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    for report in &summary.sections {
        let _ = render_section(&mut out, report);
    }
    if summary.skipped > 0 {
        let _ = writeln!(out, "skipped {} section(s) after failure", summary.skipped);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsync_core::diff::{IntegrityWarning, UnverifiedReason};
    use snapsync_core::sequencer::CompletedTransfer;
    use snapsync_core::SyncError;
    use snapsync_core::core_types::RunId;
    use std::path::PathBuf;

    fn ok_report(name: &str) -> SectionReport {
        let mut r = SectionReport::failed(
            name,
            RunId::new(),
            SyncError::InvalidConfig {
                reason: String::new(),
            },
        );
        r.error = None;
        r
    }

    fn done(ordinal: u64, parent: Option<u64>) -> CompletedTransfer {
        CompletedTransfer {
            ordinal,
            parent,
            destination: PathBuf::from(format!("/t/{}", ordinal)),
        }
    }

    #[test]
    fn test_transferred_line() {
        let mut report = ok_report("root");
        report.completed = vec![done(1, None), done(2, Some(1))];

        let summary = RunSummary {
            sections: vec![report],
            skipped: 0,
        };

        assert_eq!(render(&summary), "[root] transferred 1 (full), 2 (from 1)\n");
    }

    #[test]
    fn test_up_to_date_with_warning() {
        let mut report = ok_report("home");
        report.common = vec![1, 2];
        report.warnings = vec![IntegrityWarning::Unverified {
            ordinal: 2,
            reason: UnverifiedReason::MissingSidecar,
        }];

        let out = render(&RunSummary {
            sections: vec![report],
            skipped: 0,
        });

        assert!(out.starts_with("[home] up to date (2 common); 1 warning(s)\n"));
        assert!(out.contains("  warning: "));
    }

    #[test]
    fn test_failure_lists_remaining_and_skipped() {
        let mut report = ok_report("root");
        report.completed = vec![done(1, None)];
        report.remaining = vec![2, 3];
        report.error = Some(SyncError::Listing {
            mount: "/".to_string(),
            reason: "boom".to_string(),
        });

        let out = render(&RunSummary {
            sections: vec![report],
            skipped: 1,
        });

        assert!(out.contains("[root] FAILED: "));
        assert!(out.contains("transferred 1 (full)"));
        assert!(out.contains("still pending 2, 3"));
        assert!(out.ends_with("skipped 1 section(s) after failure\n"));
    }
}
