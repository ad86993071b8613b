//! Multi-section runs.
//!
//! Sections run one after another with no shared state. A failed section is
//! reported and the next one still runs, unless `fail_fast` is set.

use crate::commands::section::SectionReport;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub dry_run: bool,
    /// Stop at the first failed section
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub sections: Vec<SectionReport>,
    /// Sections never started because of `fail_fast`
    pub skipped: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.skipped > 0 || self.sections.iter().any(|s| !s.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| !s.is_success())
    }
}

/// Run `run` over every item in order, isolating failures
pub fn sync_all<T, F>(items: &[T], options: &SyncOptions, mut run: F) -> RunSummary
where
    F: FnMut(&T, &SyncOptions) -> SectionReport,
{
    let mut summary = RunSummary::default();

    for (idx, item) in items.iter().enumerate() {
        let report = run(item, options);
        let failed = !report.is_success();
        if let Some(err) = &report.error {
            warn!(section = %report.name, error = %err, "section failed");
        }
        summary.sections.push(report);

        if failed && options.fail_fast {
            summary.skipped = items.len() - idx - 1;
            break;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsync_core::SyncError;
    use snapsync_core_types::RunId;

    fn report(name: &str, ok: bool) -> SectionReport {
        let mut r = SectionReport::failed(
            name,
            RunId::new(),
            SyncError::InvalidConfig {
                reason: "x".to_string(),
            },
        );
        if ok {
            r.error = None;
        }
        r
    }

    #[test]
    fn test_failure_does_not_stop_later_sections() {
        let items = [("a", true), ("b", false), ("c", true)];

        let summary = sync_all(&items, &SyncOptions::default(), |(n, ok), _| report(n, *ok));

        assert_eq!(summary.sections.len(), 3);
        assert_eq!(summary.skipped, 0);
        assert!(summary.has_failures());
        assert_eq!(summary.failed().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_fail_fast_skips_remaining() {
        let items = [("a", false), ("b", true), ("c", true)];
        let options = SyncOptions {
            fail_fast: true,
            ..Default::default()
        };

        let summary = sync_all(&items, &options, |(n, ok), _| report(n, *ok));

        assert_eq!(summary.sections.len(), 1);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn test_all_successful() {
        let items = [("a", true)];
        let summary = sync_all(&items, &SyncOptions::default(), |(n, ok), _| report(n, *ok));
        assert!(!summary.has_failures());
    }
}
