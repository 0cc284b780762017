//! The profiler: wires runner notifications to the ledger and emits reports at run end.

use serde::Serialize;

use std::path::PathBuf;

use crate::{
    Aggregate, FinishOutcome, ProfError, ProfilerOptions, Sample, SummaryStyle, TimingLedger,
    Timestamp, load_snapshot, render_summary, save_html_report, save_json_report,
};

/// Notifications a host test runner delivers, serially, for one suite run.
pub trait RunObserver {
    fn on_prepared(&mut self, test_id: &str, at: Timestamp);
    fn on_finished(&mut self, test_id: &str, at: Timestamp);
    fn on_run_finished(&mut self) -> RunOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Json,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenReport {
    pub kind: ReportKind,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct ReportFailure {
    pub kind: ReportKind,
    pub error: ProfError,
}

/// Result of finishing a run. Report failures do not abort the run; they are collected here.
#[derive(Debug)]
pub struct RunOutcome {
    pub data: Aggregate,
    pub reports: Vec<WrittenReport>,
    pub failures: Vec<ReportFailure>,
    /// Console digest; `None` when no test was slow.
    pub summary: Option<String>,
}

#[derive(Debug)]
pub struct Profiler {
    options: ProfilerOptions,
    style: SummaryStyle,
    ledger: TimingLedger,
    results: Vec<Sample>,
    baseline: Option<Aggregate>,
}

impl Profiler {
    /// Build a profiler, loading the comparison snapshot if one is configured.
    ///
    /// An unreadable or malformed comparison snapshot only disables comparison.
    pub fn new(options: ProfilerOptions) -> Self {
        let baseline = options
            .compare_with
            .as_deref()
            .and_then(|path| match load_snapshot(path) {
                Ok(data) => {
                    tracing::debug!(
                        "loaded {} baseline samples from {}",
                        data.total_tests(),
                        path.display()
                    );
                    Some(data)
                }
                Err(err) => {
                    tracing::warn!("comparison disabled: {err}");
                    None
                }
            });
        Self::with_baseline(options, baseline)
    }

    pub fn with_baseline(options: ProfilerOptions, baseline: Option<Aggregate>) -> Self {
        Self {
            options,
            style: SummaryStyle::default(),
            ledger: TimingLedger::new(),
            results: Vec::new(),
            baseline,
        }
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    pub fn baseline(&self) -> Option<&Aggregate> {
        self.baseline.as_ref()
    }

    /// Samples recorded so far, in completion order.
    pub fn results(&self) -> &[Sample] {
        &self.results
    }

    /// Render configured reports and the console digest for a finished aggregate.
    pub fn finish_with(&self, data: Aggregate) -> RunOutcome {
        let mut reports = Vec::new();
        let mut failures = Vec::new();

        if let Some(path) = &self.options.output_path {
            match save_json_report(&data, path) {
                Ok(()) => reports.push(WrittenReport {
                    kind: ReportKind::Json,
                    path: path.clone(),
                }),
                Err(error) => {
                    tracing::warn!("json report failed: {error}");
                    failures.push(ReportFailure {
                        kind: ReportKind::Json,
                        error,
                    });
                }
            }
        }

        if let Some(path) = &self.options.html_output {
            match save_html_report(&data, path) {
                Ok(()) => reports.push(WrittenReport {
                    kind: ReportKind::Html,
                    path: path.clone(),
                }),
                Err(error) => {
                    tracing::warn!("html report failed: {error}");
                    failures.push(ReportFailure {
                        kind: ReportKind::Html,
                        error,
                    });
                }
            }
        }

        let summary = render_summary(&data, self.options.threshold, &reports, self.style);
        RunOutcome {
            data,
            reports,
            failures,
            summary,
        }
    }
}

impl RunObserver for Profiler {
    fn on_prepared(&mut self, test_id: &str, at: Timestamp) {
        self.ledger.record_start(test_id, at);
    }

    fn on_finished(&mut self, test_id: &str, at: Timestamp) {
        match self
            .ledger
            .record_finish(test_id, at, self.baseline.as_ref())
        {
            FinishOutcome::Recorded(sample) => self.results.push(sample),
            FinishOutcome::MissingStart => {}
        }
    }

    fn on_run_finished(&mut self) -> RunOutcome {
        if self.ledger.pending() > 0 {
            tracing::debug!("{} tests started but never finished", self.ledger.pending());
        }
        let data = Aggregate::new(std::mem::take(&mut self.results));
        self.finish_with(data)
    }
}
