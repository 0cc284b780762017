//! Start/finish pairing for in-flight tests.

use std::collections::HashMap;

use crate::{Aggregate, Sample, Timestamp};

/// What a finish notification produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    Recorded(Sample),
    /// No start was recorded for this test; nothing is emitted.
    MissingStart,
}

impl FinishOutcome {
    pub fn into_sample(self) -> Option<Sample> {
        match self {
            Self::Recorded(sample) => Some(sample),
            Self::MissingStart => None,
        }
    }
}

/// Keyed table of start timestamps for tests that have not finished yet.
///
/// Not synchronized: a runner that executes tests in parallel must guard it or keep one per
/// worker.
#[derive(Debug, Default)]
pub struct TimingLedger {
    starts: HashMap<String, Timestamp>,
}

impl TimingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember when `test_id` started. A repeated start replaces the earlier one.
    pub fn record_start(&mut self, test_id: &str, at: Timestamp) {
        if self.starts.insert(test_id.to_string(), at).is_some() {
            tracing::debug!("restarted {test_id} before it finished");
        }
    }

    /// Pair a finish with its start and emit a sample. Each start is consumed at most once.
    pub fn record_finish(
        &mut self,
        test_id: &str,
        at: Timestamp,
        baseline: Option<&Aggregate>,
    ) -> FinishOutcome {
        let Some(start) = self.starts.remove(test_id) else {
            tracing::debug!("ignoring finish for {test_id}: no matching start");
            return FinishOutcome::MissingStart;
        };
        let duration = at.duration_since(start);
        let previous = baseline.and_then(|b| b.test_time(test_id));
        FinishOutcome::Recorded(Sample::new(test_id, duration).with_previous(previous))
    }

    /// Number of tests started but not yet finished.
    pub fn pending(&self) -> usize {
        self.starts.len()
    }
}
