//! JSON-lines event log from a host test runner, replayed into a [`RunObserver`].

use serde::{Deserialize, Serialize};

use std::io::BufRead;
use std::path::Path;

use crate::{ProfError, ProfResult, RunObserver, RunOutcome, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Prepared {
        test: String,
        seconds: u64,
        #[serde(default)]
        nanos: u32,
    },
    Finished {
        test: String,
        seconds: u64,
        #[serde(default)]
        nanos: u32,
    },
    RunFinished,
}

/// Feed every event in `reader` to `observer`.
///
/// Blank lines are skipped. Input after `run_finished` is ignored; a log without one is
/// finished implicitly at end of input.
pub fn replay(
    reader: impl BufRead,
    source: &Path,
    observer: &mut impl RunObserver,
) -> ProfResult<RunOutcome> {
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: RunEvent = serde_json::from_str(&line)
            .map_err(|e| ProfError::parse(source, format!("line {}: {e}", idx + 1)))?;
        match event {
            RunEvent::Prepared {
                test,
                seconds,
                nanos,
            } => observer.on_prepared(
                &test,
                Timestamp::from_seconds_and_nanoseconds(seconds, u64::from(nanos)),
            ),
            RunEvent::Finished {
                test,
                seconds,
                nanos,
            } => observer.on_finished(
                &test,
                Timestamp::from_seconds_and_nanoseconds(seconds, u64::from(nanos)),
            ),
            RunEvent::RunFinished => {
                tracing::debug!("run finished at line {}", idx + 1);
                return Ok(observer.on_run_finished());
            }
        }
    }
    Ok(observer.on_run_finished())
}
