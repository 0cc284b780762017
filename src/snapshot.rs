//! Snapshot document format and lenient loading of prior runs.

use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::{Aggregate, ProfError, ProfResult, Sample, SampleRecord};

/// Durable form of an [`Aggregate`]; also the structured report format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub total_tests: usize,
    pub total_time: f64,
    /// RFC 3339 render time.
    pub timestamp: String,
    pub tests: Vec<SampleRecord>,
}

/// Load a prior run's snapshot for comparison.
///
/// Fails fast at the document level (`NotFound`, `Parse`) but skips individual entries that are
/// not objects. A missing or null `tests` field is an empty run.
pub fn load_snapshot(path: &Path) -> ProfResult<Aggregate> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        tracing::debug!("cannot read snapshot {}: {err}", path.display());
        ProfError::NotFound {
            path: path.to_path_buf(),
        }
    })?;
    parse(path, &text)
}

fn parse(path: &Path, text: &str) -> ProfResult<Aggregate> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ProfError::parse(path, e.to_string()))?;
    let doc = value
        .as_object()
        .ok_or_else(|| ProfError::parse(path, "expected a JSON object at top level"))?;

    let entries = match doc.get("tests") {
        None | Some(serde_json::Value::Null) => return Ok(Aggregate::default()),
        Some(serde_json::Value::Array(entries)) => entries,
        Some(_) => return Err(ProfError::parse(path, "`tests` must be a list")),
    };

    let mut samples = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match Sample::from_json(entry) {
            Some(sample) => samples.push(sample),
            None => tracing::warn!(
                "skipping malformed entry #{idx} in snapshot {}",
                path.display()
            ),
        }
    }
    Ok(Aggregate::new(samples))
}
