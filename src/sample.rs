//! Per-test timing samples and their snapshot record form.

use serde::{Deserialize, Serialize};

/// One completed test's timing record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    /// Elapsed wall-clock seconds.
    pub duration: f64,
    /// Duration of the same-named test in the comparison snapshot, if one matched.
    pub previous_duration: Option<f64>,
}

/// Serialized form of a [`Sample`] inside a snapshot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub name: String,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl Sample {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            previous_duration: None,
        }
    }

    pub fn with_previous(mut self, previous_duration: Option<f64>) -> Self {
        self.previous_duration = previous_duration;
        self
    }

    /// `duration - previous_duration`.
    pub fn change(&self) -> Option<f64> {
        self.previous_duration.map(|prev| self.duration - prev)
    }

    /// Relative change in percent. `None` without a previous duration or when it is zero.
    pub fn change_percent(&self) -> Option<f64> {
        let prev = self.previous_duration?;
        if prev == 0.0 {
            return None;
        }
        Some((self.duration - prev) / prev * 100.0)
    }

    pub fn to_record(&self) -> SampleRecord {
        SampleRecord {
            name: self.name.clone(),
            duration: self.duration,
            previous_duration: self.previous_duration,
            change: self.change(),
            change_percent: self.change_percent(),
        }
    }

    /// Lenient decode of one snapshot entry. Returns `None` for entries that are not objects;
    /// wrong-typed fields fall back to defaults.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let map = value.as_object()?;
        let name = map
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let duration = map
            .get("duration")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let previous_duration = map.get("previous_duration").and_then(|v| v.as_f64());
        Some(Self {
            name,
            duration,
            previous_duration,
        })
    }
}
