//! Aggregate view over one run's samples.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::{ProfResult, Sample, SnapshotDocument};

/// The full, immutable set of samples for one run, in completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    samples: Vec<Sample>,
    total_time: f64,
}

impl Aggregate {
    pub fn new(samples: Vec<Sample>) -> Self {
        let total_time = samples.iter().map(|s| s.duration).sum();
        Self {
            samples,
            total_time,
        }
    }

    pub fn total_tests(&self) -> usize {
        self.samples.len()
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Mean duration; an empty run divides by one.
    pub fn average_time(&self) -> f64 {
        self.total_time / self.total_tests().max(1) as f64
    }

    pub fn all_results(&self) -> &[Sample] {
        &self.samples
    }

    /// Samples with `duration >= threshold`, slowest first. Ties keep completion order.
    pub fn slow_tests(&self, threshold: f64) -> Vec<&Sample> {
        let mut slow: Vec<&Sample> = self
            .samples
            .iter()
            .filter(|s| s.duration >= threshold)
            .collect();
        sort_slowest_first(&mut slow);
        slow
    }

    /// Every sample, slowest first.
    pub fn sorted_by_duration(&self) -> Vec<&Sample> {
        let mut all: Vec<&Sample> = self.samples.iter().collect();
        sort_slowest_first(&mut all);
        all
    }

    /// Duration of the first sample named `name`.
    pub fn test_time(&self, name: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.duration)
    }

    /// Copy of this aggregate with every `previous_duration` re-resolved against `baseline`.
    pub fn compared_with(&self, baseline: &Aggregate) -> Aggregate {
        let samples = self
            .samples
            .iter()
            .map(|s| {
                Sample::new(s.name.clone(), s.duration).with_previous(baseline.test_time(&s.name))
            })
            .collect();
        Aggregate::new(samples)
    }

    /// Structured snapshot form, stamped with the current time.
    pub fn to_document(&self) -> ProfResult<SnapshotDocument> {
        Ok(SnapshotDocument {
            total_tests: self.total_tests(),
            total_time: self.total_time,
            timestamp: OffsetDateTime::now_utc().format(&Rfc3339)?,
            tests: self.samples.iter().map(Sample::to_record).collect(),
        })
    }
}

fn sort_slowest_first(samples: &mut [&Sample]) {
    samples.sort_by(|a, b| b.duration.total_cmp(&a.duration));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate() -> Aggregate {
        Aggregate::new(vec![
            Sample::new("fast", 0.1),
            Sample::new("slow", 1.5),
            Sample::new("medium", 0.7),
            Sample::new("tie", 0.7),
        ])
    }

    #[test]
    fn totals_are_computed_on_construction() {
        let agg = aggregate();
        assert_eq!(agg.total_tests(), 4);
        assert!((agg.total_time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn all_results_keep_completion_order() {
        let names: Vec<_> = aggregate()
            .all_results()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["fast", "slow", "medium", "tie"]);
    }

    #[test]
    fn slow_tests_filter_inclusive_and_sort_descending() {
        let agg = aggregate();
        let names: Vec<_> = agg
            .slow_tests(0.7)
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["slow", "medium", "tie"]);
    }

    #[test]
    fn slow_tests_extremes() {
        let agg = aggregate();
        assert!(agg.slow_tests(f64::INFINITY).is_empty());
        assert_eq!(agg.slow_tests(0.0).len(), agg.total_tests());
    }

    #[test]
    fn test_time_returns_first_match() {
        let agg = Aggregate::new(vec![Sample::new("dup", 1.0), Sample::new("dup", 2.0)]);
        assert_eq!(agg.test_time("dup"), Some(1.0));
        assert_eq!(agg.test_time("missing"), None);
    }

    #[test]
    fn empty_aggregate_average_is_zero() {
        let agg = Aggregate::new(Vec::new());
        assert_eq!(agg.total_tests(), 0);
        assert_eq!(agg.total_time(), 0.0);
        assert_eq!(agg.average_time(), 0.0);
    }

    #[test]
    fn compared_with_resolves_previous_by_name() {
        let baseline = Aggregate::new(vec![Sample::new("slow", 1.0)]);
        let agg = aggregate().compared_with(&baseline);
        assert_eq!(agg.all_results()[1].previous_duration, Some(1.0));
        assert_eq!(agg.all_results()[0].previous_duration, None);
    }

    #[test]
    fn document_carries_totals_and_timestamp() {
        let doc = aggregate().to_document().expect("document");
        assert_eq!(doc.total_tests, 4);
        assert_eq!(doc.tests.len(), 4);
        assert!(OffsetDateTime::parse(&doc.timestamp, &Rfc3339).is_ok());
    }
}
