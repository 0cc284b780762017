use anyhow::Result;
use serde::Serialize;
use testprof::{RunOutcome, Sample, WrittenReport};

pub struct CliLogger {
    json: bool,
    no_color: bool,
}

#[derive(Debug, Serialize)]
struct RunDigest<'a> {
    total_tests: usize,
    total_time: f64,
    threshold: f64,
    slow_tests: Vec<SlowTest<'a>>,
    reports: &'a [WrittenReport],
    failures: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SlowTest<'a> {
    name: &'a str,
    duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    change_percent: Option<f64>,
}

impl<'a> From<&'a Sample> for SlowTest<'a> {
    fn from(sample: &'a Sample) -> Self {
        Self {
            name: &sample.name,
            duration: sample.duration,
            previous_duration: sample.previous_duration,
            change_percent: sample.change_percent(),
        }
    }
}

impl CliLogger {
    pub fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    pub fn no_color(&self) -> bool {
        self.no_color || self.json
    }

    pub fn print_outcome(&self, outcome: &RunOutcome, threshold: f64) -> Result<()> {
        if self.json {
            let digest = RunDigest {
                total_tests: outcome.data.total_tests(),
                total_time: outcome.data.total_time(),
                threshold,
                slow_tests: outcome
                    .data
                    .slow_tests(threshold)
                    .into_iter()
                    .map(SlowTest::from)
                    .collect(),
                reports: &outcome.reports,
                failures: outcome.failures.iter().map(|f| f.error.to_string()).collect(),
            };
            println!("{}", serde_json::to_string(&digest)?);
            return Ok(());
        }

        for failure in &outcome.failures {
            self.print_warning(&failure.error.to_string());
        }
        if let Some(summary) = &outcome.summary {
            print!("{summary}");
        }
        Ok(())
    }

    pub fn print_error(&self, msg: &str) {
        if self.json {
            let out = serde_json::json!({
                "status": "error",
                "message": msg,
            });
            println!("{out}");
            return;
        }
        eprintln!("{} {msg}", self.style("error", "31;1"));
    }

    pub fn print_warning(&self, msg: &str) {
        eprintln!("{} {msg}", self.style("warn", "33;1"));
    }

    fn style(&self, text: &str, ansi: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        format!("\x1b[{ansi}m{text}\x1b[0m")
    }
}
