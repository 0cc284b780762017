//! Console digest of the slowest tests in a run.

use crate::{Aggregate, ChangeDirection, ChangeIndicator, ReportKind, WrittenReport};

/// How many slow tests the digest lists.
pub const SUMMARY_LIMIT: usize = 10;

const RULE_WIDE: &str = "==========================================";
const RULE_NARROW: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryStyle {
    pub no_color: bool,
}

impl SummaryStyle {
    pub fn plain() -> Self {
        Self { no_color: true }
    }

    fn paint(&self, text: &str, ansi: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        format!("\x1b[{ansi}m{text}\x1b[0m")
    }
}

/// Render the console summary, or `None` when no test reached `threshold`.
pub fn render_summary(
    data: &Aggregate,
    threshold: f64,
    reports: &[WrittenReport],
    style: SummaryStyle,
) -> Option<String> {
    let slow = data.slow_tests(threshold);
    if slow.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push('\n');
    out.push_str(RULE_WIDE);
    out.push('\n');
    out.push_str(&style.paint("Test Profiler Results", "36;1"));
    out.push('\n');
    out.push_str(RULE_WIDE);
    out.push('\n');
    out.push_str(&format!("Total tests: {}\n", data.total_tests()));
    out.push_str(&format!("Total time: {:.3}s\n", data.total_time()));
    out.push_str(&format!(
        "Slow tests (>{threshold:.3}s): {}\n\n",
        slow.len()
    ));
    out.push_str("Slowest tests:\n");
    out.push_str(RULE_NARROW);
    out.push('\n');

    for sample in slow.iter().take(SUMMARY_LIMIT) {
        let change = ChangeIndicator::for_sample(sample)
            .map(|c| {
                let ansi = match c.direction {
                    ChangeDirection::Regressed => "31",
                    ChangeDirection::Improved => "32",
                };
                format!(" {}", style.paint(&c.label(), ansi))
            })
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:.3}s  {}{}\n",
            sample.duration, sample.name, change
        ));
    }
    out.push('\n');

    for report in reports {
        let label = match report.kind {
            ReportKind::Json => "Report saved to",
            ReportKind::Html => "HTML report saved to",
        };
        out.push_str(&format!("{label}: {}\n", report.path.display()));
    }

    Some(out)
}
