//! Structured (JSON) and formatted (HTML) report renderers.

use time::OffsetDateTime;
use time::macros::format_description;

use std::path::Path;

use crate::{Aggregate, ProfResult, Sample, write_json, write_text};

/// Changes at or below this many percent are not shown.
const CHANGE_EPSILON_PERCENT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Regressed,
    Improved,
}

/// Directional percentage annotation comparing a sample to its previous duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeIndicator {
    pub direction: ChangeDirection,
    /// Absolute relative change in percent.
    pub percent: f64,
}

impl ChangeIndicator {
    /// `None` when there is no previous duration, it is zero, or the change is negligible.
    pub fn for_sample(sample: &Sample) -> Option<Self> {
        let percent = sample.change_percent()?;
        if !percent.is_finite() || percent.abs() <= CHANGE_EPSILON_PERCENT {
            return None;
        }
        let direction = if sample.change()? > 0.0 {
            ChangeDirection::Regressed
        } else {
            ChangeDirection::Improved
        };
        Some(Self {
            direction,
            percent: percent.abs(),
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self.direction {
            ChangeDirection::Regressed => "↑",
            ChangeDirection::Improved => "↓",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.direction {
            ChangeDirection::Regressed => "worse",
            ChangeDirection::Improved => "better",
        }
    }

    /// e.g. `↑ 50.0%`.
    pub fn label(&self) -> String {
        format!("{} {:.1}%", self.symbol(), self.percent)
    }
}

/// Write the snapshot document for `data` to `path`.
pub fn save_json_report(data: &Aggregate, path: &Path) -> ProfResult<()> {
    write_json(path, &data.to_document()?)?;
    tracing::info!("wrote json report to {}", path.display());
    Ok(())
}

/// Write the HTML report for `data` to `path`.
pub fn save_html_report(data: &Aggregate, path: &Path) -> ProfResult<()> {
    write_text(path, &render_html(data, OffsetDateTime::now_utc())?)?;
    tracing::info!("wrote html report to {}", path.display());
    Ok(())
}

pub fn render_html(data: &Aggregate, generated_at: OffsetDateTime) -> ProfResult<String> {
    let mut rows = String::new();
    for sample in data.sorted_by_duration() {
        let change = ChangeIndicator::for_sample(sample)
            .map(|c| {
                format!(
                    "<span class=\"change {}\">{}</span>",
                    c.css_class(),
                    c.label()
                )
            })
            .unwrap_or_default();
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&sample.name),
            format_seconds(sample.duration),
            change
        ));
    }

    let generated = generated_at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?;
    let total_tests = data.total_tests();
    let total_time = format_seconds(data.total_time());
    let average_time = format_seconds(data.average_time());

    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>Test Profiler Report</title>\n<style>{HTML_STYLE}</style>\n</head>\n<body>\n<div class=\"container\">\n<h1>Test Profiler Report</h1>\n<div class=\"summary\">\n<div class=\"summary-item\"><div class=\"label\">Total Tests</div><div class=\"value\">{total_tests}</div></div>\n<div class=\"summary-item\"><div class=\"label\">Total Time</div><div class=\"value\">{total_time}</div></div>\n<div class=\"summary-item\"><div class=\"label\">Average Time</div><div class=\"value\">{average_time}</div></div>\n</div>\n<table>\n<thead><tr><th>Test Name</th><th>Duration</th><th>Change</th></tr></thead>\n<tbody>{rows}</tbody>\n</table>\n<div class=\"timestamp\">Generated at: {generated}</div>\n</div>\n</body>\n</html>\n"
    ))
}

const HTML_STYLE: &str = "*{margin:0;padding:0;box-sizing:border-box}body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;line-height:1.6;color:#333;background:#f5f5f5;padding:20px}.container{max-width:1200px;margin:0 auto;background:#fff;border-radius:8px;box-shadow:0 2px 4px rgba(0,0,0,.1);padding:30px}h1{color:#2c3e50;margin-bottom:10px;font-size:28px}.summary{display:flex;gap:20px;margin:20px 0;padding:20px;background:#f8f9fa;border-radius:6px}.summary-item{flex:1}.summary-item .label{font-size:14px;color:#666;margin-bottom:5px}.summary-item .value{font-size:24px;font-weight:bold;color:#2c3e50}table{width:100%;border-collapse:collapse;margin-top:20px}thead{background:#2c3e50;color:#fff}th,td{padding:12px;text-align:left}th{font-weight:600;font-size:14px;text-transform:uppercase;letter-spacing:.5px}tbody tr{border-bottom:1px solid #e0e0e0}tbody tr:nth-child(odd){background:#fafafa}tbody tr:hover{background:#f0f0f0}.change{font-weight:bold;padding:4px 8px;border-radius:4px;font-size:12px}.change.better{color:#27ae60;background:#d5f4e6}.change.worse{color:#e74c3c;background:#fadbd8}.timestamp{color:#666;font-size:14px;margin-top:20px;padding-top:20px;border-top:1px solid #e0e0e0}";

pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.3}s")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProfError, load_snapshot};
    use std::path::PathBuf;
    use time::macros::datetime;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("testprof-report-{name}-{}", uuid::Uuid::new_v4()))
    }

    fn compared() -> Aggregate {
        Aggregate::new(vec![
            Sample::new("fast", 0.2).with_previous(Some(0.4)),
            Sample::new("slow", 1.5).with_previous(Some(1.0)),
            Sample::new("steady", 1.0).with_previous(Some(1.0)),
        ])
    }

    #[test]
    fn indicator_marks_regression_and_improvement() {
        let regressed =
            ChangeIndicator::for_sample(&Sample::new("a", 1.5).with_previous(Some(1.0)))
                .expect("indicator");
        assert_eq!(regressed.direction, ChangeDirection::Regressed);
        assert_eq!(regressed.label(), "↑ 50.0%");

        let improved =
            ChangeIndicator::for_sample(&Sample::new("b", 0.2).with_previous(Some(0.4)))
                .expect("indicator");
        assert_eq!(improved.direction, ChangeDirection::Improved);
        assert_eq!(improved.label(), "↓ 50.0%");
    }

    #[test]
    fn indicator_direction_follows_difference_not_percent_sign() {
        let slower = ChangeIndicator::for_sample(&Sample::new("t", 1.5).with_previous(Some(-1.0)))
            .expect("indicator");
        assert_eq!(slower.direction, ChangeDirection::Regressed);
        assert_eq!(slower.label(), "↑ 250.0%");

        let faster = ChangeIndicator::for_sample(&Sample::new("t", -2.0).with_previous(Some(-1.0)))
            .expect("indicator");
        assert_eq!(faster.direction, ChangeDirection::Improved);
        assert_eq!(faster.label(), "↓ 100.0%");
    }

    #[test]
    fn indicator_hidden_for_negligible_missing_or_zero_previous() {
        assert!(ChangeIndicator::for_sample(&Sample::new("a", 1.0)).is_none());
        assert!(
            ChangeIndicator::for_sample(&Sample::new("a", 1.00005).with_previous(Some(1.0)))
                .is_none()
        );
        assert!(
            ChangeIndicator::for_sample(&Sample::new("a", 1.0).with_previous(Some(0.0)))
                .is_none()
        );
    }

    #[test]
    fn html_rows_are_sorted_slowest_first_with_badges() {
        let html = render_html(&compared(), datetime!(2026-01-02 03:04:05 UTC))
            .expect("render");
        let slow = html.find("<td>slow</td>").expect("slow row");
        let steady = html.find("<td>steady</td>").expect("steady row");
        let fast = html.find("<td>fast</td>").expect("fast row");
        assert!(slow < steady && steady < fast);
        assert!(html.contains("<span class=\"change worse\">↑ 50.0%</span>"));
        assert!(html.contains("<span class=\"change better\">↓ 50.0%</span>"));
        assert!(html.contains("<td>1.500s</td>"));
        assert!(html.contains("Generated at: 2026-01-02 03:04:05"));
    }

    #[test]
    fn html_for_empty_aggregate_has_no_rows() {
        let html = render_html(&Aggregate::default(), datetime!(2026-01-02 03:04:05 UTC))
            .expect("render");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"value\">0</div>"));
        assert!(html.contains("<div class=\"value\">0.000s</div>"));
        assert!(html.contains("<tbody></tbody>"));
    }

    #[test]
    fn html_escapes_test_names() {
        let data = Aggregate::new(vec![Sample::new("<script>&\"x\"", 0.1)]);
        let html = render_html(&data, datetime!(2026-01-02 03:04:05 UTC))
            .expect("render");
        assert!(html.contains("&lt;script&gt;&amp;&quot;x&quot;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn json_report_includes_change_fields_and_creates_dirs() {
        let out = temp_dir("json").join("nested").join("report.json");
        save_json_report(&compared(), &out).expect("save json");
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).expect("read")).expect("parse");
        assert_eq!(doc["total_tests"], 3);
        let slow = &doc["tests"][1];
        assert_eq!(slow["name"], "slow");
        assert_eq!(slow["previous_duration"], 1.0);
        assert_eq!(slow["change"], 0.5);
        assert_eq!(slow["change_percent"], 50.0);

        let loaded = load_snapshot(&out).expect("reload");
        assert_eq!(loaded.total_tests(), 3);
    }

    #[test]
    fn html_report_write_failure_is_write_error() {
        let root = temp_dir("blocked");
        std::fs::create_dir_all(&root).expect("mkdir");
        let blocker = root.join("file");
        std::fs::write(&blocker, b"x").expect("blocker");
        let err = save_html_report(&compared(), &blocker.join("report.html")).expect_err("fail");
        assert!(matches!(err, ProfError::Write { .. }));
    }
}
