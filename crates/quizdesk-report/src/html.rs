//! HTML results report.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use quizdesk_core::results::{load_results, LoadedResults, ResultRecord};
use quizdesk_core::scoring::Correctness;

use crate::Overview;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report for one quiz's results.
pub fn generate_html(quiz_name: &str, loaded: &LoadedResults, generated: DateTime<Local>) -> String {
    let overview = Overview::from_results(loaded);
    let title = loaded
        .records
        .first()
        .map(|(_, r)| r.quiz_title.as_str())
        .unwrap_or(quiz_name);

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizdesk results: {}</title>\n",
        html_escape(title)
    ));
    html.push_str(&format!("<style>\n{CSS}</style>\n</head>\n<body>\n"));

    html.push_str(&format!(
        "<header>\n<h1>{}</h1>\n<p class=\"meta\">Quiz: <strong>{}</strong> | {} submissions | generated {}</p>\n</header>\n",
        html_escape(title),
        html_escape(quiz_name),
        overview.submissions,
        generated.format("%Y-%m-%d %H:%M:%S")
    ));

    html.push_str("<section class=\"overview\">\n");
    html.push_str("<h2>Overview</h2>\n");
    html.push_str("<table class=\"summary\">\n<tbody>\n");
    let pct = |v: Option<f64>| v.map_or("-".to_string(), |p| format!("{p:.2}%"));
    for (label, value) in [
        ("Submissions", overview.submissions.to_string()),
        ("Average score", pct(overview.average_percentage)),
        ("Highest score", pct(overview.highest_percentage)),
        ("Lowest score", pct(overview.lowest_percentage)),
        ("Awaiting manual grading", overview.manual_answers.to_string()),
        ("Late submissions", overview.late_submissions.to_string()),
    ] {
        html.push_str(&format!("<tr><th>{label}</th><td>{value}</td></tr>\n"));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"submissions\">\n");
    html.push_str("<h2>Submissions</h2>\n");
    html.push_str("<table class=\"sortable\">\n<thead><tr>");
    for heading in ["Student", "Submitted", "Points", "Score", "Manual"] {
        html.push_str(&format!("<th onclick=\"sortBy(this)\">{heading}</th>"));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for (_, r) in &loaded.records {
        let class = if r.late { " class=\"late\"" } else { "" };
        html.push_str(&format!(
            "<tr{class}><td>{}</td><td data-value=\"{}\">{}</td><td data-value=\"{}\">{}/{}</td><td data-value=\"{}\">{:.2}%</td><td>{}</td></tr>\n",
            html_escape(&r.student_name),
            r.timestamp.timestamp(),
            r.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            r.score.earned_points,
            r.score.earned_points,
            r.score.total_points,
            r.score.percentage,
            r.score.percentage,
            r.score.manual_count(),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"details\">\n");
    html.push_str("<h2>Answers</h2>\n");
    for (_, r) in &loaded.records {
        html.push_str(&submission_detail(r));
    }
    html.push_str("</section>\n");

    if !loaded.unreadable.is_empty() {
        html.push_str("<section class=\"unreadable\">\n<h2>Unreadable files</h2>\n<ul>\n");
        for bad in &loaded.unreadable {
            html.push_str(&format!(
                "<li><code>{}</code>: {}</li>\n",
                html_escape(&bad.path.display().to_string()),
                html_escape(&bad.error)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    let records: Vec<&ResultRecord> = loaded.records.iter().map(|(_, r)| r).collect();
    html.push_str("<section class=\"raw\">\n<details>\n<summary>Result records (JSON)</summary>\n<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(&records).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n</details>\n</section>\n");

    html.push_str(&format!("<script>\n{JS}</script>\n</body>\n</html>"));
    html
}

fn submission_detail(r: &ResultRecord) -> String {
    let mut html = format!(
        "<details class=\"submission\">\n<summary>{} ({:.2}%)</summary>\n",
        html_escape(&r.student_name),
        r.score.percentage
    );
    html.push_str("<table>\n<thead><tr><th>#</th><th>Question</th><th>Answer</th><th>Correct answer</th><th>Points</th></tr></thead>\n<tbody>\n");

    for (i, question) in r.questions.iter().enumerate() {
        let result = r.score.question_results.get(i);
        let class = match result.map(|q| q.correct) {
            Some(Correctness::Correct) => "pass",
            Some(Correctness::Incorrect) => "fail",
            Some(Correctness::Manual) | None => "manual",
        };
        let answer = r
            .answers
            .get(&i.to_string())
            .map(|a| a.joined(", "))
            .unwrap_or_default();
        let expected = if question.needs_manual_grading() {
            "<em>manual</em>".to_string()
        } else {
            html_escape(&question.correct_answer_display())
        };
        let points = result
            .map(|q| format!("{}/{}", q.points_earned, q.points_possible))
            .unwrap_or_default();

        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td><td>{expected}</td><td>{points}</td></tr>\n",
            i + 1,
            html_escape(&question.text),
            html_escape(&answer),
        ));
    }

    html.push_str("</tbody></table>\n</details>\n");
    html
}

/// Load every result for `quiz_name` and write the HTML report to `path`,
/// or to `<results_dir>/<quiz>/<quiz>_report.html` when `path` is `None`.
pub fn write_html_report(results_dir: &Path, quiz_name: &str, path: Option<&Path>) -> Result<PathBuf> {
    let loaded = load_results(results_dir, quiz_name)
        .with_context(|| format!("failed to load results for {quiz_name}"))?;
    let html = generate_html(quiz_name, &loaded, Local::now());

    let path = match path {
        Some(p) => p.to_path_buf(),
        None => results_dir
            .join(quiz_name)
            .join(format!("{quiz_name}_report.html")),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, html)?;
    Ok(path)
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --manual: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --manual: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
table.summary { width: auto; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.manual { background: var(--manual); }
tr.late td:first-child::after { content: " (late)"; color: #b45309; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function sortBy(th) {
  const table = th.closest('table');
  const col = Array.from(th.parentNode.children).indexOf(th);
  const body = table.tBodies[0];
  const dir = th.dataset.dir === 'asc' ? -1 : 1;
  th.dataset.dir = dir === 1 ? 'asc' : 'desc';
  const key = tr => tr.cells[col].dataset.value ?? tr.cells[col].textContent.trim();
  Array.from(body.rows)
    .sort((a, b) => dir * key(a).localeCompare(key(b), undefined, { numeric: true }))
    .forEach(tr => body.appendChild(tr));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use quizdesk_core::model::AnswerValue;
    use quizdesk_core::results::ResultWriter;

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html("art", &fixtures::loaded(), Local::now());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<title>quizdesk results: Art</title>"));
        assert!(html.contains("Ada"));
        assert!(html.contains("Bob"));
        assert!(html.contains("Blue, Red"));
        assert!(html.contains("<em>manual</em>"));
        assert!(html.contains("class=\"late\""));
        assert!(html.contains("broken.json"));
    }

    #[test]
    fn html_report_escapes_student_content() {
        let html = generate_html("art", &fixtures::loaded(), Local::now());
        assert!(html.contains("Describe &lt;your&gt; favourite painting."));
        assert!(html.contains("Starry Night &amp; more"));
        assert!(!html.contains("<your>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        ResultWriter::new(dir.path())
            .write(&fixtures::record(
                "Grace",
                AnswerValue::Choices(vec!["Red".into(), "Blue".into()]),
                false,
            ))
            .unwrap();

        let path = write_html_report(dir.path(), "art", None).unwrap();
        assert!(path.ends_with("art/art_report.html"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
        assert!(content.contains("Grace"));

        let custom = dir.path().join("out").join("report.html");
        write_html_report(dir.path(), "art", Some(&custom)).unwrap();
        assert!(custom.exists());
    }
}
