//! The `quizdesk results` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use comfy_table::{Cell, Table};

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::results::{load_results, LoadedResults};
use quizdesk_report::Overview;

/// Write `<quiz>_ALL_RESULTS.txt` and print a per-student table.
pub fn execute_text(config: &QuizdeskConfig, name: &str) -> Result<()> {
    let Some(loaded) = load_or_report_empty(config, name)? else {
        return Ok(());
    };

    print_table(&loaded);

    let path = quizdesk_report::text::write_summary(&config.results_dir, name)?;
    println!("Full summary saved to {}", path.display());
    Ok(())
}

/// Write the self-contained HTML report.
pub fn execute_html(config: &QuizdeskConfig, name: &str, output: Option<PathBuf>) -> Result<()> {
    if load_or_report_empty(config, name)?.is_none() {
        return Ok(());
    }

    let path =
        quizdesk_report::html::write_html_report(&config.results_dir, name, output.as_deref())?;
    println!("HTML report written to {}", path.display());
    Ok(())
}

fn load_or_report_empty(config: &QuizdeskConfig, name: &str) -> Result<Option<LoadedResults>> {
    let loaded = load_results(&config.results_dir, name)?;
    if loaded.records.is_empty() && loaded.unreadable.is_empty() {
        println!("No submissions found for quiz: {name}");
        return Ok(None);
    }
    Ok(Some(loaded))
}

fn print_table(loaded: &LoadedResults) {
    let mut table = Table::new();
    table.set_header(vec!["Student", "Submitted", "Points", "Score", "Manual", "Late"]);

    for (_, r) in &loaded.records {
        table.add_row(vec![
            Cell::new(&r.student_name),
            Cell::new(
                r.timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S"),
            ),
            Cell::new(format!("{}/{}", r.score.earned_points, r.score.total_points)),
            Cell::new(format!("{:.2}%", r.score.percentage)),
            Cell::new(r.score.manual_count()),
            Cell::new(if r.late { "yes" } else { "" }),
        ]);
    }

    println!("{table}");

    let overview = Overview::from_results(loaded);
    if let Some(avg) = overview.average_percentage {
        println!("{} submission(s), average {avg:.2}%", overview.submissions);
    }
    if overview.unreadable > 0 {
        println!("{} result file(s) could not be read.", overview.unreadable);
    }
}
