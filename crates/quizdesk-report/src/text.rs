//! Plain-text results summary.
//!
//! One block per submission listing every question with the student's
//! answer next to the declared answer, so manual grading can happen from
//! a single file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use quizdesk_core::model::Question;
use quizdesk_core::results::{load_results, LoadedResults, ResultRecord};

use crate::Overview;

const RULE: usize = 80;

/// Build the summary text.
pub fn generate_summary(quiz_name: &str, loaded: &LoadedResults, generated: DateTime<Local>) -> String {
    let heavy = "=".repeat(RULE);
    let light = "-".repeat(RULE);
    let overview = Overview::from_results(loaded);

    let mut out = String::new();
    out.push_str("QUIZ RESULTS SUMMARY\n");
    out.push_str(&format!("{heavy}\n"));
    out.push_str(&format!("Quiz: {quiz_name}\n"));
    out.push_str(&format!("Total Submissions: {}\n", overview.submissions));
    if let Some(avg) = overview.average_percentage {
        out.push_str(&format!("Average Auto-Graded Score: {avg:.2}%\n"));
    }
    if overview.manual_answers > 0 {
        out.push_str(&format!(
            "Answers Awaiting Manual Grading: {}\n",
            overview.manual_answers
        ));
    }
    out.push_str(&format!(
        "Generated: {}\n",
        generated.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("{heavy}\n\n"));

    for (i, (_, record)) in loaded.records.iter().enumerate() {
        out.push_str(&format!("\n{light}\nSUBMISSION #{}\n{light}\n", i + 1));
        push_submission(&mut out, record, &light);
        out.push('\n');
    }

    for bad in &loaded.unreadable {
        out.push_str(&format!(
            "\n[Error loading {}: {}]\n\n",
            bad.path.display(),
            bad.error
        ));
    }

    out.push_str(&format!("\n{heavy}\nEND OF RESULTS\n{heavy}\n"));
    out
}

fn push_submission(out: &mut String, record: &ResultRecord, light: &str) {
    let score = &record.score;
    out.push_str(&format!("Student Name: {}\n", record.student_name));
    out.push_str(&format!("Submitted: {}\n", record.timestamp.to_rfc3339()));
    out.push_str(&format!("Session ID: {}\n", record.session_id));
    if record.late {
        out.push_str("Late: submitted after the time limit\n");
    }
    out.push('\n');
    out.push_str(&format!("TOTAL POINTS POSSIBLE: {}\n", score.total_points));
    out.push_str(&format!(
        "AUTO-GRADED: {}/{} ({}%)\n",
        score.earned_points, score.total_points, score.percentage
    ));
    if score.manual_count() > 0 {
        out.push_str("(Review the manually graded answers below and adjust the final score)\n");
    }
    out.push('\n');

    out.push_str(&format!("STUDENT RESPONSES:\n{light}\n"));
    for (i, question) in record.questions.iter().enumerate() {
        push_question(out, i, question, record);
    }
}

fn push_question(out: &mut String, index: usize, question: &Question, record: &ResultRecord) {
    let answer = record
        .answers
        .get(&index.to_string())
        .map(|a| a.joined(", "))
        .unwrap_or_else(|| "[No Answer]".to_string());
    let verdict = record
        .score
        .question_results
        .get(index)
        .map(|r| r.correct.label())
        .unwrap_or("-");

    out.push_str(&format!(
        "\nQuestion {} [{}] - {} point(s)\n",
        index + 1,
        question.question_type().label(),
        question.weight
    ));
    out.push_str(&format!("  Question: {}\n", question.text));
    if !question.options().is_empty() {
        out.push_str(&format!("  Options: {}\n", question.options().join(", ")));
    }
    out.push_str(&format!("  STUDENT ANSWERED: {answer}\n"));
    if question.needs_manual_grading() {
        out.push_str("  CORRECT ANSWER:  [Manual grading]\n");
    } else {
        out.push_str(&format!(
            "  CORRECT ANSWER:  {}\n",
            question.correct_answer_display()
        ));
    }
    out.push_str(&format!("  RESULT: {verdict}\n"));
}

/// Load every result for `quiz_name`, write `<quiz>_ALL_RESULTS.txt` next to
/// them, and return its path.
pub fn write_summary(results_dir: &Path, quiz_name: &str) -> Result<PathBuf> {
    let loaded = load_results(results_dir, quiz_name)
        .with_context(|| format!("failed to load results for {quiz_name}"))?;
    let text = generate_summary(quiz_name, &loaded, Local::now());

    let dir = results_dir.join(quiz_name);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{quiz_name}_ALL_RESULTS.txt"));
    std::fs::write(&path, text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
