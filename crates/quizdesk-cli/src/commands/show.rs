//! The `quizdesk show` command.

use anyhow::Result;

use quizdesk_core::config::QuizdeskConfig;

pub fn execute(config: &QuizdeskConfig, name: &str, with_answers: bool) -> Result<()> {
    let quiz = super::store(config).load(name)?;

    println!("{} ({})", quiz.title, quiz.name);
    println!(
        "  Timer: {} min | Shuffle: {} | Name required: {}",
        quiz.timer_minutes,
        if quiz.shuffle_questions { "yes" } else { "no" },
        if quiz.require_full_name { "yes" } else { "no" },
    );
    if let Some(modified) = quiz.last_modified {
        println!("  Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if !quiz.start_message.is_empty() {
        println!("  Start message: {}", quiz.start_message);
    }
    println!("  End message: {}", quiz.end_message);

    let total: f64 = quiz.questions.iter().map(|q| q.weight).sum();
    println!("\n{} questions, {} points", quiz.questions.len(), total);

    for (i, q) in quiz.questions.iter().enumerate() {
        println!(
            "\n{}. [{}] {} ({} pt)",
            i + 1,
            q.question_type().label(),
            q.text,
            q.weight
        );
        for option in q.options() {
            println!("     - {option}");
        }
        if with_answers {
            if q.needs_manual_grading() {
                println!("   Answer: (manual grading)");
            } else {
                println!("   Answer: {}", q.correct_answer_display());
            }
        }
    }

    Ok(())
}
