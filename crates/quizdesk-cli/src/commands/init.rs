//! The `quizdesk init` command.

use std::path::Path;

use anyhow::Result;

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::parser::parse_quiz_str;

pub fn execute(config: &QuizdeskConfig) -> Result<()> {
    if Path::new("quizdesk.toml").exists() {
        println!("quizdesk.toml already exists, skipping.");
    } else {
        std::fs::write("quizdesk.toml", SAMPLE_CONFIG)?;
        println!("Created quizdesk.toml");
    }

    std::fs::create_dir_all(&config.results_dir)?;

    let store = super::store(config);
    if store.exists("example") {
        println!("Quiz \"example\" already exists, skipping.");
    } else {
        let mut quiz = parse_quiz_str(EXAMPLE_QUIZ)?;
        let path = store.save(&mut quiz)?;
        println!("Created {}", path.display());
    }

    println!("\nNext steps:");
    println!("  1. Run: quizdesk show example --answers");
    println!("  2. Run: quizdesk serve example");
    println!("  3. After students submit: quizdesk results example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdesk configuration

data_dir = "data"
results_dir = "results"
host = "127.0.0.1"
port = 5000

# Reject submissions that arrive after the timer (plus grace_seconds).
# By default late submissions are accepted and flagged.
enforce_time_limit = false
grace_seconds = 30

[tunnel]
enabled = false
auth_token = "${NGROK_AUTH_TOKEN}"
"#;

const EXAMPLE_QUIZ: &str = r#"{
  "name": "example",
  "title": "Example Quiz",
  "require_full_name": true,
  "timer_minutes": 10,
  "shuffle_questions": false,
  "start_message": "Welcome! Please read all questions carefully. Good luck!",
  "end_message": "Thank you for completing the quiz!",
  "questions": [
    {
      "type": "multiple_choice_single",
      "text": "Which planet is closest to the sun?",
      "weight": 1,
      "options": ["Venus", "Mercury", "Mars"],
      "correct_answer": "Mercury"
    },
    {
      "type": "multiple_choice_multiple",
      "text": "Which of these are prime numbers?",
      "weight": 2,
      "options": ["2", "4", "7", "9"],
      "correct_answer": ["2", "7"]
    },
    {
      "type": "true_false",
      "text": "Water freezes at 0 degrees Celsius.",
      "weight": 1,
      "correct_answer": "True"
    },
    {
      "type": "short_answer",
      "text": "What is the chemical symbol for gold?",
      "weight": 1,
      "correct_answer": "Au"
    },
    {
      "type": "paragraph",
      "text": "Explain in a few sentences why the sky is blue.",
      "weight": 3
    }
  ]
}"#;
