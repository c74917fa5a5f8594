pub mod add_question;
pub mod delete;
pub mod edit;
pub mod import;
pub mod init;
pub mod list;
pub mod move_question;
pub mod new;
pub mod remove_question;
pub mod results;
pub mod serve;
pub mod show;
pub mod validate;

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::store::QuizStore;

/// The quiz store configured for this invocation.
pub fn store(config: &QuizdeskConfig) -> QuizStore {
    QuizStore::new(&config.data_dir)
}

/// Print lint warnings the way every authoring command does.
pub fn print_warnings(warnings: &[quizdesk_core::parser::ValidationWarning]) {
    for w in warnings {
        let prefix = w
            .question
            .map(|n| format!("  [Q{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
}
