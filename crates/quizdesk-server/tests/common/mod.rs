use std::net::TcpListener;
use std::sync::Arc;

use quizdesk_core::model::{Question, QuestionKind, Quiz};
use quizdesk_core::results::ResultWriter;
use quizdesk_core::session::SessionService;
use quizdesk_core::store::default_quiz;
use quizdesk_server::run;
use tempfile::TempDir;

#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub service: Arc<SessionService>,
    pub results_dir: TempDir,
}

impl TestApp {
    /// A client that keeps the session cookie between requests, like a browser tab.
    pub fn browser(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build client")
    }

    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

pub async fn spawn_app() -> TestApp {
    let results_dir = tempfile::tempdir().expect("Failed to create results dir");
    let service = Arc::new(SessionService::new(Arc::new(ResultWriter::new(
        results_dir.path(),
    ))));

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = run(listener, service.clone()).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        service,
        results_dir,
    }
}

/// A small quiz covering every question type.
#[allow(dead_code)]
pub fn sample_quiz() -> Quiz {
    Quiz {
        name: "science".into(),
        title: "Science Basics".into(),
        timer_minutes: 5,
        start_message: "Answer every question.".into(),
        end_message: "Thanks, you're done!".into(),
        questions: vec![
            Question {
                text: "Water boils at 100C at sea level.".into(),
                weight: 1.0,
                kind: QuestionKind::TrueFalse {
                    correct_answer: "True".into(),
                },
            },
            Question {
                text: "Closest planet to the sun?".into(),
                weight: 1.0,
                kind: QuestionKind::MultipleChoiceSingle {
                    options: vec!["Venus".into(), "Mercury".into(), "Mars".into()],
                    correct_answer: "Mercury".into(),
                },
            },
            Question {
                text: "Noble gases?".into(),
                weight: 2.0,
                kind: QuestionKind::MultipleChoiceMultiple {
                    options: vec!["Neon".into(), "Oxygen".into(), "Argon".into()],
                    correct_answer: vec!["Neon".into(), "Argon".into()],
                },
            },
            Question {
                text: "Chemical symbol for gold?".into(),
                weight: 1.0,
                kind: QuestionKind::ShortAnswer {
                    correct_answer: Some("Au".into()),
                },
            },
            Question {
                text: "Describe photosynthesis.".into(),
                weight: 3.0,
                kind: QuestionKind::Paragraph {
                    correct_answer: None,
                },
            },
        ],
        ..default_quiz()
    }
}
