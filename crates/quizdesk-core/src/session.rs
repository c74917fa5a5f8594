//! The session/scoring service.
//!
//! One [`SessionService`] owns the active quiz and every student session
//! issued for it. All state sits behind a single mutex, and sessions live
//! inside the active-quiz slot so that activating a new quiz discards the
//! old sessions in the same step. Result files are written after the lock
//! is released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use serde::Serialize;
use uuid::Uuid;

use crate::config::QuizdeskConfig;
use crate::error::{SessionError, ValidationError};
use crate::model::{Answers, QuestionType, Quiz};
use crate::parser::validate_for_activation;
use crate::results::{ResultRecord, ResultSink};
use crate::scoring::{score, ScoreReport};

/// Source of "now". Swappable so tests can move time forward.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// How the per-session deadline is treated at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePolicy {
    /// Reject submissions past the deadline plus `grace_seconds`.
    pub enforce: bool,
    pub grace_seconds: u64,
}

impl Default for TimePolicy {
    fn default() -> Self {
        Self {
            enforce: false,
            grace_seconds: 30,
        }
    }
}

impl TimePolicy {
    pub fn from_config(config: &QuizdeskConfig) -> Self {
        Self {
            enforce: config.enforce_time_limit,
            grace_seconds: config.grace_seconds,
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    started: DateTime<Utc>,
    submitted: bool,
    submitted_at: Option<DateTime<Utc>>,
    student_name: Option<String>,
}

#[derive(Debug)]
struct ActiveQuiz {
    quiz: Quiz,
    activated_at: DateTime<Utc>,
    sessions: HashMap<String, Session>,
}

impl ActiveQuiz {
    fn deadline(&self, session: &Session) -> DateTime<Utc> {
        session.started + Duration::seconds(i64::from(self.quiz.timer_minutes) * 60)
    }
}

/// A question as shown to a student. Correct answers are never included.
#[derive(Debug, Clone, Serialize)]
pub struct StudentQuestion {
    /// 0-based index; the key the answer must be submitted under.
    pub index: usize,
    pub text: String,
    pub weight: f64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Everything the quiz page needs for a new session.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub session_id: String,
    pub title: String,
    pub start_message: String,
    pub timer_minutes: u32,
    pub require_full_name: bool,
    pub questions: Vec<StudentQuestion>,
    pub start_time: DateTime<Utc>,
}

/// Reply to a timer poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStatus {
    pub timer_minutes: u32,
    pub time_remaining_seconds: i64,
    pub start_time: DateTime<Utc>,
}

/// An accepted submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub end_message: String,
    pub score: ScoreReport,
    /// Arrived after the session's deadline.
    pub late: bool,
    /// Whether the result sink accepted the record.
    pub persisted: bool,
}

/// Snapshot of the active quiz for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSummary {
    pub name: String,
    pub title: String,
    pub question_count: usize,
    pub activated_at: DateTime<Utc>,
    pub sessions: usize,
    pub submitted: usize,
    /// Names given by students who have submitted, in submission order.
    pub students: Vec<String>,
}

/// Owns the active quiz and its sessions.
pub struct SessionService {
    state: Mutex<Option<ActiveQuiz>>,
    sink: Arc<dyn ResultSink>,
    policy: TimePolicy,
    clock: Clock,
}

impl SessionService {
    pub fn new(sink: Arc<dyn ResultSink>) -> Self {
        Self {
            state: Mutex::new(None),
            sink,
            policy: TimePolicy::default(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_policy(mut self, policy: TimePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveQuiz>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `quiz` the served quiz, discarding all existing sessions.
    ///
    /// When `shuffle_questions` is set, the order is drawn once here and
    /// shared by every student of this activation.
    pub fn activate(&self, mut quiz: Quiz) -> Result<(), ValidationError> {
        validate_for_activation(&quiz)?;

        if quiz.shuffle_questions {
            quiz.questions.shuffle(&mut rand::thread_rng());
        }

        let activated_at = (self.clock)();
        tracing::info!(
            quiz = %quiz.name,
            title = %quiz.title,
            questions = quiz.questions.len(),
            shuffled = quiz.shuffle_questions,
            "quiz activated"
        );

        *self.lock() = Some(ActiveQuiz {
            quiz,
            activated_at,
            sessions: HashMap::new(),
        });
        Ok(())
    }

    /// Stop serving the active quiz, if any.
    pub fn deactivate(&self) {
        if let Some(previous) = self.lock().take() {
            tracing::info!(
                quiz = %previous.quiz.name,
                sessions = previous.sessions.len(),
                "quiz deactivated"
            );
        }
    }

    /// Whether a quiz is currently being served.
    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    pub fn active_summary(&self) -> Option<ActiveSummary> {
        self.lock().as_ref().map(|active| {
            let mut done: Vec<&Session> = active.sessions.values().filter(|s| s.submitted).collect();
            done.sort_by_key(|s| s.submitted_at);
            ActiveSummary {
                name: active.quiz.name.clone(),
                title: active.quiz.title.clone(),
                question_count: active.quiz.questions.len(),
                activated_at: active.activated_at,
                sessions: active.sessions.len(),
                submitted: done.len(),
                students: done
                    .iter()
                    .filter_map(|s| s.student_name.clone())
                    .collect(),
            }
        })
    }

    /// Issue a new session and the display payload for it.
    pub fn begin_session(&self) -> Result<QuizView, SessionError> {
        let mut guard = self.lock();
        let active = guard.as_mut().ok_or(SessionError::NoActiveQuiz)?;

        let session_id = Uuid::new_v4().simple().to_string();
        let started = (self.clock)();
        active.sessions.insert(
            session_id.clone(),
            Session {
                started,
                submitted: false,
                submitted_at: None,
                student_name: None,
            },
        );

        let quiz = &active.quiz;
        let questions = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| StudentQuestion {
                index,
                text: q.text.clone(),
                weight: q.weight,
                question_type: q.question_type(),
                options: q.options().to_vec(),
            })
            .collect();

        tracing::debug!(session = %session_id, "session started");

        Ok(QuizView {
            session_id,
            title: quiz.title.clone(),
            start_message: quiz.start_message.clone(),
            timer_minutes: quiz.timer_minutes,
            require_full_name: quiz.require_full_name,
            questions,
            start_time: started,
        })
    }

    /// Seconds left on a session's timer, never negative.
    pub fn time_remaining(&self, session_id: &str) -> Result<TimeStatus, SessionError> {
        let guard = self.lock();
        let active = guard.as_ref().ok_or(SessionError::NoActiveQuiz)?;
        let session = active
            .sessions
            .get(session_id)
            .ok_or(SessionError::SessionInvalid)?;
        if session.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let remaining = (active.deadline(session) - (self.clock)()).num_seconds();
        Ok(TimeStatus {
            timer_minutes: active.quiz.timer_minutes,
            time_remaining_seconds: remaining.max(0),
            start_time: session.started,
        })
    }

    /// Grade and record a submission. At most one submission per session
    /// is ever accepted.
    ///
    /// A failure to persist the result is logged; the student still gets
    /// the end message.
    pub fn submit(
        &self,
        session_id: &str,
        student_name: &str,
        answers: Answers,
    ) -> Result<SubmitOutcome, SessionError> {
        let now = (self.clock)();
        let student_name = student_name.trim().to_string();

        let (record, end_message) = {
            let mut guard = self.lock();
            let active = guard.as_mut().ok_or(SessionError::NoActiveQuiz)?;
            let session = active
                .sessions
                .get(session_id)
                .ok_or(SessionError::SessionInvalid)?;

            if session.submitted {
                tracing::warn!(session = %session_id, "resubmission rejected");
                return Err(SessionError::AlreadySubmitted);
            }
            if active.quiz.require_full_name && student_name.is_empty() {
                return Err(ValidationError::NameRequired.into());
            }

            let deadline = active.deadline(session);
            let late = now > deadline;
            if late
                && self.policy.enforce
                && now > deadline + Duration::seconds(self.policy.grace_seconds as i64)
            {
                tracing::warn!(session = %session_id, "submission after deadline rejected");
                return Err(SessionError::SessionExpired);
            }

            let report = score(&active.quiz.questions, &answers);

            if let Some(session) = active.sessions.get_mut(session_id) {
                session.submitted = true;
                session.submitted_at = Some(now);
                session.student_name = Some(student_name.clone());
            }

            let quiz = &active.quiz;
            let record = ResultRecord {
                quiz_name: quiz.name.clone(),
                quiz_title: quiz.title.clone(),
                student_name,
                session_id: session_id.to_string(),
                timestamp: now,
                score: report,
                answers,
                questions: quiz.questions.clone(),
                late,
            };
            (record, quiz.end_message.clone())
        };

        tracing::info!(
            student = %record.student_name,
            session = %session_id,
            earned = record.score.earned_points,
            total = record.score.total_points,
            late = record.late,
            "quiz submitted"
        );

        let persisted = match self.sink.persist(&record) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(session = %session_id, "failed to save result: {e}");
                false
            }
        };

        Ok(SubmitOutcome {
            end_message,
            late: record.late,
            score: record.score,
            persisted,
        })
    }
}
