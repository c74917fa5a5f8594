//! Result records and their persistence.
//!
//! Every accepted submission produces one JSON file and one row in the
//! quiz's CSV, both under `<results_dir>/<quiz_name>/`.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::model::{Answers, Question};
use crate::scoring::ScoreReport;

/// One student's graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub quiz_name: String,
    pub quiz_title: String,
    pub student_name: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub score: ScoreReport,
    pub answers: Answers,
    /// The questions as served (after any shuffle), correct answers included.
    pub questions: Vec<Question>,
    /// Submitted after the session's deadline.
    #[serde(default)]
    pub late: bool,
}

/// Where the session service hands finished results.
pub trait ResultSink: Send + Sync {
    fn persist(&self, record: &ResultRecord) -> Result<(), PersistenceError>;
}

/// Files written for one submission.
#[derive(Debug, Clone)]
pub struct WrittenResult {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

/// Writes result JSON files and appends to the per-quiz CSV.
///
/// Safe to share between threads: JSON file names are claimed with
/// `create_new`, and CSV appends are serialized.
#[derive(Debug)]
pub struct ResultWriter {
    results_dir: PathBuf,
    csv_lock: Mutex<()>,
}

impl ResultWriter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            csv_lock: Mutex::new(()),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Directory holding one quiz's results.
    pub fn quiz_dir(&self, quiz_name: &str) -> PathBuf {
        self.results_dir.join(quiz_name)
    }

    /// Path of the growing CSV for a quiz.
    pub fn csv_path(&self, quiz_name: &str) -> PathBuf {
        self.quiz_dir(quiz_name)
            .join(format!("{quiz_name}_results.csv"))
    }

    /// Write the JSON record and append the CSV row.
    pub fn write(&self, record: &ResultRecord) -> Result<WrittenResult, PersistenceError> {
        let dir = self.quiz_dir(&record.quiz_name);
        std::fs::create_dir_all(&dir).map_err(|e| PersistenceError::io("create directory", &dir, e))?;

        let json_path = self.write_json(&dir, record)?;
        tracing::info!("result saved to {}", json_path.display());

        let csv_path = self.csv_path(&record.quiz_name);
        {
            let _guard = self.csv_lock.lock().unwrap_or_else(PoisonError::into_inner);
            append_csv_row(&csv_path, record)?;
        }
        tracing::info!("result appended to {}", csv_path.display());

        Ok(WrittenResult {
            json_path,
            csv_path,
        })
    }

    fn write_json(&self, dir: &Path, record: &ResultRecord) -> Result<PathBuf, PersistenceError> {
        let stamp = record
            .timestamp
            .with_timezone(&Local)
            .format("%Y%m%d_%H%M%S");
        let base = format!("{}_{stamp}", safe_file_name(&record.student_name));

        let json = serde_json::to_string_pretty(record).map_err(|source| {
            PersistenceError::Serialize {
                what: "result",
                source,
            }
        })?;

        let (path, mut file) = claim_file(dir, &base)?;
        file.write_all(json.as_bytes())
            .map_err(|e| PersistenceError::io("write", &path, e))?;
        Ok(path)
    }
}

/// Create `<base>.json`, or `<base>_2.json`, `<base>_3.json`, ... if taken.
/// Creation is exclusive, so concurrent writers never share a file.
fn claim_file(dir: &Path, base: &str) -> Result<(PathBuf, File), PersistenceError> {
    let mut n = 1;
    loop {
        let path = if n == 1 {
            dir.join(format!("{base}.json"))
        } else {
            dir.join(format!("{base}_{n}.json"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(PersistenceError::io("create", &path, e)),
        }
    }
}

impl ResultSink for ResultWriter {
    fn persist(&self, record: &ResultRecord) -> Result<(), PersistenceError> {
        self.write(record).map(|_| ())
    }
}

/// Keep alphanumerics, space, `-` and `_`; trim; at most 50 chars.
pub fn safe_file_name(student_name: &str) -> String {
    let kept: String = student_name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let truncated: String = kept.trim().chars().take(50).collect();
    let truncated = truncated.trim();
    if truncated.is_empty() {
        "Student".to_string()
    } else {
        truncated.to_string()
    }
}

fn csv_header(question_count: usize) -> Vec<String> {
    let mut header: Vec<String> = [
        "Timestamp",
        "Student Name",
        "Session ID",
        "Total Points",
        "Earned Points",
        "Percentage",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for n in 1..=question_count {
        header.push(format!("Q{n}_Answer"));
        header.push(format!("Q{n}_Correct"));
        header.push(format!("Q{n}_Points"));
    }
    header
}

fn csv_row(record: &ResultRecord) -> Vec<String> {
    let score = &record.score;
    let mut row = vec![
        record.timestamp.to_rfc3339(),
        record.student_name.clone(),
        record.session_id.clone(),
        score.total_points.to_string(),
        score.earned_points.to_string(),
        score.percentage.to_string(),
    ];
    for q in &score.question_results {
        let answer = record
            .answers
            .get(&(q.question_num - 1).to_string())
            .map(|a| a.joined("; "))
            .unwrap_or_default();
        row.push(answer);
        row.push(q.correct.label().to_string());
        row.push(format!("{}/{}", q.points_earned, q.points_possible));
    }
    row
}

/// Callers must hold the writer's CSV lock.
fn append_csv_row(path: &Path, record: &ResultRecord) -> Result<(), PersistenceError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PersistenceError::io("open", path, e))?;
    let is_new = file
        .metadata()
        .map_err(|e| PersistenceError::io("inspect", path, e))?
        .len()
        == 0;

    let csv_err = |source| PersistenceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    if is_new {
        writer
            .write_record(csv_header(record.questions.len()))
            .map_err(csv_err)?;
    }
    writer.write_record(csv_row(record)).map_err(csv_err)?;
    writer
        .flush()
        .map_err(|e| PersistenceError::io("flush", path, e))?;
    Ok(())
}

/// A result file that could not be read back.
#[derive(Debug, Clone)]
pub struct UnreadableResult {
    pub path: PathBuf,
    pub error: String,
}

/// All results found for one quiz, sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct LoadedResults {
    pub records: Vec<(PathBuf, ResultRecord)>,
    pub unreadable: Vec<UnreadableResult>,
}

/// Read back every JSON result under `<results_dir>/<quiz_name>/`.
pub fn load_results(results_dir: &Path, quiz_name: &str) -> Result<LoadedResults, PersistenceError> {
    let dir = results_dir.join(quiz_name);
    let mut loaded = LoadedResults::default();
    if !dir.is_dir() {
        return Ok(loaded);
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(|e| PersistenceError::io("read directory", &dir, e))? {
        let path = entry
            .map_err(|e| PersistenceError::io("read directory", &dir, e))?
            .path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<ResultRecord>(&content).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(record) => loaded.records.push((path, record)),
            Err(error) => {
                tracing::warn!("skipping result {}: {}", path.display(), error);
                loaded.unreadable.push(UnreadableResult { path, error });
            }
        }
    }

    Ok(loaded)
}
