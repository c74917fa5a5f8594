//! Directory-backed quiz store.
//!
//! Each quiz lives in `<data_dir>/<name>.json`. There is no locking: the
//! store assumes a single author.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{PersistenceError, StoreError};
use crate::model::{default_end_message, default_timer_minutes, Quiz};
use crate::parser::{parse_quiz_str, validate_name};

/// Outcome of [`QuizStore::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Reads and writes quiz records on disk.
#[derive(Debug, Clone)]
pub struct QuizStore {
    data_dir: PathBuf,
}

impl QuizStore {
    /// Create a store rooted at `data_dir`. The directory is created on first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path a quiz with this name is stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.path_for(name).is_file()
    }

    /// Names of all stored quizzes, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.data_dir)
            .map_err(|e| PersistenceError::io("read directory", &self.data_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistenceError::io("read directory", &self.data_dir, e))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load a quiz by name.
    pub fn load(&self, name: &str) -> Result<Quiz, StoreError> {
        if validate_name(name).is_err() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| PersistenceError::io("read", &path, e))?;
        let quiz = parse_quiz_str(&content)?;
        if quiz.name != name {
            tracing::warn!(
                "quiz file {} declares name {:?}; the file name wins",
                path.display(),
                quiz.name
            );
        }
        Ok(Quiz {
            name: name.to_string(),
            ..quiz
        })
    }

    /// Persist a quiz under its name, overwriting any existing record.
    ///
    /// Stamps `last_modified` on the passed record.
    pub fn save(&self, quiz: &mut Quiz) -> Result<PathBuf, StoreError> {
        validate_name(&quiz.name)?;

        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| PersistenceError::io("create directory", &self.data_dir, e))?;

        quiz.last_modified = Some(Utc::now());
        let json = serde_json::to_string_pretty(quiz).map_err(|source| {
            PersistenceError::Serialize {
                what: "quiz",
                source,
            }
        })?;

        let path = self.path_for(&quiz.name);
        std::fs::write(&path, json).map_err(|e| PersistenceError::io("write", &path, e))?;
        tracing::info!("saved quiz {:?} to {}", quiz.name, path.display());
        Ok(path)
    }

    /// Remove a quiz. A missing quiz is reported, not treated as an error.
    pub fn delete(&self, name: &str) -> Result<DeleteOutcome, StoreError> {
        if !self.exists(name) {
            return Ok(DeleteOutcome::NotFound);
        }
        let path = self.path_for(name);
        std::fs::remove_file(&path).map_err(|e| PersistenceError::io("delete", &path, e))?;
        tracing::info!("deleted quiz {name:?}");
        Ok(DeleteOutcome::Deleted)
    }

    /// Parse a quiz file from anywhere on disk and save it into the store.
    pub fn import(&self, path: &Path) -> Result<Quiz, StoreError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PersistenceError::io("read", path, e))?;
        let mut quiz = parse_quiz_str(&content)?;
        self.save(&mut quiz)?;
        Ok(quiz)
    }
}

/// A fresh, empty quiz as the editor starts it.
pub fn default_quiz() -> Quiz {
    Quiz {
        name: "New Quiz".to_string(),
        title: "Untitled Quiz".to_string(),
        require_full_name: true,
        timer_minutes: default_timer_minutes(),
        shuffle_questions: false,
        start_message: "Welcome! Please read all questions carefully. Good luck!".to_string(),
        end_message: default_end_message(),
        questions: Vec::new(),
        last_modified: None,
    }
}
