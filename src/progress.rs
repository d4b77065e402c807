//! Per-(user, course) study-progress summaries, kept in a JSON file keyed
//! store. Writes are last-writer-wins upserts; callers treat every failure
//! as best-effort (the quiz result is already on screen by the time the
//! summary is written).

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::quiz::QuizResult;

/// Aggregate study statistics for one user in one course.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StudyProgressSummary {
    pub user_id: String,
    pub course_code: String,
    /// Questions answered across all sessions.
    pub mcqs_completed: u32,
    /// Questions generated across all sessions.
    pub total_mcqs: u32,
    /// Rolling accuracy percentage, weighted by question count.
    pub accuracy_rate: u32,
    pub lectures_studied: u32,
    pub last_study_session: Option<DateTime<Utc>>,
    pub study_sessions: u32,
    /// Cumulative study time in minutes.
    pub total_study_time: u32,
}

impl StudyProgressSummary {
    pub fn new(user_id: &str, course_code: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            course_code: course_code.to_string(),
            ..Self::default()
        }
    }

    /// Folds one finished quiz into the aggregates. The rolling accuracy is
    /// the question-count-weighted mean of all sessions so far.
    pub fn fold_result(&mut self, result: &QuizResult, study_minutes: u32, finished_at: DateTime<Utc>) {
        let prior_weight = self.total_mcqs as f64 * self.accuracy_rate as f64;
        let session_weight = result.total_questions as f64 * result.accuracy as f64;

        self.mcqs_completed += result.total_questions as u32;
        self.total_mcqs += result.total_questions as u32;
        self.accuracy_rate = if self.total_mcqs == 0 {
            0
        } else {
            ((prior_weight + session_weight) / self.total_mcqs as f64).round() as u32
        };
        self.lectures_studied += 1;
        self.last_study_session = Some(finished_at);
        self.study_sessions += 1;
        self.total_study_time += study_minutes;
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "progress store i/o failed: {}", e),
            StoreError::Serialize(e) => write!(f, "progress store serialization failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

/// JSON-file-backed keyed store. The whole map lives in memory and the file
/// is rewritten on every upsert; a single-process bot with one write per
/// finished quiz does not need more.
pub struct ProgressStore {
    path: PathBuf,
    records: Mutex<HashMap<String, StudyProgressSummary>>,
}

impl ProgressStore {
    /// Opens the store, starting empty when the file is missing or
    /// unreadable. A corrupt file costs the old stats, not the bot.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(e) => {
                    log::warn!("Progress store {} is corrupt, starting fresh: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    fn key(user_id: &str, course_code: &str) -> String {
        format!("{}:{}", user_id, course_code)
    }

    pub async fn get(&self, user_id: &str, course_code: &str) -> Option<StudyProgressSummary> {
        self.records
            .lock()
            .await
            .get(&Self::key(user_id, course_code))
            .cloned()
    }

    /// Folds a finished quiz into the (user, course) row and upserts it.
    /// Returns the updated summary.
    pub async fn record_quiz(
        &self,
        user_id: &str,
        course_code: &str,
        result: &QuizResult,
        study_minutes: u32,
    ) -> Result<StudyProgressSummary, StoreError> {
        let mut records = self.records.lock().await;
        let summary = records
            .entry(Self::key(user_id, course_code))
            .or_insert_with(|| StudyProgressSummary::new(user_id, course_code));
        summary.fold_result(result, study_minutes, Utc::now());
        let summary = summary.clone();

        let bytes = serde_json::to_vec_pretty(&*records)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(summary)
    }
}
