//! In-memory answers repository backing the mocked API.
//!
//! Lives for the lifetime of the process; nothing is written to disk.

use tokio::sync::RwLock;

use crate::converters::domain_to_api;
use crate::errors::AppError;
use crate::models::{AnswerSet, ApiAnswers};

struct Stored {
    answers: ApiAnswers,
    revision_id: i64,
}

/// Repository for the single answers record.
pub struct AnswersRepository {
    inner: RwLock<Stored>,
    defaults: ApiAnswers,
}

impl AnswersRepository {
    /// Create a repository holding the default answers.
    pub fn new() -> Result<Self, AppError> {
        let defaults = domain_to_api(&AnswerSet::defaults())?;
        Ok(Self {
            inner: RwLock::new(Stored {
                answers: defaults.clone(),
                revision_id: 0,
            }),
            defaults,
        })
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> i64 {
        self.inner.read().await.revision_id
    }

    /// Get the stored answers together with the revision they belong to.
    pub async fn get_answers(&self) -> (ApiAnswers, i64) {
        let stored = self.inner.read().await;
        (stored.answers.clone(), stored.revision_id)
    }

    /// Replace the stored answers.
    pub async fn update_answers(&self, answers: ApiAnswers) -> (ApiAnswers, i64) {
        let mut stored = self.inner.write().await;
        stored.answers = answers;
        stored.revision_id += 1;
        tracing::debug!(revision_id = stored.revision_id, "Answers stored");
        (stored.answers.clone(), stored.revision_id)
    }

    /// Restore the default answers.
    pub async fn reset_answers(&self) -> (ApiAnswers, i64) {
        let mut stored = self.inner.write().await;
        stored.answers = self.defaults.clone();
        stored.revision_id += 1;
        tracing::debug!(revision_id = stored.revision_id, "Answers reset to defaults");
        (stored.answers.clone(), stored.revision_id)
    }
}
