//! Mutation hooks: one API round-trip each, followed by a conditional store write.
//!
//! A hook never retries. On failure the error is logged and returned, and the store keeps
//! its previous answers.

use std::sync::Arc;

use crate::client::AnswersApi;
use crate::converters::{api_to_domain, domain_to_api};
use crate::errors::AppError;
use crate::models::AnswerSet;
use crate::store::AnswersStore;

/// Submits new answers and stores the backend's version of them.
pub struct UpdateAnswers<A> {
    api: Arc<A>,
    store: Arc<AnswersStore>,
}

impl<A: AnswersApi> UpdateAnswers<A> {
    pub fn new(api: Arc<A>, store: Arc<AnswersStore>) -> Self {
        Self { api, store }
    }

    pub async fn mutate(&self, payload: AnswerSet) -> Result<AnswerSet, AppError> {
        let _permit = self.store.begin_mutation().await;

        let result: Result<AnswerSet, AppError> = async {
            let request = domain_to_api(&payload)?;
            let response = self.api.update(&request).await?;
            api_to_domain(response)
        }
        .await;

        match result {
            Ok(answers) => {
                self.store.set_answers(answers.clone());
                tracing::info!(name = %answers.name, "Answers updated");
                Ok(answers)
            }
            Err(e) => {
                tracing::error!("Failed to update answers: {}", e);
                Err(e)
            }
        }
    }
}

/// Resets the answers to the backend's defaults.
pub struct ResetAnswers<A> {
    api: Arc<A>,
    store: Arc<AnswersStore>,
}

impl<A: AnswersApi> ResetAnswers<A> {
    pub fn new(api: Arc<A>, store: Arc<AnswersStore>) -> Self {
        Self { api, store }
    }

    pub async fn mutate(&self) -> Result<AnswerSet, AppError> {
        let _permit = self.store.begin_mutation().await;

        let result = match self.api.reset().await {
            Ok(response) => api_to_domain(response),
            Err(e) => Err(e),
        };

        match result {
            Ok(answers) => {
                self.store.set_answers(answers.clone());
                tracing::info!("Answers reset");
                Ok(answers)
            }
            Err(e) => {
                tracing::error!("Failed to reset answers: {}", e);
                Err(e)
            }
        }
    }
}

/// Fetch the backend's answers into the store.
pub async fn load_answers<A: AnswersApi>(
    api: &A,
    store: &AnswersStore,
) -> Result<AnswerSet, AppError> {
    let _permit = store.begin_mutation().await;

    match api.fetch().await.and_then(api_to_domain) {
        Ok(answers) => {
            store.set_answers(answers.clone());
            Ok(answers)
        }
        Err(e) => {
            tracing::error!("Failed to load answers: {}", e);
            Err(e)
        }
    }
}
