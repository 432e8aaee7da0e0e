//! Table flow: show the stored answers as a one-row table with edit and delete actions.

use std::sync::Arc;

use tokio::sync::watch;

use super::{Route, LOADER_ALT, LOADER_ASSET};
use crate::client::AnswersApi;
use crate::errors::AppError;
use crate::hooks::ResetAnswers;
use crate::models::AnswerSet;
use crate::store::AnswersStore;

pub const NO_INFO_MSG: &str = "No info submitted";

/// What the table body currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Loading,
    Empty,
    Populated(Vec<Vec<String>>),
}

/// Table bound to the answers store.
#[derive(Debug)]
pub struct TableFlow {
    store: Arc<AnswersStore>,
    updates: watch::Receiver<AnswerSet>,
    headers: Vec<String>,
    rows: Vec<AnswerSet>,
    loading: bool,
}

impl TableFlow {
    pub fn mount(store: Arc<AnswersStore>) -> Self {
        let mut updates = store.subscribe();
        let snapshot = updates.borrow_and_update().clone();

        Self {
            store,
            updates,
            headers: AnswerSet::FIELD_NAMES.iter().map(|key| capitalize(key)).collect(),
            rows: vec![snapshot],
            loading: false,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Pull the store's latest answers if they changed since the last look.
    pub fn refresh(&mut self) -> bool {
        if !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        let latest = self.updates.borrow_and_update().clone();
        if self.rows.first() == Some(&latest) {
            return false;
        }
        self.rows = vec![latest];
        true
    }

    pub fn view(&self) -> TableView {
        let stale = self.updates.has_changed().unwrap_or(false);
        if self.loading || stale || self.store.is_mutating() {
            return TableView::Loading;
        }
        match self.rows.first() {
            Some(row) if !row.is_blank() => {
                TableView::Populated(self.rows.iter().map(row_cells).collect())
            }
            _ => TableView::Empty,
        }
    }

    /// Edit navigates to the form.
    pub fn edit(&self) -> Route {
        Route::Form
    }

    /// Show loading for a delete that is about to be issued.
    pub fn begin_delete(&mut self) {
        self.loading = true;
    }

    /// Reset the answers. Loading clears once the reset settles, whatever its outcome.
    pub async fn delete<A: AnswersApi>(
        &mut self,
        reset: &ResetAnswers<A>,
    ) -> Result<(), AppError> {
        self.begin_delete();
        let result = reset.mutate().await;
        self.loading = false;
        self.refresh();

        match result {
            Ok(_) => {
                tracing::info!("Answers reset successfully");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error resetting answers: {}", e);
                Err(e)
            }
        }
    }

    /// Text rendering of the table.
    pub fn render(&self) -> String {
        let body = match self.view() {
            TableView::Loading => format!("{} ({})", LOADER_ALT, LOADER_ASSET),
            TableView::Empty => NO_INFO_MSG.to_string(),
            TableView::Populated(rows) => rows
                .iter()
                .map(|cells| cells.join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        format!(
            "[edit -> {}] [delete]\n{}\n{}",
            self.edit(),
            self.headers.join(" | "),
            body
        )
    }
}

fn row_cells(row: &AnswerSet) -> Vec<String> {
    vec![
        row.name.clone(),
        row.mail.clone(),
        row.age.clone(),
        row.checked_labels().join(", "),
    ]
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
