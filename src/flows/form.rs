//! Form flow: edit the answers, submit them, then move on to the table.

use std::collections::BTreeSet;
use std::time::Duration;

use super::Route;
use crate::client::AnswersApi;
use crate::converters::{interests_from_options, options_from_interests};
use crate::errors::AppError;
use crate::hooks::UpdateAnswers;
use crate::models::{AnswerSet, CheckboxOption};
use crate::store::AnswersStore;
use crate::validation::{Field, FormValues, ValidationReport, ValidationSchema};

pub const SUBMIT_LABEL: &str = "Submit";
pub const REDIRECTING_LABEL: &str = "Redirecting...";

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Redirecting,
}

/// Form bound to the validation schema and seeded from the store.
#[derive(Debug)]
pub struct FormFlow {
    schema: ValidationSchema,
    values: FormValues,
    /// Checkbox state used to draw the interests group
    options: Vec<CheckboxOption>,
    report: ValidationReport,
    touched: BTreeSet<Field>,
    state: FormState,
    redirect_delay: Duration,
}

impl FormFlow {
    /// Mount the form with the store's current answers as initial values.
    pub fn mount(store: &AnswersStore, redirect_delay: Duration) -> Self {
        let answers = store.get_answers();
        let options = options_from_interests(&answers.interests);
        let values = FormValues {
            name: answers.name,
            mail: answers.mail,
            age: answers.age,
            interests: options.clone(),
        };
        let schema = ValidationSchema::profile();
        let report = schema.validate(&values);

        Self {
            schema,
            values,
            options,
            report,
            touched: BTreeSet::new(),
            state: FormState::Editing,
            redirect_delay,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn options(&self) -> &[CheckboxOption] {
        &self.options
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.values.name = value.into();
        self.changed(Field::Name);
    }

    pub fn set_mail(&mut self, value: impl Into<String>) {
        self.values.mail = value.into();
        self.changed(Field::Mail);
    }

    pub fn set_age(&mut self, value: impl Into<String>) {
        self.values.age = value.into();
        self.changed(Field::Age);
    }

    /// Flip one interest box. Returns `false` when no option has that id.
    pub fn toggle_interest(&mut self, id: &str) -> bool {
        let Some(option) = self.options.iter_mut().find(|option| option.id == id) else {
            return false;
        };
        option.checked = !option.checked;
        // The validated field value and the drawn boxes always move together
        self.values.interests = self.options.clone();
        self.changed(Field::Interests);
        true
    }

    /// Helper text for `field`, shown once the field has been edited.
    pub fn field_error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.report.error(field)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == FormState::Editing && self.is_valid()
    }

    pub fn button_label(&self) -> &'static str {
        match self.state {
            FormState::Redirecting => REDIRECTING_LABEL,
            FormState::Editing | FormState::Submitting => SUBMIT_LABEL,
        }
    }

    /// The answers this form would submit.
    pub fn payload(&self) -> AnswerSet {
        AnswerSet {
            name: self.values.name.clone(),
            mail: self.values.mail.clone(),
            age: self.values.age.clone(),
            interests: interests_from_options(&self.values.interests),
        }
    }

    /// Submit through the update hook.
    ///
    /// An invalid form is never sent. On success the form is left redirecting, so the
    /// caller can draw it before [`FormFlow::redirect`]. When the mutation fails the form
    /// returns to editing and stays on its route.
    pub async fn submit<A: AnswersApi>(
        &mut self,
        update: &UpdateAnswers<A>,
    ) -> Result<(), AppError> {
        if !self.can_submit() {
            self.touched.extend(Field::ALL);
            return Err(AppError::Validation(self.blocked_reason()));
        }

        self.state = FormState::Submitting;
        tracing::debug!("Submitting answers");

        match update.mutate(self.payload()).await {
            Ok(_) => {
                self.state = FormState::Redirecting;
                Ok(())
            }
            Err(e) => {
                self.state = FormState::Editing;
                Err(e)
            }
        }
    }

    /// Wait out the redirect delay and return the next route.
    ///
    /// Only a redirecting form moves on; otherwise the form keeps its route.
    pub async fn redirect(&self) -> Route {
        if self.state != FormState::Redirecting {
            return Route::Form;
        }
        tokio::time::sleep(self.redirect_delay).await;
        Route::Table
    }

    /// Text rendering of the form.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (field, value) in [
            (Field::Name, &self.values.name),
            (Field::Age, &self.values.age),
            (Field::Mail, &self.values.mail),
        ] {
            lines.push(format!("{}: {}", field.label(), value));
            lines.extend(self.field_error(field).map(|message| format!("  ! {}", message)));
        }

        lines.push(format!("{}:", Field::Interests.label()));
        lines.extend(self.options.iter().map(|option| {
            let mark = if option.checked { 'x' } else { ' ' };
            format!("  [{}] {} ({})", mark, option.label, option.id)
        }));
        lines.extend(
            self.field_error(Field::Interests)
                .map(|message| format!("  ! {}", message)),
        );

        let state = if self.can_submit() { "" } else { " (disabled)" };
        lines.push(format!("[ {} ]{}", self.button_label(), state));
        lines.join("\n")
    }

    fn changed(&mut self, field: Field) {
        self.touched.insert(field);
        self.report = self.schema.validate(&self.values);
    }

    fn blocked_reason(&self) -> String {
        if self.state != FormState::Editing {
            return "Answers are already being submitted".to_string();
        }
        self.report
            .errors()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
