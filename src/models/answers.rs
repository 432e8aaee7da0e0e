//! The domain answer set shared by the form and table views.

/// One selectable interest, keyed by a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestOption {
    pub id: String,
    pub label: String,
    pub is_checked: bool,
}

impl InterestOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, is_checked: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_checked,
        }
    }
}

/// The single record holding everything the user submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerSet {
    pub name: String,
    pub mail: String,
    /// Decimal integer, empty when unset
    pub age: String,
    pub interests: Vec<InterestOption>,
}

impl AnswerSet {
    /// Top-level field names, in display order.
    pub const FIELD_NAMES: [&'static str; 4] = ["name", "mail", "age", "interests"];

    /// Answers as the backend creates them: empty fields, nothing checked.
    pub fn defaults() -> Self {
        Self {
            name: String::new(),
            mail: String::new(),
            age: String::new(),
            interests: default_interests(),
        }
    }

    /// Labels of the checked interests, in catalog order.
    pub fn checked_labels(&self) -> Vec<&str> {
        self.interests
            .iter()
            .filter(|interest| interest.is_checked)
            .map(|interest| interest.label.as_str())
            .collect()
    }

    /// Whether nothing has been submitted yet.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

/// The interest catalog offered by the backend.
pub fn default_interests() -> Vec<InterestOption> {
    [
        ("sports", "Sports"),
        ("music", "Music"),
        ("reading", "Reading"),
        ("travel", "Travel"),
        ("cooking", "Cooking"),
    ]
    .into_iter()
    .map(|(id, label)| InterestOption::new(id, label, false))
    .collect()
}
