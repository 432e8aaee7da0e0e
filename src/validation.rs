//! Field validation rules for the profile form.
//!
//! Every field owns an ordered list of named rules. A field fails with the message of its
//! first failing rule; the form is valid when no field fails.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CheckboxOption;

pub const IS_REQUIRED_MSG: &str = "This field is required";
pub const IS_NUMBER_MSG: &str = "This field must be a number";
pub const IS_EMAIL_MSG: &str = "This field must be a valid email";
pub const IS_INTEGER_MSG: &str = "Age must be an integer number";
pub const INTERESTS_REQUIRED_MSG: &str = "Please select at least one interest";

pub const NAME_MIN_WORDS: usize = 2;
pub const NAME_MAX_WORDS: usize = 4;
pub const AGE_MIN: f64 = 18.0;
pub const AGE_MAX: f64 = 99.0;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

pub fn min_words_msg(min_words: usize) -> String {
    format!("At least {} words are required", min_words)
}

pub fn max_words_msg(max_words: usize) -> String {
    format!("At most {} words are allowed", max_words)
}

pub fn age_min_msg() -> String {
    format!("Age must be at least {}", AGE_MIN)
}

pub fn age_max_msg() -> String {
    format!("Age must be at most {}", AGE_MAX)
}

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Mail,
    Age,
    Interests,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Mail, Field::Age, Field::Interests];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Mail => "mail",
            Field::Age => "age",
            Field::Interests => "interests",
        }
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Mail => "Email",
            Field::Age => "Age",
            Field::Interests => "Interests",
        }
    }
}

/// Raw values as the form holds them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    pub name: String,
    pub mail: String,
    pub age: String,
    pub interests: Vec<CheckboxOption>,
}

/// A named predicate with the message reported when it fails.
pub struct Rule<T: ?Sized> {
    pub name: &'static str,
    pub message: String,
    test: fn(&T) -> bool,
}

impl<T: ?Sized> Rule<T> {
    pub fn new(name: &'static str, message: impl Into<String>, test: fn(&T) -> bool) -> Self {
        Self {
            name,
            message: message.into(),
            test,
        }
    }

    pub fn passes(&self, value: &T) -> bool {
        (self.test)(value)
    }
}

impl<T: ?Sized> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

pub type TextRule = Rule<str>;
pub type OptionsRule = Rule<[CheckboxOption]>;

fn first_failure<'a, T: ?Sized>(rules: &'a [Rule<T>], value: &T) -> Option<&'a Rule<T>> {
    rules.iter().find(|rule| !rule.passes(value))
}

/// Per-field rule sets for the whole form.
#[derive(Debug)]
pub struct ValidationSchema {
    pub name: Vec<TextRule>,
    pub mail: Vec<TextRule>,
    pub age: Vec<TextRule>,
    pub interests: Vec<OptionsRule>,
}

impl ValidationSchema {
    /// The rules of the profile form.
    pub fn profile() -> Self {
        Self {
            name: vec![
                TextRule::new("required", IS_REQUIRED_MSG, is_present),
                TextRule::new("hasMaxWords", max_words_msg(NAME_MAX_WORDS), |value: &str| {
                    word_count(value) <= NAME_MAX_WORDS
                }),
                TextRule::new("hasMinWords", min_words_msg(NAME_MIN_WORDS), |value: &str| {
                    word_count(value) >= NAME_MIN_WORDS
                }),
            ],
            mail: vec![
                TextRule::new("required", IS_REQUIRED_MSG, is_present),
                TextRule::new("email", IS_EMAIL_MSG, |value: &str| EMAIL_RE.is_match(value)),
            ],
            age: vec![
                TextRule::new("required", IS_REQUIRED_MSG, is_present),
                TextRule::new("isNumber", IS_NUMBER_MSG, |value: &str| {
                    parse_number(value).is_some()
                }),
                TextRule::new("isInteger", IS_INTEGER_MSG, |value: &str| {
                    parse_number(value).is_some_and(|n| n.is_finite() && n.fract() == 0.0)
                }),
                TextRule::new("minAge", age_min_msg(), |value: &str| {
                    parse_number(value).is_some_and(|n| n >= AGE_MIN)
                }),
                TextRule::new("maxAge", age_max_msg(), |value: &str| {
                    parse_number(value).is_some_and(|n| n <= AGE_MAX)
                }),
            ],
            interests: vec![OptionsRule::new(
                "atLeastOneInterest",
                INTERESTS_REQUIRED_MSG,
                |options: &[CheckboxOption]| options.iter().any(|option| option.checked),
            )],
        }
    }

    /// Message of the first failing rule of `field`, if any.
    pub fn validate_field(&self, field: Field, values: &FormValues) -> Option<String> {
        let failed = match field {
            Field::Name => first_failure(&self.name, values.name.as_str()).map(|r| &r.message),
            Field::Mail => first_failure(&self.mail, values.mail.as_str()).map(|r| &r.message),
            Field::Age => first_failure(&self.age, values.age.as_str()).map(|r| &r.message),
            Field::Interests => {
                first_failure(&self.interests, values.interests.as_slice()).map(|r| &r.message)
            }
        };
        failed.cloned()
    }

    /// Run every field's rules.
    pub fn validate(&self, values: &FormValues) -> ValidationReport {
        let errors = Field::ALL
            .into_iter()
            .filter_map(|field| {
                self.validate_field(field, values)
                    .map(|message| (field, message))
            })
            .collect();
        ValidationReport { errors }
    }
}

impl Default for ValidationSchema {
    fn default() -> Self {
        Self::profile()
    }
}

/// Outcome of validating the whole form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    errors: BTreeMap<Field, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

fn is_present(value: &str) -> bool {
    !value.is_empty()
}

/// Number of maximal runs of non-whitespace characters.
pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

/// Lenient numeric parse: surrounding whitespace is ignored and blank reads as zero.
///
/// Unsigned `0x`, `0o` and `0b` literals are read in their radix.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if let Some(n) = parse_radix_literal(trimmed) {
        return n;
    }
    // f64's parser also accepts "inf" and "nan" spellings, which are not numbers here
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// `Some(parsed)` when `value` carries a radix prefix, `None` when it has none.
fn parse_radix_literal(value: &str) -> Option<Option<f64>> {
    let radix = match value.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &value[2..];
    if digits.is_empty() {
        return Some(None);
    }
    Some(digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(name: &str, mail: &str, age: &str, checked: &[bool]) -> FormValues {
        FormValues {
            name: name.to_string(),
            mail: mail.to_string(),
            age: age.to_string(),
            interests: checked
                .iter()
                .enumerate()
                .map(|(i, checked)| {
                    CheckboxOption::new(format!("i{}", i), format!("I{}", i), *checked)
                })
                .collect(),
        }
    }

    fn age_error(age: &str) -> Option<String> {
        ValidationSchema::profile().validate_field(Field::Age, &values("", "", age, &[]))
    }

    fn name_error(name: &str) -> Option<String> {
        ValidationSchema::profile().validate_field(Field::Name, &values(name, "", "", &[]))
    }

    #[test]
    fn test_name_word_bounds() {
        assert_eq!(name_error("").as_deref(), Some(IS_REQUIRED_MSG));
        assert_eq!(name_error("Jane"), Some(min_words_msg(2)));
        assert_eq!(name_error("Jane Doe"), None);
        assert_eq!(name_error("  Jane   Maria  Doe "), None);
        assert_eq!(name_error("A B C D"), None);
        assert_eq!(name_error("A B C D E"), Some(max_words_msg(4)));
        assert_eq!(
            name_error("   ").as_deref(),
            Some("At least 2 words are required")
        );
    }

    #[test]
    fn test_age_failure_modes_have_distinct_messages() {
        assert_eq!(age_error("").as_deref(), Some(IS_REQUIRED_MSG));
        assert_eq!(age_error("abc").as_deref(), Some(IS_NUMBER_MSG));
        assert_eq!(age_error("18.5").as_deref(), Some(IS_INTEGER_MSG));
        assert_eq!(age_error("17").as_deref(), Some("Age must be at least 18"));
        assert_eq!(age_error("100").as_deref(), Some("Age must be at most 99"));
        assert_eq!(age_error("nan").as_deref(), Some(IS_NUMBER_MSG));
        assert_eq!(age_error("inf").as_deref(), Some(IS_NUMBER_MSG));
        assert_eq!(age_error("0x").as_deref(), Some(IS_NUMBER_MSG));
        assert_eq!(age_error("0x1G").as_deref(), Some(IS_NUMBER_MSG));
        assert_eq!(age_error("-0x1E").as_deref(), Some(IS_NUMBER_MSG));
        assert_eq!(age_error("0x11").as_deref(), Some("Age must be at least 18"));
    }

    #[test]
    fn test_age_accepts_integers_in_range() {
        for age in ["18", "30", "99", " 42 ", "30.0", "0x1E", "0o36", "0b11110"] {
            assert_eq!(age_error(age), None, "age {:?} should pass", age);
        }
    }

    #[test]
    fn test_mail_syntax() {
        let schema = ValidationSchema::profile();
        let check = |mail: &str| schema.validate_field(Field::Mail, &values("", mail, "", &[]));
        assert_eq!(check("").as_deref(), Some(IS_REQUIRED_MSG));
        assert_eq!(check("jane@x.com"), None);
        assert_eq!(check("jane.doe+tag@mail.example.org"), None);
        assert_eq!(check("jane").as_deref(), Some(IS_EMAIL_MSG));
        assert_eq!(check("jane@").as_deref(), Some(IS_EMAIL_MSG));
        assert_eq!(check("jane doe@x.com").as_deref(), Some(IS_EMAIL_MSG));
    }

    #[test]
    fn test_interests_need_one_checked() {
        let schema = ValidationSchema::profile();
        let check = |checked: &[bool]| {
            schema.validate_field(Field::Interests, &values("", "", "", checked))
        };
        assert_eq!(check(&[]).as_deref(), Some(INTERESTS_REQUIRED_MSG));
        assert_eq!(check(&[false]).as_deref(), Some(INTERESTS_REQUIRED_MSG));
        assert_eq!(check(&[false, true]), None);
    }

    #[test]
    fn test_report_is_conjunction_of_fields() {
        let schema = ValidationSchema::profile();

        let valid = schema.validate(&values("Jane Doe", "jane@x.com", "30", &[true]));
        assert!(valid.is_valid());
        assert_eq!(valid.errors().count(), 0);

        let underage = schema.validate(&values("Jane Doe", "jane@x.com", "17", &[true]));
        assert!(!underage.is_valid());
        assert_eq!(underage.error(Field::Age), Some("Age must be at least 18"));
        assert_eq!(underage.error(Field::Name), None);
        assert_eq!(underage.errors().count(), 1);
    }
}
