//! Mapping between the API's wire records, the domain answer set and the form's checkbox options.

use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::{AnswerSet, ApiAnswers, ApiInterest, CheckboxOption, InterestOption};

/// Map an API answer record onto the domain model.
///
/// Rejects records whose interests have an empty or repeated id, since the domain keys
/// interests by id.
pub fn api_to_domain(api: ApiAnswers) -> Result<AnswerSet, AppError> {
    check_interest_ids(api.interests.iter().map(|interest| interest.id.as_str()))?;

    Ok(AnswerSet {
        name: api.name,
        mail: api.mail,
        age: api.age.map(|age| age.to_string()).unwrap_or_default(),
        interests: api
            .interests
            .into_iter()
            .map(|interest| InterestOption {
                id: interest.id,
                label: interest.label,
                is_checked: interest.is_checked,
            })
            .collect(),
    })
}

/// Map a domain answer set onto the API's request shape.
pub fn domain_to_api(answers: &AnswerSet) -> Result<ApiAnswers, AppError> {
    check_interest_ids(answers.interests.iter().map(|interest| interest.id.as_str()))?;

    Ok(ApiAnswers {
        name: answers.name.clone(),
        mail: answers.mail.clone(),
        age: parse_age(&answers.age)?,
        interests: answers
            .interests
            .iter()
            .map(|interest| ApiInterest {
                id: interest.id.clone(),
                label: interest.label.clone(),
                is_checked: interest.is_checked,
            })
            .collect(),
    })
}

/// Checkbox options for the interests control.
pub fn options_from_interests(interests: &[InterestOption]) -> Vec<CheckboxOption> {
    interests
        .iter()
        .map(|interest| CheckboxOption::new(&interest.id, &interest.label, interest.is_checked))
        .collect()
}

/// Domain interests from the checkbox group's current state.
pub fn interests_from_options(options: &[CheckboxOption]) -> Vec<InterestOption> {
    options
        .iter()
        .map(|option| InterestOption::new(&option.id, &option.label, option.checked))
        .collect()
}

fn parse_age(age: &str) -> Result<Option<u32>, AppError> {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(age) = trimmed.parse::<u32>() {
        return Ok(Some(age));
    }
    // Integral decimals such as "30.0" pass form validation too
    match trimmed.parse::<f64>() {
        Ok(n) if n.fract() == 0.0 && n >= 0.0 && n <= u32::MAX as f64 => Ok(Some(n as u32)),
        _ => Err(AppError::Decode(format!("Age {:?} is not a whole number", age))),
    }
}

fn check_interest_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(AppError::Decode("Interest id must not be empty".to_string()));
        }
        if !seen.insert(id) {
            return Err(AppError::Decode(format!("Duplicate interest id {:?}", id)));
        }
    }
    Ok(())
}
