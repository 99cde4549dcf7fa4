//! Survey and option rows plus the validated inputs built from request bodies.
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NAME_MAX_LEN: usize = 200;
pub const OPTION_DESCRIPTION_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Survey {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// A choice inside a survey. `votes` only ever moves through the vote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SurveyOption {
    pub id: i64,
    #[serde(rename = "survey")]
    pub survey_id: i64,
    pub description: String,
    pub position: i32,
    pub votes: i64,
}

/// Validated survey fields, used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSurvey {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOption {
    pub survey_id: i64,
    pub description: String,
    pub position: i32,
}

/// Partial option update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionPatch {
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} may not be blank")]
    Blank(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{0} may not contain NUL characters")]
    InvalidCharacter(&'static str),
}

// Incoming survey body. Every field is optional so a missing one reports
// which field it was instead of a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionCreateRequest {
    pub survey: Option<i64>,
    pub description: Option<String>,
    pub position: Option<i32>,
}

// `survey` and `votes` are not listed, so clients cannot change them here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionUpdateRequest {
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub id: Option<i64>,
}

impl SurveyRequest {
    pub fn validate(self) -> Result<NewSurvey, ValidationError> {
        let name = required_text("name", self.name, Some(NAME_MAX_LEN))?;
        let description = required_text("description", self.description, None)?;
        Ok(NewSurvey { name, description })
    }
}

impl OptionCreateRequest {
    pub fn validate(self) -> Result<NewOption, ValidationError> {
        let survey_id = self.survey.ok_or(ValidationError::Missing("survey"))?;
        let description = required_text(
            "description",
            self.description,
            Some(OPTION_DESCRIPTION_MAX_LEN),
        )?;
        let position = self.position.ok_or(ValidationError::Missing("position"))?;
        Ok(NewOption {
            survey_id,
            description,
            position,
        })
    }
}

impl OptionUpdateRequest {
    pub fn validate(self) -> Result<OptionPatch, ValidationError> {
        let description = match self.description {
            Some(value) => Some(checked_text(
                "description",
                value,
                Some(OPTION_DESCRIPTION_MAX_LEN),
            )?),
            None => None,
        };
        Ok(OptionPatch {
            description,
            position: self.position,
        })
    }
}

impl VoteRequest {
    pub fn option_id(&self) -> Result<i64, ValidationError> {
        self.id.ok_or(ValidationError::Missing("id"))
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::Missing(field))?;
    checked_text(field, value, max)
}

fn checked_text(
    field: &'static str,
    value: String,
    max: Option<usize>,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    // Postgres text columns cannot store NUL.
    if value.contains('\0') {
        return Err(ValidationError::InvalidCharacter(field));
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(value)
}
