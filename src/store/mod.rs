//! Survey persistence.
//!
//! Handlers only see the [`SurveyStore`] trait. Two backends implement it:
//! an in-memory store for local runs and tests, and a Postgres store for
//! durable deployments.
use crate::models::{NewOption, NewSurvey, OptionPatch, Survey, SurveyOption};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    /// A write referenced a parent row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// All surveys in ascending id order.
    async fn list_surveys(&self) -> StoreResult<Vec<Survey>>;
    async fn create_survey(&self, survey: NewSurvey) -> StoreResult<Survey>;
    async fn get_survey(&self, id: i64) -> StoreResult<Survey>;
    /// Replaces name and description of an existing survey.
    async fn update_survey(&self, id: i64, survey: NewSurvey) -> StoreResult<Survey>;
    /// Deletes a survey together with all of its options.
    async fn delete_survey(&self, id: i64) -> StoreResult<()>;

    /// Every option ordered by `(survey_id, position, id)`.
    async fn list_all_options(&self) -> StoreResult<Vec<SurveyOption>>;
    /// Fails with [`StoreError::InvalidReference`] when the survey is missing.
    async fn create_option(&self, option: NewOption) -> StoreResult<SurveyOption>;
    async fn get_option(&self, id: i64) -> StoreResult<SurveyOption>;
    async fn update_option(&self, id: i64, patch: OptionPatch) -> StoreResult<SurveyOption>;
    async fn delete_option(&self, id: i64) -> StoreResult<()>;

    /// Adds exactly one vote to the option and returns the new count.
    ///
    /// Concurrent calls must never lose an increment.
    async fn vote(&self, option_id: i64) -> StoreResult<i64>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
