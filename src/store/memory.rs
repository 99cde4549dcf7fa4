//! In-memory implementation of [`SurveyStore`].
//!
//! All state sits behind one `tokio::sync::RwLock`, so every mutation
//! (including the option cascade on survey delete and the vote increment)
//! runs under a single write guard. Nothing survives a restart.
use super::{StoreError, StoreResult, SurveyStore};
use crate::models::{NewOption, NewSurvey, OptionPatch, Survey, SurveyOption};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    next_survey_id: i64,
    next_option_id: i64,
    surveys: BTreeMap<i64, Survey>,
    options: BTreeMap<i64, SurveyOption>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SurveyStore for InMemoryStore {
    async fn list_surveys(&self) -> StoreResult<Vec<Survey>> {
        let state = self.state.read().await;
        Ok(state.surveys.values().cloned().collect())
    }

    async fn create_survey(&self, survey: NewSurvey) -> StoreResult<Survey> {
        let mut state = self.state.write().await;
        state.next_survey_id += 1;
        let created = Survey {
            id: state.next_survey_id,
            name: survey.name,
            description: survey.description,
        };
        state.surveys.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_survey(&self, id: i64) -> StoreResult<Survey> {
        let state = self.state.read().await;
        state
            .surveys
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("survey".into()))
    }

    async fn update_survey(&self, id: i64, survey: NewSurvey) -> StoreResult<Survey> {
        let mut state = self.state.write().await;
        let existing = state
            .surveys
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("survey".into()))?;
        existing.name = survey.name;
        existing.description = survey.description;
        Ok(existing.clone())
    }

    async fn delete_survey(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.surveys.remove(&id).is_none() {
            return Err(StoreError::NotFound("survey".into()));
        }
        state.options.retain(|_, option| option.survey_id != id);
        Ok(())
    }

    async fn list_all_options(&self) -> StoreResult<Vec<SurveyOption>> {
        let state = self.state.read().await;
        let mut options: Vec<SurveyOption> = state.options.values().cloned().collect();
        options.sort_by_key(|option| (option.survey_id, option.position, option.id));
        Ok(options)
    }

    async fn create_option(&self, option: NewOption) -> StoreResult<SurveyOption> {
        let mut state = self.state.write().await;
        if !state.surveys.contains_key(&option.survey_id) {
            return Err(StoreError::InvalidReference("survey".into()));
        }
        state.next_option_id += 1;
        let created = SurveyOption {
            id: state.next_option_id,
            survey_id: option.survey_id,
            description: option.description,
            position: option.position,
            votes: 0,
        };
        state.options.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_option(&self, id: i64) -> StoreResult<SurveyOption> {
        let state = self.state.read().await;
        state
            .options
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("option".into()))
    }

    async fn update_option(&self, id: i64, patch: OptionPatch) -> StoreResult<SurveyOption> {
        let mut state = self.state.write().await;
        let existing = state
            .options
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("option".into()))?;
        if let Some(description) = patch.description {
            existing.description = description;
        }
        if let Some(position) = patch.position {
            existing.position = position;
        }
        Ok(existing.clone())
    }

    async fn delete_option(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        match state.options.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("option".into())),
        }
    }

    async fn vote(&self, option_id: i64) -> StoreResult<i64> {
        let mut state = self.state.write().await;
        let option = state
            .options
            .get_mut(&option_id)
            .ok_or_else(|| StoreError::NotFound("option".into()))?;
        option.votes += 1;
        Ok(option.votes)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
