//! Survey collection and item handlers. All of them require an admin caller.
use crate::api::error::{map_store_error, ApiError};
use crate::api::extract::{EntityId, Payload};
use crate::app::AppState;
use crate::auth::AdminPrincipal;
use crate::models::{Survey, SurveyRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub(crate) async fn list_surveys(
    _admin: AdminPrincipal,
    State(state): State<AppState>,
) -> Result<Json<Vec<Survey>>, ApiError> {
    let surveys = state
        .store
        .list_surveys()
        .await
        .map_err(|err| map_store_error(err, "surveys", "list"))?;
    Ok(Json(surveys))
}

pub(crate) async fn create_survey(
    AdminPrincipal(principal): AdminPrincipal,
    State(state): State<AppState>,
    Payload(body): Payload<SurveyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_survey = body.validate()?;
    let survey = state
        .store
        .create_survey(new_survey)
        .await
        .map_err(|err| map_store_error(err, "survey", "create"))?;
    tracing::info!(survey_id = survey.id, subject = %principal.subject, "survey created");
    Ok((StatusCode::CREATED, Json(survey)))
}

pub(crate) async fn get_survey(
    _admin: AdminPrincipal,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<Json<Survey>, ApiError> {
    let survey = state
        .store
        .get_survey(id)
        .await
        .map_err(|err| map_store_error(err, "survey", "get"))?;
    Ok(Json(survey))
}

/// Full replace: both `name` and `description` must be present.
pub(crate) async fn update_survey(
    AdminPrincipal(principal): AdminPrincipal,
    EntityId(id): EntityId,
    State(state): State<AppState>,
    Payload(body): Payload<SurveyRequest>,
) -> Result<StatusCode, ApiError> {
    let replacement = body.validate()?;
    state
        .store
        .update_survey(id, replacement)
        .await
        .map_err(|err| map_store_error(err, "survey", "update"))?;
    tracing::info!(survey_id = id, subject = %principal.subject, "survey updated");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn delete_survey(
    AdminPrincipal(principal): AdminPrincipal,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_survey(id)
        .await
        .map_err(|err| map_store_error(err, "survey", "delete"))?;
    tracing::info!(survey_id = id, subject = %principal.subject, "survey deleted");
    Ok(StatusCode::NO_CONTENT)
}
