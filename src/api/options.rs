//! Option handlers (admin only).
//!
//! Creating an option against a survey id that does not exist is a
//! validation failure (400), not a 404: the missing record is in the body,
//! not in the URL.
use crate::api::error::{map_store_error, ApiError};
use crate::api::extract::{EntityId, Payload};
use crate::app::AppState;
use crate::auth::AdminPrincipal;
use crate::models::{OptionCreateRequest, OptionUpdateRequest, SurveyOption};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub(crate) async fn create_option(
    AdminPrincipal(principal): AdminPrincipal,
    State(state): State<AppState>,
    Payload(body): Payload<OptionCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_option = body.validate()?;
    let option = state
        .store
        .create_option(new_option)
        .await
        .map_err(|err| map_store_error(err, "option", "create"))?;
    tracing::info!(
        option_id = option.id,
        survey_id = option.survey_id,
        subject = %principal.subject,
        "option created"
    );
    Ok((StatusCode::CREATED, Json(option)))
}

pub(crate) async fn get_option(
    _admin: AdminPrincipal,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<Json<SurveyOption>, ApiError> {
    let option = state
        .store
        .get_option(id)
        .await
        .map_err(|err| map_store_error(err, "option", "get"))?;
    Ok(Json(option))
}

pub(crate) async fn update_option(
    AdminPrincipal(principal): AdminPrincipal,
    EntityId(id): EntityId,
    State(state): State<AppState>,
    Payload(body): Payload<OptionUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let patch = body.validate()?;
    state
        .store
        .update_option(id, patch)
        .await
        .map_err(|err| map_store_error(err, "option", "update"))?;
    tracing::info!(option_id = id, subject = %principal.subject, "option updated");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn delete_option(
    AdminPrincipal(principal): AdminPrincipal,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_option(id)
        .await
        .map_err(|err| map_store_error(err, "option", "delete"))?;
    tracing::info!(option_id = id, subject = %principal.subject, "option deleted");
    Ok(StatusCode::NO_CONTENT)
}
