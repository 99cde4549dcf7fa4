//! Public vote endpoint.
use crate::api::error::{map_store_error, ApiError};
use crate::api::extract::Payload;
use crate::app::AppState;
use crate::models::VoteRequest;
use axum::extract::State;
use axum::http::StatusCode;

/// Record one vote for an option. Public; no credentials needed.
pub(crate) async fn vote(
    State(state): State<AppState>,
    Payload(body): Payload<VoteRequest>,
) -> Result<StatusCode, ApiError> {
    let option_id = body.option_id()?;
    let votes = state
        .store
        .vote(option_id)
        .await
        .map_err(|err| map_store_error(err, "option", "vote on"))?;
    tracing::debug!(option_id, votes, "vote recorded");
    Ok(StatusCode::NO_CONTENT)
}
