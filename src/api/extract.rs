//! Request extractors whose rejections use the API error shape.
use crate::api::error::{api_validation_error, ApiError};
use axum::body::Body;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::Method;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

/// Request body accepted as JSON, a url-encoded form or multipart form data.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| api_validation_error(&rejection.body_text()))?;
            Ok(Payload(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| api_validation_error(&rejection.body_text()))?;
            Ok(Payload(value))
        } else if content_type.starts_with("multipart/form-data") {
            let form = multipart_as_form(req, state).await?;
            let Form(value) = Form::<T>::from_request(form, state)
                .await
                .map_err(|rejection| api_validation_error(&rejection.body_text()))?;
            Ok(Payload(value))
        } else {
            Err(api_validation_error(
                "expected an application/json, application/x-www-form-urlencoded or multipart/form-data body",
            ))
        }
    }
}

// Re-encodes the text parts of a multipart body as a url-encoded form so both
// encodings share one decoder.
async fn multipart_as_form<S>(req: Request, state: &S) -> Result<Request, ApiError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| api_validation_error(&err.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|err| api_validation_error(&err.body_text()))?;
        pairs.push(format!(
            "{}={}",
            urlencoding::encode(&name),
            urlencoding::encode(&value)
        ));
    }

    // Form reads GET bodies from the query string, so keep a body-carrying method.
    Request::builder()
        .method(Method::POST)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(pairs.join("&")))
        .map_err(|err| api_validation_error(&err.to_string()))
}

/// Integer id taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| api_validation_error("id must be an integer"))?;
        Ok(EntityId(id))
    }
}
