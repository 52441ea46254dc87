//! Request body extractors.
//!
//! Bodies are read the way a browser client expects: an empty payload is `{}`,
//! and a payload whose content type is not parsed by the route is ignored and
//! also reads as `{}`. [`JsonBody`] parses `application/json` (and `+json`)
//! only; [`JsonOrForm`] also parses `application/x-www-form-urlencoded`.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, FromRequest, Request};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        else {
            return Self::Other;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Other
        }
    }
}

/// Why a body could not be read.
#[derive(Debug)]
pub enum BodyRejection {
    Json(JsonRejection),
    Form(FormRejection),
}

impl BodyRejection {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Json(r) => r.status(),
            Self::Form(r) => r.status(),
        }
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        match self {
            Self::Json(r) => r.body_text(),
            Self::Form(r) => r.body_text(),
        }
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(r) => r.into_response(),
            Self::Form(r) => r.into_response(),
        }
    }
}

impl From<JsonRejection> for BodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::Json(rejection)
    }
}

impl From<FormRejection> for BodyRejection {
    fn from(rejection: FormRejection) -> Self {
        Self::Form(rejection)
    }
}

async fn read_json<T, S>(req: Request, state: &S) -> Result<T, BodyRejection>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(JsonRejection::from)?;
    if bytes.is_empty() {
        return Ok(T::default());
    }
    let Json(value) = Json::<T>::from_bytes(&bytes)?;
    Ok(value)
}

/// A JSON body; empty or non-JSON payloads read as `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::of(req.headers()) {
            BodyKind::Json => read_json(req, state).await.map(Self),
            BodyKind::Form | BodyKind::Other => Ok(Self(T::default())),
        }
    }
}

/// A JSON or URL-encoded form body; any other payload reads as `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::of(req.headers()) {
            BodyKind::Json => read_json(req, state).await.map(Self),
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state).await?;
                Ok(Self(value))
            }
            BodyKind::Other => Ok(Self(T::default())),
        }
    }
}
