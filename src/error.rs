//! Error types shared by the handlers.
//!
//! JSON services answer with the `{success, error, message}` envelope,
//! the booking site renders its HTML error pages.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::services::auth::AuthError;
use crate::views;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad Request")]
    BadRequest,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Unprocessable Entity")]
    Unprocessable,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable | ApiError::Database(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(e) => e.status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            ApiError::Auth(e) => ErrorEnvelope {
                success: false,
                error: status.as_u16(),
                code: Some(e.code),
                message: e.description,
            },
            ApiError::Database(e) => {
                tracing::error!("persistence failure: {:?}", e);
                ErrorEnvelope {
                    success: false,
                    error: status.as_u16(),
                    code: None,
                    message: ApiError::Unprocessable.to_string(),
                }
            }
            other => ErrorEnvelope {
                success: false,
                error: status.as_u16(),
                code: None,
                message: other.to_string(),
            },
        };

        (status, Json(envelope)).into_response()
    }
}

/// JSON body extractor answering malformed payloads with a 400 envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("rejected json body: {}", rejection.body_text());
                Err(ApiError::BadRequest)
            }
        }
    }
}

/// Path extractor for the JSON services; an id that does not parse names nothing.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => {
                tracing::debug!("rejected path: {}", rejection.body_text());
                Err(ApiError::NotFound)
            }
        }
    }
}

pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn api_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Failures of the HTML booking site.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for PageError {
    fn from(e: sqlx::Error) -> Self {
        PageError::Internal(e.to_string())
    }
}

impl From<askama::Error> for PageError {
    fn from(e: askama::Error) -> Self {
        PageError::Internal(e.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, page) = match &self {
            PageError::NotFound => (StatusCode::NOT_FOUND, views::render_not_found()),
            PageError::Internal(reason) => {
                tracing::error!("page failed: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, views::render_server_error())
            }
        };
        (status, Html(page)).into_response()
    }
}

/// Path extractor for the booking site, answering unparseable ids with the 404 page.
#[derive(Debug, Clone, Copy)]
pub struct PagePath<T>(pub T);

impl<S, T> FromRequestParts<S> for PagePath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PagePath(value)),
            Err(rejection) => {
                tracing::debug!("rejected path: {}", rejection.body_text());
                Err(PageError::NotFound)
            }
        }
    }
}

pub async fn page_not_found() -> PageError {
    PageError::NotFound
}

pub async fn page_method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, Html(views::render_method_not_allowed())).into_response()
}
