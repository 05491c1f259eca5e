//! JSON response envelope shared by every API route.
//!
//! Successful and failed responses have the same shape:
//!
//! ```json
//! {"isError": false, "message": "Success", "statusCode": 200, "data": {}}
//! ```
//!
//! `data` is present only on successful lookups, while `detail` is present only
//! on failures that have something to explain.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use db::DbErr;
use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{error, warn};

use crate::records::RecordBuildError;

/// Response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<T = ()> {
    is_error: bool,
    message: &'static str,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Envelope {
    /// Successful response without any data attached.
    pub(crate) fn success() -> Self {
        Self {
            is_error: false,
            message: "Success",
            status_code: StatusCode::OK.as_u16(),
            data: None,
            detail: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Successful response with the provided data.
    pub(crate) fn with_data(data: T) -> Self {
        Self {
            is_error: false,
            message: "Success",
            status_code: StatusCode::OK.as_u16(),
            data: Some(data),
            detail: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);

        (status, Json(self)).into_response()
    }
}

/// Errors returned by API handlers.
#[derive(Debug, Display, Error)]
pub(crate) enum ApiError {
    /// Missing or incorrect credentials.
    #[display(fmt = "Unauthorized")]
    Unauthorized,

    /// Request parameters are missing or malformed.
    #[display(fmt = "BadRequest error: {}", _0)]
    BadRequest(#[error(not(source))] String),

    /// Requested row doesn't exist.
    #[display(fmt = "Entry not found")]
    NotFound,

    /// Failed `SELECT` statement.
    #[display(fmt = "Database error, query failure: {}", _0)]
    Query(DbErr),

    /// Failed `UPDATE` statement.
    #[display(fmt = "Database error, update failure: {}", _0)]
    Update(DbErr),

    /// Failed `INSERT` statement.
    #[display(fmt = "Database error, insertion failure: {}", _0)]
    Insertion(DbErr),

    /// External record builder failure.
    #[display(fmt = "Record building failure: {}", _0)]
    RecordBuild(RecordBuildError),
}

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Query(_)
            | ApiError::Update(_)
            | ApiError::Insertion(_)
            | ApiError::RecordBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::BadRequest(_) => "BadRequest error",
            ApiError::NotFound => "Entry not found",
            ApiError::Query(_) => "Database error, query failure",
            ApiError::Update(_) => "Database error, update failure",
            ApiError::Insertion(_) => "Database error, insertion failure",
            ApiError::RecordBuild(_) => "Record building failure",
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            ApiError::Unauthorized | ApiError::NotFound => None,
            ApiError::BadRequest(reason) => Some(reason.clone()),
            ApiError::Query(err) | ApiError::Update(err) | ApiError::Insertion(err) => {
                Some(err.to_string())
            }
            ApiError::RecordBuild(err) => Some(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else if status == StatusCode::BAD_REQUEST {
            warn!(error = %self, "rejected request");
        }

        Envelope::<()> {
            is_error: true,
            message: self.message(),
            status_code: status.as_u16(),
            data: None,
            detail: self.detail(),
        }
        .into_response()
    }
}
