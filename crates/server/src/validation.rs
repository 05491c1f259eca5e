use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, QueryRejection},
        FromRequest, FromRequestParts, Query,
    },
    http::{request::Parts, Request},
    Form,
};
use validator::Validate;

use crate::envelope::ApiError;

/// Wrapper for [`axum`] form value validation.
///
/// Equivalent to the [`axum`]'s [`Form`] struct with [`validator`] crate support.
/// Both parsing and validation failures are rejected with a `400 Bad Request`
/// envelope before the handler is invoked.
///
/// [`Form`]: axum::extract::Form
pub(crate) struct ValidatedForm<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedForm<T>
where
    T: Validate,
    B: Send + 'static,
    S: Sync,
    Form<T>: FromRequest<S, B, Rejection = FormRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::from_request(req, state)
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;

        value
            .validate()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;

        Ok(ValidatedForm(value))
    }
}

/// Wrapper for [`axum`] query string validation.
///
/// See [`ValidatedForm`] for details.
pub(crate) struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: Validate,
    S: Send + Sync,
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::from_request_parts(parts, state)
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;

        value
            .validate()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;

        Ok(ValidatedQuery(value))
    }
}
