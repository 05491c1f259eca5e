use std::sync::Arc;

use axum::{
    extract::State,
    headers::{authorization::Basic, Authorization},
    http::Request,
    middleware::Next,
    response::Response,
    TypedHeader,
};
use common::config::Config;
use tracing::debug;

use crate::envelope::ApiError;

/// Require the configured HTTP Basic credential pair.
pub(super) async fn require_credentials<B>(
    State(config): State<Arc<Config>>,
    authorization: Option<TypedHeader<Authorization<Basic>>>,
    req: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let authorized = match (config.auth.as_ref(), authorization) {
        (Some(auth), Some(TypedHeader(Authorization(basic)))) => {
            auth.matches(basic.username(), basic.password())
        }
        _ => false,
    };

    if !authorized {
        debug!(uri = %req.uri(), "rejected credentials");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

/// Require the header that the trusted scheduler attaches to its requests.
///
/// User-supplied credentials are not accepted in place of the header.
pub(super) async fn require_scheduler<B>(
    State(config): State<Arc<Config>>,
    req: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let scheduled = config
        .auth
        .as_ref()
        .and_then(|auth| req.headers().get(auth.scheduler_header.as_str()))
        .map_or(false, |value| !value.is_empty());

    if !scheduled {
        debug!(uri = %req.uri(), "request is not from the scheduler");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
