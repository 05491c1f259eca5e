use std::sync::Arc;

use axum::extract::State;
use db::{session_log, DatabaseConnection, EntityTrait};
use serde::Deserialize;
use validator::Validate;

use crate::{
    envelope::{ApiError, Envelope},
    validation::ValidatedQuery,
};

#[derive(Deserialize, Validate)]
pub(super) struct SessionDetailsQuery {
    id_session_log: i64,
}

pub(super) async fn details(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedQuery(query): ValidatedQuery<SessionDetailsQuery>,
) -> Result<Envelope<session_log::Model>, ApiError> {
    let session = session_log::Entity::find_by_id(query.id_session_log)
        .one(&*db)
        .await
        .map_err(ApiError::Query)?
        .ok_or(ApiError::NotFound)?;

    Ok(Envelope::with_data(session))
}
