use std::sync::Arc;

use axum::extract::State;
use db::{
    session_log::{self, RecordStatus},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    envelope::{ApiError, Envelope},
    validation::ValidatedQuery,
};

#[derive(Deserialize, Validate)]
pub(super) struct SessionListQuery {
    record_status: RecordStatus,
}

/// List session log entries with the requested record status.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedQuery(query): ValidatedQuery<SessionListQuery>,
) -> Result<Envelope<Vec<session_log::Model>>, ApiError> {
    let sessions = session_log::Entity::find()
        .filter(session_log::Column::RecordStatus.eq(query.record_status))
        .all(&*db)
        .await
        .map_err(ApiError::Query)?;

    Ok(Envelope::with_data(sessions))
}
