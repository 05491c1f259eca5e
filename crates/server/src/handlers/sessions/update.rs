use std::sync::Arc;

use axum::extract::State;
use db::{
    session_log::{self, RecordStatus},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::{
    de::{value::StringDeserializer, IntoDeserializer},
    Deserialize, Deserializer,
};
use tracing::debug;
use validator::Validate;

use crate::{
    envelope::{ApiError, Envelope},
    validation::ValidatedForm,
};

/// Form-encoded request body.
#[derive(Deserialize, Validate)]
pub(super) struct SessionUpdateRequest {
    /// Session log entry identifier.
    id_session_log: i64,

    /// New record status.
    #[serde(default, deserialize_with = "deserialize_status_update")]
    record_status: StatusUpdate,

    /// New session note, left untouched when empty.
    session_note: Option<String>,
}

/// Requested record status change.
#[derive(Debug, Default, PartialEq, Eq)]
enum StatusUpdate {
    /// Field is absent, `TO_BE_BUILT` is written.
    #[default]
    Default,

    /// Field is present but empty, status is left untouched.
    Skip,

    Set(RecordStatus),
}

fn deserialize_status_update<'de, D>(deserializer: D) -> Result<StatusUpdate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;

    if value.is_empty() {
        return Ok(StatusUpdate::Skip);
    }

    let value: StringDeserializer<D::Error> = value.into_deserializer();
    RecordStatus::deserialize(value).map(StatusUpdate::Set)
}

/// Session log entry update handler.
///
/// Status and note are written with two separate statements, so a failure
/// of the second one leaves the first one applied.
pub(super) async fn update(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedForm(request): ValidatedForm<SessionUpdateRequest>,
) -> Result<Envelope, ApiError> {
    let status = match request.record_status {
        StatusUpdate::Default => Some(RecordStatus::ToBeBuilt),
        StatusUpdate::Skip => None,
        StatusUpdate::Set(status) => Some(status),
    };

    if let Some(status) = status {
        let result = session_log::Entity::update_many()
            .col_expr(session_log::Column::RecordStatus, status.into())
            .filter(session_log::Column::IdSessionLog.eq(request.id_session_log))
            .exec(&*db)
            .await
            .map_err(ApiError::Update)?;

        debug!(
            id = request.id_session_log,
            rows = result.rows_affected,
            "updated record status"
        );
    }

    if let Some(note) = request.session_note.filter(|note| !note.is_empty()) {
        session_log::Entity::update_many()
            .col_expr(session_log::Column::SessionNote, note.into())
            .filter(session_log::Column::IdSessionLog.eq(request.id_session_log))
            .exec(&*db)
            .await
            .map_err(ApiError::Update)?;
    }

    Ok(Envelope::success())
}
