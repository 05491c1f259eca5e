use std::sync::Arc;

use axum::extract::State;
use db::{
    session_log::{self, EventType},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{
    de::{
        value::{self, StrDeserializer},
        IntoDeserializer,
    },
    Deserialize,
};
use validator::Validate;

use crate::{
    envelope::{ApiError, Envelope},
    validation::ValidatedQuery,
};

/// Query string parameters.
#[derive(Deserialize, Validate)]
pub(super) struct LatestSessionQuery {
    /// Instrument identifier.
    instrument: Option<String>,

    /// Session identifier.
    #[validate(length(min = 1))]
    session_identifier: Option<String>,

    /// Event type to look for, used together with the session identifier.
    ///
    /// Parsed only in session lookups, so it is ignored in instrument lookups.
    event_type: Option<String>,
}

/// Supported lookup modes.
#[derive(Debug, PartialEq, Eq)]
enum LatestSessionLookup {
    /// Latest session event registered on an instrument, excluding record generation events.
    Instrument(String),

    /// Latest event of a specific type inside of a session.
    Session {
        session_identifier: String,
        event_type: EventType,
    },
}

impl TryFrom<LatestSessionQuery> for LatestSessionLookup {
    type Error = ApiError;

    fn try_from(query: LatestSessionQuery) -> Result<Self, Self::Error> {
        match (query.instrument, query.session_identifier) {
            (Some(instrument), _) => Ok(LatestSessionLookup::Instrument(instrument)),
            (None, Some(session_identifier)) => Ok(LatestSessionLookup::Session {
                session_identifier,
                event_type: query
                    .event_type
                    .as_deref()
                    .map_or(Ok(EventType::Start), parse_event_type)?,
            }),
            (None, None) => Err(ApiError::BadRequest(String::from(
                "either `instrument` or `session_identifier` must be set",
            ))),
        }
    }
}

fn parse_event_type(event_type: &str) -> Result<EventType, ApiError> {
    let deserializer: StrDeserializer<'_, value::Error> = event_type.into_deserializer();

    EventType::deserialize(deserializer).map_err(|err| ApiError::BadRequest(err.to_string()))
}

/// Handler for getting the most recent session log entry.
///
/// When `instrument` is set, it takes precedence over `session_identifier`.
pub(super) async fn latest(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedQuery(query): ValidatedQuery<LatestSessionQuery>,
) -> Result<Envelope<session_log::Model>, ApiError> {
    let select = match LatestSessionLookup::try_from(query)? {
        LatestSessionLookup::Instrument(instrument) => session_log::Entity::find()
            .filter(session_log::Column::Instrument.eq(instrument))
            .filter(session_log::Column::EventType.ne(EventType::RecordGeneration)),
        LatestSessionLookup::Session {
            session_identifier,
            event_type,
        } => session_log::Entity::find()
            .filter(session_log::Column::SessionIdentifier.eq(session_identifier))
            .filter(session_log::Column::EventType.eq(event_type)),
    };

    let session = select
        .order_by_desc(session_log::Column::Timestamp)
        .one(&*db)
        .await
        .map_err(ApiError::Query)?
        .ok_or(ApiError::NotFound)?;

    Ok(Envelope::with_data(session))
}
