//! Instrument usage session log.
//!
//! Each row is a single lifecycle event. Rows sharing a [`Model::session_identifier`]
//! form one usage session, ordered by their [`Model::timestamp`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

time::serde::format_description!(
    timestamp_format,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

/// Session log entry model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "session_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id_session_log: i64,
    pub session_identifier: String,
    pub instrument: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: TimeDateTime,
    pub event_type: EventType,
    pub record_status: RecordStatus,
    pub user: Option<String>,
    pub session_note: String,
}

/// Session lifecycle event.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    #[sea_orm(string_value = "START")]
    Start,
    #[sea_orm(string_value = "END")]
    End,
    #[sea_orm(string_value = "RECORD_GENERATION")]
    RecordGeneration,
}

/// State of the experiment record built from a session.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "WAITING_FOR_END")]
    WaitingForEnd,
    #[sea_orm(string_value = "TO_BE_BUILT")]
    ToBeBuilt,
    #[sea_orm(string_value = "ERROR")]
    Error,
    #[sea_orm(string_value = "NO_FILES_FOUND")]
    NoFilesFound,
    #[sea_orm(string_value = "NO_CONSENT")]
    NoConsent,
    #[sea_orm(string_value = "NO_RECORD")]
    NoRecord,
}

/// Session log entry model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::instrument::Entity",
        from = "Column::Instrument",
        to = "super::instrument::Column::InstrumentPid"
    )]
    Instrument,
}

impl Related<super::instrument::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instrument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
