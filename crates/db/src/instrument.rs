//! Registered laboratory instrument.
//!
//! Instruments are maintained outside of the API, which only reads them.
//! Acquisition computers identify themselves through [`Model::computer_name`].

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Instrument model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "instruments")]
pub struct Model {
    /// Persistent instrument identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub instrument_pid: String,
    pub api_url: String,
    pub calendar_name: String,
    pub calendar_url: String,
    pub location: String,
    pub schema_name: String,
    pub property_tag: String,
    pub filestore_path: String,
    /// Hostname of the acquisition computer attached to the instrument.
    #[sea_orm(unique)]
    pub computer_name: Option<String>,
    pub computer_ip: Option<String>,
    pub computer_mount: Option<String>,
    pub harvester: String,
    pub timezone: String,
}

/// Instrument model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_log::Entity")]
    SessionLogs,
}

impl Related<super::session_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
