use std::{error::Error, sync::Arc};

use axum::{async_trait, Router};
use base64::{engine::general_purpose::STANDARD, Engine};
use common::config::Config;
use db::{
    instrument,
    session_log::{self, EventType, RecordStatus},
    ActiveValue, Database, DatabaseConnection, EntityTrait, PrimitiveDateTime,
};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde_json::{json, Value};

use crate::records::{RecordBuildError, RecordBuilder};

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Record builder that reports a fixed summary.
pub(crate) struct StaticRecordBuilder;

#[async_trait]
impl RecordBuilder for StaticRecordBuilder {
    async fn build(&self, _: bool) -> Result<Value, RecordBuildError> {
        Ok(json!({ "records_built": 2 }))
    }
}

/// Create an application router with test configuration.
pub(crate) fn app(db: DatabaseConnection) -> Router {
    crate::app_router(
        Arc::new(db),
        Arc::new(Config::for_tests()),
        Arc::new(StaticRecordBuilder),
    )
}

/// `Authorization` header value with credentials from [`Config::for_tests`].
pub(crate) fn basic_auth() -> String {
    format!("Basic {}", STANDARD.encode("test:secret"))
}

pub(crate) async fn insert_instrument(
    db: &DatabaseConnection,
    instrument_pid: &str,
    computer_name: &str,
) {
    instrument::Entity::insert(instrument::ActiveModel {
        instrument_pid: ActiveValue::Set(instrument_pid.to_owned()),
        api_url: ActiveValue::Set(String::from(
            "https://sharepoint.example.com/_vti_bin/ListData.svc/CalendarEvents",
        )),
        calendar_name: ActiveValue::Set(instrument_pid.to_owned()),
        calendar_url: ActiveValue::Set(String::from("https://sharepoint.example.com/calendar")),
        location: ActiveValue::Set(String::from("Bldg 217 Rm F113")),
        schema_name: ActiveValue::Set(instrument_pid.to_owned()),
        property_tag: ActiveValue::Set(String::from("635816")),
        filestore_path: ActiveValue::Set(format!("./{instrument_pid}")),
        computer_name: ActiveValue::Set(Some(computer_name.to_owned())),
        computer_ip: ActiveValue::Set(None),
        computer_mount: ActiveValue::Set(Some(String::from("M:/"))),
        harvester: ActiveValue::Set(String::from("sharepoint")),
        timezone: ActiveValue::Set(String::from("America/New_York")),
    })
    .exec_without_returning(db)
    .await
    .expect("unable to insert instrument");
}

pub(crate) async fn insert_session(
    db: &DatabaseConnection,
    instrument: &str,
    session_identifier: &str,
    event_type: EventType,
    record_status: RecordStatus,
    timestamp: PrimitiveDateTime,
) -> i64 {
    session_log::Entity::insert(session_log::ActiveModel {
        instrument: ActiveValue::Set(instrument.to_owned()),
        session_identifier: ActiveValue::Set(session_identifier.to_owned()),
        event_type: ActiveValue::Set(event_type),
        record_status: ActiveValue::Set(record_status),
        timestamp: ActiveValue::Set(timestamp),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("unable to insert session log entry")
    .last_insert_id
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn text(self) -> String;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn text(self) -> String {
        String::from_utf8(self.bytes().await.to_vec()).expect("unable to convert to text")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
