use std::sync::Arc;

use axum::extract::State;
use db::{
    session_log::{self, EventType, RecordStatus},
    ActiveValue, DatabaseConnection, EntityTrait,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    envelope::{ApiError, Envelope},
    validation::ValidatedForm,
};

/// Form-encoded request body.
#[derive(Deserialize, Validate)]
pub(super) struct SessionCreateRequest {
    /// Instrument identifier.
    #[validate(length(min = 1))]
    instrument: String,

    /// Session lifecycle event.
    event_type: EventType,

    /// Identifier shared by all events of the session.
    #[validate(length(min = 1))]
    session_identifier: String,

    /// Initial record status, `WAITING_FOR_END` by default.
    record_status: Option<RecordStatus>,

    /// User that initiated the event.
    user: Option<String>,

    /// Free-form note.
    session_note: Option<String>,
}

/// Session log entry creation handler.
pub(super) async fn create(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedForm(request): ValidatedForm<SessionCreateRequest>,
) -> Result<Envelope, ApiError> {
    info!(
        instrument = %request.instrument,
        session_identifier = %request.session_identifier,
        event_type = ?request.event_type,
        "logging session event"
    );

    session_log::Entity::insert(session_log::ActiveModel {
        instrument: ActiveValue::Set(request.instrument),
        event_type: ActiveValue::Set(request.event_type),
        record_status: ActiveValue::Set(
            request.record_status.unwrap_or(RecordStatus::WaitingForEnd),
        ),
        user: ActiveValue::Set(request.user),
        session_identifier: ActiveValue::Set(request.session_identifier),
        session_note: ActiveValue::Set(request.session_note.unwrap_or_default()),
        ..Default::default()
    })
    .exec_without_returning(&*db)
    .await
    .map_err(ApiError::Insertion)?;

    Ok(Envelope::success())
}

#[cfg(test)]
mod tests {
    use crate::testing::{app, basic_auth, create_database, insert_instrument, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::{
        session_log::{self, EventType, RecordStatus},
        EntityTrait,
    };
    use tower::ServiceExt;

    fn request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/session")
            .header("Authorization", basic_auth())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn create() {
        let db = create_database().await;

        insert_instrument(&db, "FEI-Titan-TEM-635816", "TITAN-PC").await;

        let response = app(db.clone())
            .oneshot(request(
                "instrument=FEI-Titan-TEM-635816&event_type=START&session_identifier=S123",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_json!(response.json().await, {
            "isError": false,
            "message": "Success",
            "statusCode": 200
        });

        let sessions = session_log::Entity::find().all(&db).await.unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].instrument, "FEI-Titan-TEM-635816");
        assert_eq!(sessions[0].session_identifier, "S123");
        assert_eq!(sessions[0].event_type, EventType::Start);
        assert_eq!(sessions[0].record_status, RecordStatus::WaitingForEnd);
        assert_eq!(sessions[0].session_note, "");
        assert_eq!(sessions[0].user, None);
    }

    #[tokio::test]
    async fn create_with_optional_fields() {
        let db = create_database().await;

        insert_instrument(&db, "FEI-Titan-TEM-635816", "TITAN-PC").await;

        let response = app(db.clone())
            .oneshot(request(
                "instrument=FEI-Titan-TEM-635816&event_type=END&session_identifier=S123\
                 &record_status=TO_BE_BUILT&user=jdoe&session_note=cold+stage",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let session = session_log::Entity::find().one(&db).await.unwrap().unwrap();

        assert_eq!(session.event_type, EventType::End);
        assert_eq!(session.record_status, RecordStatus::ToBeBuilt);
        assert_eq!(session.user.as_deref(), Some("jdoe"));
        assert_eq!(session.session_note, "cold stage");
    }

    #[tokio::test]
    async fn missing_event_type() {
        let db = create_database().await;

        insert_instrument(&db, "FEI-Titan-TEM-635816", "TITAN-PC").await;

        let response = app(db.clone())
            .oneshot(request(
                "instrument=FEI-Titan-TEM-635816&session_identifier=S123",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.json().await;
        assert_eq!(body["isError"], true);
        assert_eq!(body["statusCode"], 400);

        assert!(session_log::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_session_identifier() {
        let db = create_database().await;

        insert_instrument(&db, "FEI-Titan-TEM-635816", "TITAN-PC").await;

        let response = app(db.clone())
            .oneshot(request(
                "instrument=FEI-Titan-TEM-635816&event_type=START&session_identifier=",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(session_log::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_instrument() {
        let db = create_database().await;

        let response = app(db)
            .oneshot(request(
                "instrument=FEI-Titan-TEM-635816&event_type=START&session_identifier=S123",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.json().await;
        assert_eq!(body["message"], "Database error, insertion failure");
        assert!(body["detail"].is_string());
    }
}
