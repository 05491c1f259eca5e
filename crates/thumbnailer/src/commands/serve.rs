use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router, Server};
use tracing::{info, instrument};

use crate::pipeline::{Pipeline, UploadEvent};

/// Accept upload events delivered as JSON `POST` requests.
#[instrument(skip_all, err)]
pub(crate) async fn serve(pipeline: Pipeline, address: SocketAddr) -> Result<(), hyper::Error> {
    let server = Server::bind(&address);
    info!(%address, "listening for upload events");

    server.serve(router(pipeline).into_make_service()).await
}

fn router(pipeline: Pipeline) -> Router {
    Router::new()
        .route("/", post(process))
        .with_state(Arc::new(pipeline))
}

/// Process an upload event, responding only after the artifacts are uploaded.
///
/// Failures are reported with `500 Internal Server Error`, so that the event
/// can be delivered again.
async fn process(
    State(pipeline): State<Arc<Pipeline>>,
    Json(event): Json<UploadEvent>,
) -> Result<StatusCode, (StatusCode, String)> {
    pipeline
        .process(&event)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}
