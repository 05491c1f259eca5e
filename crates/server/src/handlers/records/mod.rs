mod build;

use std::sync::Arc;

use axum::{routing::get, Router};
use db::DatabaseConnection;

pub(crate) fn routes() -> Router<Arc<DatabaseConnection>> {
    Router::new().route("/buildrecords", get(build::build))
}
