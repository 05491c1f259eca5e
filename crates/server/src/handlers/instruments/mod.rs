mod details;
mod list;

use std::sync::Arc;

use axum::{routing::get, Router};
use db::DatabaseConnection;

pub(crate) fn routes() -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/instrument", get(details::details))
        .route("/instrumentlist", get(list::list))
}
