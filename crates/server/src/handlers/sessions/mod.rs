mod create;
mod details;
mod latest;
mod list;
mod update;

use std::sync::Arc;

use axum::{routing::get, Router};
use db::DatabaseConnection;

pub(crate) fn routes() -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route(
            "/session",
            get(details::details)
                .post(create::create)
                .put(update::update),
        )
        .route("/lastsession", get(latest::latest))
        .route("/sessionlist", get(list::list))
}
