mod auth;
mod envelope;
mod handlers;
mod records;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use records::{CommandRecordBuilder, DisabledRecordBuilder, RecordBuilder};
use tracing::{info, warn};

/// Text returned from the root route.
const SERVICE_INFO: &str = "API for nexuslims-db";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new(None)?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    let Some(database_config) = config.database.as_ref() else {
        return Err(anyhow::Error::msg("unable to load database config"));
    };

    if config.auth.is_none() {
        return Err(anyhow::Error::msg("unable to load auth config"));
    }

    let record_builder: Arc<dyn RecordBuilder> = match config.records.as_ref() {
        Some(records_config) => Arc::new(CommandRecordBuilder::new(records_config)),
        None => {
            warn!("record builder is not configured, record builds will fail");
            Arc::new(DisabledRecordBuilder)
        }
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&database_config.url).await?);
    info!("database connection established");

    let server = Server::bind(&server_config.address);
    info!(address = %server_config.address, "listening");

    let config = Arc::new(config);

    server
        .serve(app_router(database, config, record_builder).into_make_service())
        .await?;

    Ok(())
}

fn app_router(
    database: Arc<DatabaseConnection>,
    config: Arc<Config>,
    record_builder: Arc<dyn RecordBuilder>,
) -> Router {
    let protected_routes = Router::new()
        .merge(handlers::instruments::routes())
        .merge(handlers::sessions::routes())
        .route_layer(from_fn_with_state(
            config.clone(),
            auth::require_credentials,
        ));

    let scheduled_routes = handlers::records::routes()
        .route_layer(from_fn_with_state(config, auth::require_scheduler));

    Router::new()
        .route("/", get(|| async { SERVICE_INFO }))
        .nest("/api", protected_routes.merge(scheduled_routes))
        .layer(Extension(record_builder))
        .with_state(database)
}
