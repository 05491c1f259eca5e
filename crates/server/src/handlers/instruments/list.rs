use std::sync::Arc;

use axum::extract::State;
use db::{instrument, DatabaseConnection, EntityTrait};

use crate::envelope::{ApiError, Envelope};

/// List every registered instrument.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Envelope<Vec<instrument::Model>>, ApiError> {
    let instruments = instrument::Entity::find()
        .all(&*db)
        .await
        .map_err(ApiError::Query)?;

    Ok(Envelope::with_data(instruments))
}
