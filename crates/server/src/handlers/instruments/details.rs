use std::sync::Arc;

use axum::extract::State;
use db::{instrument, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use validator::Validate;

use crate::{
    envelope::{ApiError, Envelope},
    validation::ValidatedQuery,
};

/// Query string parameters.
#[derive(Deserialize, Validate)]
pub(super) struct InstrumentDetailsQuery {
    /// Hostname of the acquisition computer.
    #[validate(length(min = 1))]
    computer_name: String,
}

/// Look up the instrument attached to an acquisition computer.
pub(super) async fn details(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedQuery(query): ValidatedQuery<InstrumentDetailsQuery>,
) -> Result<Envelope<instrument::Model>, ApiError> {
    let instrument = instrument::Entity::find()
        .filter(instrument::Column::ComputerName.eq(query.computer_name))
        .one(&*db)
        .await
        .map_err(ApiError::Query)?
        .ok_or(ApiError::NotFound)?;

    Ok(Envelope::with_data(instrument))
}
