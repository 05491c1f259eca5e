/// Instrument lookup routes.
pub(crate) mod instruments;

/// Experiment record building routes.
pub(crate) mod records;

/// Session log routes.
pub(crate) mod sessions;
