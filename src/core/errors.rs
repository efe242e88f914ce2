// src/core/errors.rs

use crate::services::driver::DriverError;
use thiserror::Error;

/// Run-terminating failures. Everything else is contained at day or
/// category granularity and only shows up in the summary.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("missing credentials: set SOCIALLUNCH_USER and SOCIALLUNCH_PASS")]
    MissingCredentials,
    #[error("login failed: dashboard marker not found")]
    Auth,
    #[error("driver failure: {0}")]
    Driver(#[from] DriverError),
}

/// The calendar never rendered. Non-fatal: the run ends cleanly with zero
/// days processed.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar not detected within {0:?}")]
    NotDetected(std::time::Duration),
    #[error("driver failure while scanning calendar: {0}")]
    Driver(#[from] DriverError),
}

/// Failures inside a single day's state machine. Fatal for the day, never
/// for the run.
#[derive(Debug, Error)]
pub enum DayError {
    #[error("category {0} has no items")]
    CategoryUnavailable(String),
    #[error("order confirmation failed: {0}")]
    Confirmation(DriverError),
    #[error("driver failure: {0}")]
    Driver(#[from] DriverError),
}
