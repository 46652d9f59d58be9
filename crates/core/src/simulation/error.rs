//! Errors raised by the simulation engine

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur when building or stepping a simulation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Construction parameters were rejected; no engine was created
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The next timestamp cannot be represented by the calendar
    #[error("timestamp out of range: {from} + {interval_minutes} min")]
    TimestampOutOfRange {
        /// Timestamp of the last committed step
        from: NaiveDateTime,
        /// Configured step length
        interval_minutes: u32,
    },
}
