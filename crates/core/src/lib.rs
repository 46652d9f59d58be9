//! Synthetic Weather Stream Core Library
//!
//! Generates a temporally continuous, synthetic weather time series
//! (temperature, precipitation probability, sky condition) and pushes each
//! new reading to registered subscribers.
//!
//! ## Model
//!
//! - **Seasons** come from the calendar month and fix a hard temperature band
//!   plus a daytime condition table; nights share one table for all seasons.
//! - **Temperature** follows a bounded random walk biased by time of day,
//!   season and the drawn condition, then clamped to the season's band.
//! - **Precipitation probability** is drawn from a range chosen by season,
//!   condition and temperature.
//! - Readings below 3°C are always published as snow or cloud.
//!
//! The engine never paces itself: callers decide when to [`step`].
//!
//! [`step`]: WeatherSimulationEngine::step

// Core types and utilities
pub mod core_types;

// Calendar-driven rules
pub mod seasonal;

// Stateful engine and subscribers
pub mod simulation;

// Re-export core types
pub use core_types::{Celsius, CelsiusDelta, ConditionTable, Percent};
pub use core_types::{Season, WeatherCondition, WeatherSample};

pub use seasonal::SeasonalModel;

// Re-export engine types
pub use simulation::{subscriber_fn, Subscriber, SubscriberError};
pub use simulation::{SimulationConfig, SimulationError, SimulationState, WeatherSimulationEngine};
