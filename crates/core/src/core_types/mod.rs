//! Core types and utilities

pub mod units;
pub mod weather;

pub use units::*;
pub use weather::*;
