//! Serializable simulation configuration

use crate::simulation::error::SimulationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format accepted for `start_date`
pub const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// Construction parameters for a [`WeatherSimulationEngine`]
///
/// Missing fields fall back to [`SimulationConfig::default`]: a stream
/// starting on 2025-06-01 with hourly samples and an entropy-seeded RNG.
///
/// # Example
/// ```
/// use weather_sim_core::SimulationConfig;
///
/// let config: SimulationConfig =
///     serde_json::from_str(r#"{ "start_date": "2025-01-15", "seed": 42 }"#).unwrap();
/// assert_eq!(config.interval_minutes, 60);
/// assert_eq!(config.seed, Some(42));
/// ```
///
/// [`WeatherSimulationEngine`]: crate::WeatherSimulationEngine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// First simulated day (`YYYY-MM-DD`); the stream starts at its midnight
    pub start_date: String,
    /// Simulated minutes between samples, at least 1
    pub interval_minutes: u32,
    /// Seed for a reproducible stream; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            start_date: "2025-06-01".to_string(),
            interval_minutes: 60,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse `start_date`
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfiguration`] if the date is malformed
    /// or does not exist in the calendar.
    pub fn parse_start_date(&self) -> Result<NaiveDate, SimulationError> {
        NaiveDate::parse_from_str(self.start_date.trim(), START_DATE_FORMAT).map_err(|e| {
            SimulationError::InvalidConfiguration(format!(
                "start date '{}' is not a valid YYYY-MM-DD date: {e}",
                self.start_date
            ))
        })
    }

    /// Check the interval
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfiguration`] if the interval is zero.
    pub fn validate_interval(interval_minutes: u32) -> Result<(), SimulationError> {
        if interval_minutes == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "interval must be at least 1 minute".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_bootstrap() {
        let config = SimulationConfig::default();
        assert_eq!(
            config.parse_start_date().unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert_eq!(config.interval_minutes, 60);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_malformed_dates_rejected() {
        for bad in ["", "2025-13-01", "2025-02-30", "01/06/2025", "tomorrow"] {
            let config = SimulationConfig {
                start_date: bad.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(
                    config.parse_start_date(),
                    Err(SimulationError::InvalidConfiguration(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(SimulationConfig::validate_interval(0).is_err());
        assert!(SimulationConfig::validate_interval(1).is_ok());
    }

    #[test]
    fn test_json_round_trip_with_partial_input() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "interval_minutes": 15 }"#).unwrap();
        assert_eq!(config.start_date, "2025-06-01");
        assert_eq!(config.interval_minutes, 15);

        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
