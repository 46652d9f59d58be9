//! Weather value types shared by the seasonal model and the simulation engine
//!
//! These are plain values: a calendar [`Season`], a categorical
//! [`WeatherCondition`], the cumulative [`ConditionTable`] used to draw a
//! condition, and the immutable [`WeatherSample`] handed to subscribers.

use crate::core_types::units::{Celsius, Percent};
use chrono::{Month, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar season
///
/// Seasons partition the year by month (Northern Hemisphere convention):
/// - **Spring**: March to May
/// - **Summer**: June to August
/// - **Autumn**: September to November
/// - **Winter**: December to February, wrapping over the year boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// March to May
    Spring,
    /// June to August
    Summer,
    /// September to November
    Autumn,
    /// December to February
    Winter,
}

impl Season {
    /// All seasons in calendar order starting from spring
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    /// Inclusive `(first, last)` month of the season
    ///
    /// Winter's range wraps: `(December, February)`.
    #[must_use]
    pub fn month_range(self) -> (Month, Month) {
        match self {
            Season::Spring => (Month::March, Month::May),
            Season::Summer => (Month::June, Month::August),
            Season::Autumn => (Month::September, Month::November),
            Season::Winter => (Month::December, Month::February),
        }
    }

    /// Season containing the given month
    #[must_use]
    pub fn from_month(month: Month) -> Self {
        match month {
            Month::March | Month::April | Month::May => Season::Spring,
            Month::June | Month::July | Month::August => Season::Summer,
            Month::September | Month::October | Month::November => Season::Autumn,
            Month::December | Month::January | Month::February => Season::Winter,
        }
    }

    /// Lower-case season name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sky/precipitation state of a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    /// Clear skies
    Sunny,
    /// Overcast, no precipitation
    Cloudy,
    /// Liquid precipitation
    Rain,
    /// Frozen precipitation
    Snow,
    /// Rain with thunder and lightning
    Thunderstorm,
}

impl WeatherCondition {
    /// All conditions
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Thunderstorm,
    ];

    /// Whether the condition involves falling precipitation
    #[must_use]
    pub fn is_precipitating(self) -> bool {
        matches!(
            self,
            WeatherCondition::Rain | WeatherCondition::Snow | WeatherCondition::Thunderstorm
        )
    }

    /// Lower-case condition name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Thunderstorm => "thunderstorm",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered cumulative-threshold table over conditions
///
/// A uniform draw `u ∈ [0, 1)` selects the first entry whose threshold is
/// strictly greater than `u`; if none matches, the fallback is returned.
/// Thresholds are expected to be ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionTable {
    /// Thresholds in hundredths so tables stay `const` and `Eq`
    entries: &'static [(u8, WeatherCondition)],
    fallback: WeatherCondition,
}

impl ConditionTable {
    /// Build a table from `(threshold in hundredths, condition)` entries
    #[must_use]
    pub const fn new(
        entries: &'static [(u8, WeatherCondition)],
        fallback: WeatherCondition,
    ) -> Self {
        ConditionTable { entries, fallback }
    }

    /// Select the condition for a uniform draw in `[0, 1)`
    #[must_use]
    pub fn select(&self, draw: f64) -> WeatherCondition {
        self.entries
            .iter()
            .find(|(threshold, _)| draw < f64::from(*threshold) / 100.0)
            .map_or(self.fallback, |&(_, condition)| condition)
    }

    /// Iterate `(threshold, condition)` pairs as fractions, excluding the fallback
    pub fn thresholds(&self) -> impl Iterator<Item = (f64, WeatherCondition)> + '_ {
        self.entries
            .iter()
            .map(|&(threshold, condition)| (f64::from(threshold) / 100.0, condition))
    }

    /// Condition returned when no threshold exceeds the draw
    #[must_use]
    pub fn fallback(&self) -> WeatherCondition {
        self.fallback
    }
}

/// One generated weather reading
///
/// Samples are immutable once built; subscribers receive them by shared
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    temperature: Celsius,
    precipitation_probability: Percent,
    condition: WeatherCondition,
    timestamp: NaiveDateTime,
}

impl WeatherSample {
    /// Create a sample
    #[must_use]
    pub fn new(
        temperature: Celsius,
        precipitation_probability: Percent,
        condition: WeatherCondition,
        timestamp: NaiveDateTime,
    ) -> Self {
        WeatherSample {
            temperature,
            precipitation_probability,
            condition,
            timestamp,
        }
    }

    /// Air temperature
    #[must_use]
    pub fn temperature(&self) -> Celsius {
        self.temperature
    }

    /// Chance of precipitation
    #[must_use]
    pub fn precipitation_probability(&self) -> Percent {
        self.precipitation_probability
    }

    /// Sky condition
    #[must_use]
    pub fn condition(&self) -> WeatherCondition {
        self.condition
    }

    /// Simulated time of the reading
    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl fmt::Display for WeatherSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.temperature,
            self.precipitation_probability,
            self.condition
        )
    }
}
