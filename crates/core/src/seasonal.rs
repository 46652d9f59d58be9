//! Seasonal model
//!
//! Pure, stateless lookup of everything that depends only on the calendar:
//! which season a timestamp falls in, the season's temperature band, the
//! condition probability tables, and the deterministic parts of the
//! temperature and precipitation rules. The engine supplies all random draws,
//! so every rule here can be checked without an RNG.
//!
//! # Time-of-day windows
//! - **Night**: 22:00 to 06:00 (hour in `[22, 24) ∪ [0, 6)`)
//! - **Midday**: 10:00 to 16:00 (hour in `[10, 16)`)

use crate::core_types::units::{Celsius, CelsiusDelta};
use crate::core_types::weather::{ConditionTable, Season, WeatherCondition};
use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use std::ops::RangeInclusive;

/// Below this temperature only snow or cloud is published
pub const COLD_THRESHOLD: Celsius = Celsius::new(3.0);

/// Snow drawn above this temperature is downgraded to cloud
pub const SNOW_MELT_THRESHOLD: Celsius = Celsius::new(2.0);

/// Half-width of the uniform random walk applied every step
pub const RANDOM_WALK_AMPLITUDE: f64 = 0.75;

const NIGHT_TABLE: ConditionTable = ConditionTable::new(
    &[
        (20, WeatherCondition::Thunderstorm),
        (50, WeatherCondition::Cloudy),
    ],
    WeatherCondition::Rain,
);

const WINTER_TABLE: ConditionTable = ConditionTable::new(
    &[(30, WeatherCondition::Snow), (60, WeatherCondition::Cloudy)],
    WeatherCondition::Sunny,
);

const SPRING_TABLE: ConditionTable = ConditionTable::new(
    &[(20, WeatherCondition::Rain), (40, WeatherCondition::Cloudy)],
    WeatherCondition::Sunny,
);

const SUMMER_TABLE: ConditionTable = ConditionTable::new(
    &[
        (10, WeatherCondition::Thunderstorm),
        (30, WeatherCondition::Cloudy),
    ],
    WeatherCondition::Sunny,
);

const AUTUMN_TABLE: ConditionTable = ConditionTable::new(
    &[(30, WeatherCondition::Rain), (60, WeatherCondition::Cloudy)],
    WeatherCondition::Sunny,
);

/// Stateless seasonal lookups
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use weather_sim_core::{Season, SeasonalModel, WeatherCondition};
///
/// let noon = NaiveDate::from_ymd_opt(2025, 1, 15)
///     .unwrap()
///     .and_hms_opt(12, 0, 0)
///     .unwrap();
/// assert_eq!(SeasonalModel::season_of(noon), Season::Winter);
///
/// let (min, max) = SeasonalModel::clamp_range(Season::Winter);
/// assert_eq!((*min, *max), (-15.0, 15.0));
///
/// let table = SeasonalModel::condition_table(Season::Winter, 12);
/// assert_eq!(table.select(0.1), WeatherCondition::Snow);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalModel;

impl SeasonalModel {
    /// Season of a timestamp, derived from its month only
    #[must_use]
    pub fn season_of(timestamp: NaiveDateTime) -> Season {
        match timestamp.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Hard `(min, max)` temperature band of a season
    ///
    /// Also the range initial temperatures are drawn from.
    #[must_use]
    pub fn clamp_range(season: Season) -> (Celsius, Celsius) {
        match season {
            Season::Winter => (Celsius::new(-15.0), Celsius::new(15.0)),
            Season::Spring | Season::Autumn => (Celsius::new(5.0), Celsius::new(25.0)),
            Season::Summer => (Celsius::new(15.0), Celsius::new(45.0)),
        }
    }

    /// Draw a starting temperature uniformly from the season's band
    pub fn initial_temperature<R: Rng>(season: Season, rng: &mut R) -> Celsius {
        let (min, max) = Self::clamp_range(season);
        let u: f64 = rng.random();
        Celsius::new(*min + u * (*max - *min))
    }

    /// Clamp a temperature into the season's band
    #[must_use]
    pub fn clamp(season: Season, temperature: Celsius) -> Celsius {
        let (min, max) = Self::clamp_range(season);
        temperature.clamp(min, max)
    }

    /// Whether an hour of day falls in the night window `[22:00, 06:00)`
    #[must_use]
    pub fn is_night(hour: u32) -> bool {
        !(6..22).contains(&hour)
    }

    /// Whether an hour of day falls in the midday window `[10:00, 16:00)`
    #[must_use]
    pub fn is_midday(hour: u32) -> bool {
        (10..16).contains(&hour)
    }

    /// Condition table for a season at an hour of day
    ///
    /// The night table applies to every season and takes precedence over the
    /// season's daytime table.
    #[must_use]
    pub fn condition_table(season: Season, hour: u32) -> ConditionTable {
        if Self::is_night(hour) {
            return NIGHT_TABLE;
        }
        match season {
            Season::Winter => WINTER_TABLE,
            Season::Spring => SPRING_TABLE,
            Season::Summer => SUMMER_TABLE,
            Season::Autumn => AUTUMN_TABLE,
        }
    }

    /// Deterministic temperature change for one step
    ///
    /// `base` is the random-walk component, uniform in
    /// `[-RANDOM_WALK_AMPLITUDE, RANDOM_WALK_AMPLITUDE)`. The band corrections
    /// look at `previous`, the temperature before this step.
    ///
    /// Night bias is `base -= (summer ? -1.5 : -0.5)`, so every night warms:
    /// by 1.5°C in summer and 0.5°C in the other seasons.
    #[must_use]
    pub fn temperature_delta(
        condition: WeatherCondition,
        timestamp: NaiveDateTime,
        season: Season,
        previous: Celsius,
        base: CelsiusDelta,
    ) -> CelsiusDelta {
        let mut change = base;
        let hour = timestamp.hour();

        if Self::is_night(hour) {
            change -= CelsiusDelta::new(if season == Season::Summer { -1.5 } else { -0.5 });
        } else if Self::is_midday(hour) {
            change += CelsiusDelta::new(0.7);
        }

        change += Self::band_correction(season, previous);
        change + Self::condition_offset(condition)
    }

    /// Push-back toward the band plus the constant seasonal bias
    #[must_use]
    pub fn band_correction(season: Season, previous: Celsius) -> CelsiusDelta {
        let (min, max) = Self::clamp_range(season);
        let (push, bias) = match season {
            Season::Winter => (0.5, -0.3),
            Season::Summer => (1.5, 0.3),
            Season::Spring | Season::Autumn => (0.3, 0.0),
        };

        let mut correction = bias;
        if previous > max {
            correction -= push;
        }
        if previous < min {
            correction += push;
        }
        CelsiusDelta::new(correction)
    }

    /// Temperature offset associated with a condition
    #[must_use]
    pub fn condition_offset(condition: WeatherCondition) -> CelsiusDelta {
        CelsiusDelta::new(match condition {
            WeatherCondition::Thunderstorm => -4.5,
            WeatherCondition::Snow => -0.5,
            WeatherCondition::Sunny => 0.9,
            WeatherCondition::Cloudy => -1.3,
            WeatherCondition::Rain => -2.2,
        })
    }

    /// Inclusive range the precipitation probability is drawn from
    ///
    /// Returns `0..=0` when no precipitation is possible.
    #[must_use]
    pub fn precipitation_range(
        condition: WeatherCondition,
        season: Season,
        temperature: Celsius,
    ) -> RangeInclusive<u8> {
        if temperature < COLD_THRESHOLD {
            return if condition == WeatherCondition::Snow {
                30..=70
            } else {
                0..=0
            };
        }

        match (season, condition) {
            (Season::Winter, WeatherCondition::Snow) => 30..=70,
            (Season::Winter, _) => 0..=20,
            (Season::Spring, _) => 30..=80,
            (Season::Summer, WeatherCondition::Thunderstorm) => 50..=100,
            (Season::Summer, _) => 0..=30,
            (Season::Autumn, _) => 40..=100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(month: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_season_of_every_month() {
        let expected = [
            Season::Winter,
            Season::Winter,
            Season::Spring,
            Season::Spring,
            Season::Spring,
            Season::Summer,
            Season::Summer,
            Season::Summer,
            Season::Autumn,
            Season::Autumn,
            Season::Autumn,
            Season::Winter,
        ];
        for (month, season) in (1..=12).zip(expected) {
            assert_eq!(SeasonalModel::season_of(at(month, 12)), season, "month {month}");
            // Idempotent
            assert_eq!(
                SeasonalModel::season_of(at(month, 12)),
                SeasonalModel::season_of(at(month, 12))
            );
        }
    }

    #[test]
    fn test_season_of_agrees_with_month_table() {
        for month in 1..=12u8 {
            let chrono_month = chrono::Month::try_from(month).unwrap();
            assert_eq!(
                SeasonalModel::season_of(at(u32::from(month), 0)),
                Season::from_month(chrono_month)
            );
        }
    }

    #[test]
    fn test_initial_temperature_within_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for season in Season::ALL {
            let (min, max) = SeasonalModel::clamp_range(season);
            for _ in 0..500 {
                let t = SeasonalModel::initial_temperature(season, &mut rng);
                assert!(t >= min && t <= max, "{season}: {t}");
            }
        }
    }

    #[test]
    fn test_night_window() {
        for hour in [22, 23, 0, 1, 5] {
            assert!(SeasonalModel::is_night(hour), "{hour}");
        }
        for hour in [6, 10, 15, 21] {
            assert!(!SeasonalModel::is_night(hour), "{hour}");
        }
        assert!(SeasonalModel::is_midday(10));
        assert!(!SeasonalModel::is_midday(16));
    }

    #[test]
    fn test_night_table_overrides_season() {
        for season in Season::ALL {
            let table = SeasonalModel::condition_table(season, 23);
            assert_eq!(table.select(0.1), WeatherCondition::Thunderstorm);
            assert_eq!(table.select(0.3), WeatherCondition::Cloudy);
            assert_eq!(table.select(0.9), WeatherCondition::Rain);
        }
    }

    #[test]
    fn test_daytime_tables() {
        let cases = [
            (Season::Winter, 0.25, WeatherCondition::Snow),
            (Season::Winter, 0.5, WeatherCondition::Cloudy),
            (Season::Winter, 0.7, WeatherCondition::Sunny),
            (Season::Spring, 0.1, WeatherCondition::Rain),
            (Season::Spring, 0.3, WeatherCondition::Cloudy),
            (Season::Spring, 0.45, WeatherCondition::Sunny),
            (Season::Summer, 0.05, WeatherCondition::Thunderstorm),
            (Season::Summer, 0.2, WeatherCondition::Cloudy),
            (Season::Summer, 0.35, WeatherCondition::Sunny),
            (Season::Autumn, 0.25, WeatherCondition::Rain),
            (Season::Autumn, 0.55, WeatherCondition::Cloudy),
            (Season::Autumn, 0.65, WeatherCondition::Sunny),
        ];
        for (season, draw, expected) in cases {
            let table = SeasonalModel::condition_table(season, 12);
            assert_eq!(table.select(draw), expected, "{season} @ {draw}");
        }
    }

    #[test]
    fn test_night_bias_literal_arithmetic() {
        let base = CelsiusDelta::ZERO;
        // Cloudy offset is -1.3; inside-band previous temperatures
        let summer = SeasonalModel::temperature_delta(
            WeatherCondition::Cloudy,
            at(7, 23),
            Season::Summer,
            Celsius::new(25.0),
            base,
        );
        assert_relative_eq!(*summer, 1.5 + 0.3 - 1.3, epsilon = 1e-12);

        let spring = SeasonalModel::temperature_delta(
            WeatherCondition::Cloudy,
            at(4, 2),
            Season::Spring,
            Celsius::new(15.0),
            base,
        );
        assert_relative_eq!(*spring, 0.5 - 1.3, epsilon = 1e-12);

        // Winter nights warm too, then the winter bias pulls back 0.3
        let winter = SeasonalModel::temperature_delta(
            WeatherCondition::Cloudy,
            at(1, 23),
            Season::Winter,
            Celsius::new(0.0),
            base,
        );
        assert_relative_eq!(*winter, 0.5 - 0.3 - 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_midday_bias_and_condition_offsets() {
        let delta = SeasonalModel::temperature_delta(
            WeatherCondition::Sunny,
            at(10, 12),
            Season::Autumn,
            Celsius::new(15.0),
            CelsiusDelta::new(0.25),
        );
        assert_relative_eq!(*delta, 0.25 + 0.7 + 0.9, epsilon = 1e-12);

        // Morning hours get no time-of-day bias
        let delta = SeasonalModel::temperature_delta(
            WeatherCondition::Thunderstorm,
            at(10, 8),
            Season::Autumn,
            Celsius::new(15.0),
            CelsiusDelta::ZERO,
        );
        assert_relative_eq!(*delta, -4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_band_correction_uses_previous_temperature() {
        let c = SeasonalModel::band_correction(Season::Winter, Celsius::new(20.0));
        assert_relative_eq!(*c, -0.5 - 0.3, epsilon = 1e-12);
        let c = SeasonalModel::band_correction(Season::Winter, Celsius::new(-20.0));
        assert_relative_eq!(*c, 0.5 - 0.3, epsilon = 1e-12);
        let c = SeasonalModel::band_correction(Season::Summer, Celsius::new(10.0));
        assert_relative_eq!(*c, 1.5 + 0.3, epsilon = 1e-12);
        let c = SeasonalModel::band_correction(Season::Summer, Celsius::new(50.0));
        assert_relative_eq!(*c, -1.5 + 0.3, epsilon = 1e-12);
        let c = SeasonalModel::band_correction(Season::Spring, Celsius::new(30.0));
        assert_relative_eq!(*c, -0.3, epsilon = 1e-12);
        let c = SeasonalModel::band_correction(Season::Autumn, Celsius::new(12.0));
        assert_relative_eq!(*c, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_precipitation_ranges() {
        let cold = Celsius::new(1.0);
        assert_eq!(
            SeasonalModel::precipitation_range(WeatherCondition::Snow, Season::Winter, cold),
            30..=70
        );
        assert_eq!(
            SeasonalModel::precipitation_range(WeatherCondition::Rain, Season::Autumn, cold),
            0..=0
        );

        let warm = Celsius::new(20.0);
        let cases = [
            (WeatherCondition::Snow, Season::Winter, 30..=70),
            (WeatherCondition::Cloudy, Season::Winter, 0..=20),
            (WeatherCondition::Sunny, Season::Spring, 30..=80),
            (WeatherCondition::Thunderstorm, Season::Summer, 50..=100),
            (WeatherCondition::Rain, Season::Summer, 0..=30),
            (WeatherCondition::Sunny, Season::Autumn, 40..=100),
        ];
        for (condition, season, expected) in cases {
            assert_eq!(
                SeasonalModel::precipitation_range(condition, season, warm),
                expected,
                "{condition} in {season}"
            );
        }
    }

    #[test]
    fn test_cold_threshold_is_exclusive() {
        // Exactly 3.0°C is not "cold"
        assert_eq!(
            SeasonalModel::precipitation_range(
                WeatherCondition::Cloudy,
                Season::Winter,
                COLD_THRESHOLD
            ),
            0..=20
        );
    }
}
