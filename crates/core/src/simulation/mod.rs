//! Weather simulation engine
//!
//! [`WeatherSimulationEngine`] owns the rolling [`SimulationState`] and an
//! injectable RNG, advances simulated time one interval per [`step`], and
//! pushes every new [`WeatherSample`] to its subscribers before returning.
//!
//! # Concurrency
//! Stepping takes `&mut self`, so there is exactly one writer and a step can
//! never be re-entered. Subscribers only see `&WeatherSample`; they cannot
//! reach the engine from inside a notification, so the subscriber list cannot
//! change while it is being walked. A slow subscriber stalls the stream.
//!
//! [`step`]: WeatherSimulationEngine::step

pub mod config;
pub mod error;
pub mod subscriber;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use subscriber::{
    subscriber_fn, Delivery, FnSubscriber, Subscriber, SubscriberError, SubscriberList,
};

use crate::core_types::units::{Celsius, CelsiusDelta, Percent};
use crate::core_types::weather::{Season, WeatherCondition, WeatherSample};
use crate::seasonal::{
    SeasonalModel, COLD_THRESHOLD, RANDOM_WALK_AMPLITUDE, SNOW_MELT_THRESHOLD,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

/// Rolling state needed to compute the next sample
///
/// Invariants after every step:
/// - `last_temperature` lies inside the clamp band of `current_season`
/// - `current_season == SeasonalModel::season_of(last_timestamp)`
/// - `last_timestamp` advanced by exactly `interval_minutes`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    last_temperature: Celsius,
    last_timestamp: NaiveDateTime,
    current_season: Season,
    interval_minutes: u32,
    latest: Option<WeatherSample>,
    steps: u64,
}

impl SimulationState {
    /// Temperature of the last step (or the seeded starting temperature)
    #[must_use]
    pub fn last_temperature(&self) -> Celsius {
        self.last_temperature
    }

    /// Timestamp of the last step (or midnight of the start date)
    #[must_use]
    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.last_timestamp
    }

    /// Season of `last_timestamp`
    #[must_use]
    pub fn current_season(&self) -> Season {
        self.current_season
    }

    /// Simulated minutes per step
    #[must_use]
    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Most recent sample, if any step has run
    #[must_use]
    pub fn latest(&self) -> Option<&WeatherSample> {
        self.latest.as_ref()
    }

    /// Number of completed steps
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Adopt a fully built sample as the new state
    fn commit(&mut self, sample: WeatherSample, season: Season) {
        self.last_temperature = sample.temperature();
        self.last_timestamp = sample.timestamp();
        self.current_season = season;
        self.latest = Some(sample);
        self.steps += 1;
    }
}

/// Synthetic weather stream generator
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use std::sync::Arc;
/// use weather_sim_core::{subscriber_fn, WeatherSimulationEngine};
///
/// let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let mut engine = WeatherSimulationEngine::with_seed(start, 60, 42).unwrap();
/// engine.subscribe(Arc::new(subscriber_fn("stdout", |sample| {
///     println!("{sample}");
///     Ok(())
/// })));
///
/// let sample = engine.step().unwrap();
/// assert_eq!(sample.timestamp().to_string(), "2025-06-01 01:00:00");
/// assert!(*sample.temperature() >= 15.0 && *sample.temperature() <= 45.0);
/// ```
pub struct WeatherSimulationEngine<R: Rng = StdRng> {
    state: SimulationState,
    subscribers: SubscriberList,
    rng: R,
    notification_failures: u64,
}

impl WeatherSimulationEngine<StdRng> {
    /// Create an engine with an OS-seeded RNG
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfiguration`] if `interval_minutes` is 0.
    pub fn new(start_date: NaiveDate, interval_minutes: u32) -> Result<Self, SimulationError> {
        Self::with_rng(start_date, interval_minutes, StdRng::from_os_rng())
    }

    /// Create an engine whose stream is reproducible from `seed`
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfiguration`] if `interval_minutes` is 0.
    pub fn with_seed(
        start_date: NaiveDate,
        interval_minutes: u32,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        Self::with_rng(start_date, interval_minutes, StdRng::seed_from_u64(seed))
    }

    /// Create an engine from a [`SimulationConfig`]
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfiguration`] if the start date is
    /// malformed or the interval is 0.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let start_date = config.parse_start_date()?;
        match config.seed {
            Some(seed) => Self::with_seed(start_date, config.interval_minutes, seed),
            None => Self::new(start_date, config.interval_minutes),
        }
    }
}

impl<R: Rng> WeatherSimulationEngine<R> {
    /// Create an engine drawing from the supplied RNG
    ///
    /// The clock starts at midnight of `start_date` and the starting
    /// temperature is drawn from that season's band. No sample is produced
    /// until the first [`step`](Self::step).
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfiguration`] if `interval_minutes` is 0.
    pub fn with_rng(
        start_date: NaiveDate,
        interval_minutes: u32,
        mut rng: R,
    ) -> Result<Self, SimulationError> {
        SimulationConfig::validate_interval(interval_minutes)?;

        let last_timestamp = start_date.and_time(NaiveTime::MIN);
        let current_season = SeasonalModel::season_of(last_timestamp);
        let last_temperature = SeasonalModel::initial_temperature(current_season, &mut rng);

        info!(
            "Creating weather simulation: start={}, season={}, interval={}min, T0={}",
            last_timestamp, current_season, interval_minutes, last_temperature
        );

        Ok(WeatherSimulationEngine {
            state: SimulationState {
                last_temperature,
                last_timestamp,
                current_season,
                interval_minutes,
                latest: None,
                steps: 0,
            },
            subscribers: SubscriberList::new(),
            rng,
            notification_failures: 0,
        })
    }

    /// Register a subscriber for all future samples
    ///
    /// Registration order is notification order. Registering the same
    /// subscriber twice delivers each sample to it twice.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) {
        debug!("Subscribing {}", subscriber.name());
        self.subscribers.push(subscriber);
    }

    /// Remove the first registration of `subscriber`
    ///
    /// Returns `false` (and does nothing) if it was not registered. Samples
    /// already delivered are unaffected.
    pub fn unsubscribe<S: Subscriber + ?Sized>(&mut self, subscriber: &Arc<S>) -> bool {
        let removed = self.subscribers.remove(subscriber);
        debug!("Unsubscribing {}: removed={}", subscriber.name(), removed);
        removed
    }

    /// Number of registrations (duplicates counted)
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Current rolling state
    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Most recent sample, if any step has run
    #[must_use]
    pub fn latest(&self) -> Option<&WeatherSample> {
        self.state.latest()
    }

    /// Total subscriber failures seen so far
    #[must_use]
    pub fn notification_failures(&self) -> u64 {
        self.notification_failures
    }

    /// Advance one interval, publish the new sample and return it
    ///
    /// State is committed before subscribers run; a failing subscriber is
    /// logged and counted but does not undo the step.
    ///
    /// # Errors
    /// Returns [`SimulationError::TimestampOutOfRange`] if the next timestamp
    /// is beyond the calendar's range. Nothing is committed in that case.
    pub fn step(&mut self) -> Result<WeatherSample, SimulationError> {
        let (sample, season) = self.next_sample()?;

        self.state.commit(sample, season);
        self.publish(&sample);

        Ok(sample)
    }

    /// Run `steps` consecutive steps and collect the samples
    ///
    /// # Errors
    /// Stops at the first failing step; samples produced before it stay
    /// committed and published.
    pub fn run(&mut self, steps: usize) -> Result<Vec<WeatherSample>, SimulationError> {
        (0..steps).map(|_| self.step()).collect()
    }

    /// Send the most recent sample to the current subscribers again
    ///
    /// Simulated time does not advance. Returns `None` before the first step.
    pub fn republish_latest(&mut self) -> Option<WeatherSample> {
        let sample = *self.state.latest()?;
        self.publish(&sample);
        Some(sample)
    }

    fn publish(&mut self, sample: &WeatherSample) {
        let delivery = self.subscribers.notify(sample);
        self.notification_failures += delivery.failed as u64;
    }

    /// Compute the next sample without touching the committed state
    fn next_sample(&mut self) -> Result<(WeatherSample, Season), SimulationError> {
        let previous = self.state.last_temperature;
        let interval_minutes = self.state.interval_minutes;

        // 1. Advance the clock
        let timestamp = self
            .state
            .last_timestamp
            .checked_add_signed(TimeDelta::minutes(i64::from(interval_minutes)))
            .ok_or(SimulationError::TimestampOutOfRange {
                from: self.state.last_timestamp,
                interval_minutes,
            })?;

        // 2. Season of the new timestamp
        let season = SeasonalModel::season_of(timestamp);

        // 3. Draw a condition from the night or daytime table
        let table = SeasonalModel::condition_table(season, timestamp.hour());
        let mut condition = table.select(self.rng.random::<f64>());

        // 4-5. Random walk plus biases, clamped to the season's band
        let base = CelsiusDelta::new(
            self.rng
                .random_range(-RANDOM_WALK_AMPLITUDE..RANDOM_WALK_AMPLITUDE),
        );
        let delta = SeasonalModel::temperature_delta(condition, timestamp, season, previous, base);
        let temperature = SeasonalModel::clamp(season, previous + delta);

        // 6. Precipitation from the drawn condition
        let mut precipitation = self.draw_precipitation(condition, season, temperature);

        // 7. Post-adjustments: melt snow, then force cold readings to snow or cloud
        if condition == WeatherCondition::Snow && temperature > SNOW_MELT_THRESHOLD {
            condition = WeatherCondition::Cloudy;
        }
        if temperature < COLD_THRESHOLD {
            condition = if self.rng.random::<f64>() < 0.5 {
                WeatherCondition::Snow
            } else {
                WeatherCondition::Cloudy
            };
            if condition != WeatherCondition::Snow {
                precipitation = Percent::ZERO;
            }
        }

        debug!(
            "Step {}: {} ({}), {} -> {} ({}), {} {}",
            self.state.steps + 1,
            timestamp,
            season,
            previous,
            temperature,
            delta,
            condition,
            precipitation
        );

        // 8. Build the sample
        Ok((
            WeatherSample::new(temperature, precipitation, condition, timestamp),
            season,
        ))
    }

    fn draw_precipitation(
        &mut self,
        condition: WeatherCondition,
        season: Season,
        temperature: Celsius,
    ) -> Percent {
        let range = SeasonalModel::precipitation_range(condition, season, temperature);
        if range.start() == range.end() {
            return Percent::new(*range.start());
        }
        Percent::new(self.rng.random_range(range))
    }
}

impl<R: Rng> std::fmt::Debug for WeatherSimulationEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSimulationEngine")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers)
            .field("notification_failures", &self.notification_failures)
            .finish_non_exhaustive()
    }
}
