//! Sample subscribers and the ordered subscriber list
//!
//! A [`Subscriber`] is anything that accepts a [`WeatherSample`]: a chart, a
//! logger, a network sink. The engine only needs that one capability.
//!
//! # Delivery contract
//! - Subscribers are notified synchronously, in registration order.
//! - Every subscriber of one step receives the same sample by shared reference.
//! - Registering the same subscriber twice delivers every sample to it twice.
//! - A failing subscriber is logged and counted; later subscribers are still
//!   notified and the step that produced the sample is not rolled back.

use crate::core_types::weather::WeatherSample;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{trace, warn};

/// Failure reported by a subscriber while handling a sample
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// The subscriber could not accept the sample
    #[error("subscriber rejected sample: {0}")]
    Rejected(String),

    /// Writing the sample out failed
    #[error("subscriber output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Receiver of generated weather samples
///
/// Implementations that need to mutate their own state should use interior
/// mutability; the engine holds subscribers behind [`Arc`] so the same
/// subscriber can also be observed by its owner.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use weather_sim_core::{Subscriber, SubscriberError, WeatherSample};
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<WeatherSample>>);
///
/// impl Subscriber for Recorder {
///     fn on_sample(&self, sample: &WeatherSample) -> Result<(), SubscriberError> {
///         self.0
///             .lock()
///             .map_err(|e| SubscriberError::Rejected(e.to_string()))?
///             .push(*sample);
///         Ok(())
///     }
/// }
/// ```
pub trait Subscriber: Send + Sync {
    /// Handle one sample
    ///
    /// # Errors
    /// Returns an error if the sample could not be consumed. The engine logs
    /// it and carries on with the next subscriber.
    fn on_sample(&self, sample: &WeatherSample) -> Result<(), SubscriberError>;

    /// Name used in log messages
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Subscriber backed by a closure, see [`subscriber_fn`]
pub struct FnSubscriber<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a [`Subscriber`]
///
/// ```
/// use weather_sim_core::simulation::subscriber_fn;
///
/// let printer = subscriber_fn("printer", |sample| {
///     println!("{sample}");
///     Ok(())
/// });
/// # let _ = printer;
/// ```
pub fn subscriber_fn<F>(name: impl Into<String>, f: F) -> FnSubscriber<F>
where
    F: Fn(&WeatherSample) -> Result<(), SubscriberError> + Send + Sync,
{
    FnSubscriber {
        name: name.into(),
        f,
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&WeatherSample) -> Result<(), SubscriberError> + Send + Sync,
{
    fn on_sample(&self, sample: &WeatherSample) -> Result<(), SubscriberError> {
        (self.f)(sample)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnSubscriber<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSubscriber")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Outcome of delivering one sample to every subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Subscribers that accepted the sample
    pub delivered: usize,
    /// Subscribers that returned an error
    pub failed: usize,
}

/// Ordered list of subscribers
///
/// Identity is the `Arc` allocation: removing a subscriber removes the first
/// entry that points at the same allocation.
#[derive(Clone, Default)]
pub struct SubscriberList {
    entries: Vec<Arc<dyn Subscriber>>,
}

impl SubscriberList {
    /// Empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber; duplicates are kept
    pub fn push(&mut self, subscriber: Arc<dyn Subscriber>) {
        self.entries.push(subscriber);
    }

    /// Remove the first entry sharing `subscriber`'s allocation
    ///
    /// Returns `false` if no entry matched.
    pub fn remove<S: Subscriber + ?Sized>(&mut self, subscriber: &Arc<S>) -> bool {
        let target = Arc::as_ptr(subscriber).cast::<()>();
        match self
            .entries
            .iter()
            .position(|entry| Arc::as_ptr(entry).cast::<()>() == target)
        {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registrations (duplicates counted)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody is subscribed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver a sample to every subscriber in registration order
    pub fn notify(&self, sample: &WeatherSample) -> Delivery {
        let mut delivery = Delivery::default();
        for (index, subscriber) in self.entries.iter().enumerate() {
            match subscriber.on_sample(sample) {
                Ok(()) => {
                    trace!("Delivered sample to #{} ({})", index, subscriber.name());
                    delivery.delivered += 1;
                }
                Err(e) => {
                    warn!(
                        "Subscriber #{} ({}) failed at {}: {}",
                        index,
                        subscriber.name(),
                        sample.timestamp(),
                        e
                    );
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }
}

impl fmt::Debug for SubscriberList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|s| s.name()))
            .finish()
    }
}
