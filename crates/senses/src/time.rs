//! Time sensor — periodic temporal awareness.

use chrono::{DateTime, Duration, Utc};
use percept_core::interaction::SensoryEvent;
use percept_core::sensor::Sensor;
use std::sync::Mutex;

/// Fires on the first poll and whenever the configured interval has elapsed,
/// reporting the current UTC time and the seconds since the previous update.
/// Enables time-based reasoning without any external input.
pub struct TimeSensor {
    interval: Duration,
    last_tick: Mutex<Option<DateTime<Utc>>>,
}

impl TimeSensor {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Mutex::new(None),
        }
    }
}

impl Sensor for TimeSensor {
    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "Provides periodic time updates to maintain temporal awareness. \
         Helps track elapsed time and enables time-based reasoning."
    }

    fn try_collect(&self) -> Option<SensoryEvent> {
        let now = Utc::now();

        let mut last_tick = match self.last_tick.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let elapsed = match *last_tick {
            Some(last) if now - last < self.interval => return None,
            Some(last) => Some(now - last),
            None => None,
        };
        *last_tick = Some(now);
        drop(last_tick);

        let processing_instructions = match elapsed {
            Some(e) => format!(
                "Time update: Current UTC time is {}. \
                 {} seconds have elapsed since your last time awareness update.",
                now.format("%Y-%m-%d %H:%M:%S"),
                e.num_seconds(),
            ),
            None => format!(
                "Time update: Current UTC time is {}. \
                 This is your first time awareness update.",
                now.format("%Y-%m-%d %H:%M:%S"),
            ),
        };
        let recall = format!("[{}] Time check", now.format("%Y-%m-%d %H:%M:%S"));

        Some(SensoryEvent::new(self.name(), processing_instructions, recall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_first_poll() {
        let sensor = TimeSensor::new(Duration::hours(1));
        let event = sensor.try_collect().unwrap();
        assert!(event.processing_instructions.contains("first time awareness update"));
    }

    #[test]
    fn silent_until_interval_elapses() {
        let sensor = TimeSensor::new(Duration::hours(1));
        assert!(sensor.try_collect().is_some());
        assert!(sensor.try_collect().is_none());
    }

    #[test]
    fn zero_interval_fires_every_poll_with_elapsed_text() {
        let sensor = TimeSensor::new(Duration::zero());
        assert!(sensor.try_collect().is_some());
        let second = sensor.try_collect().unwrap();
        assert!(second.processing_instructions.contains("seconds have elapsed"));
    }
}
