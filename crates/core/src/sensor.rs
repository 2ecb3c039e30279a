//! Sensor trait — the abstraction over environment inputs.
//!
//! A sensor produces [`SensoryEvent`]s: messages from other agents, time
//! updates, anything the agent should perceive. Collection is non-blocking —
//! a sensor with no pending data must return immediately so one quiet sensor
//! never stalls the tick loop.

use crate::interaction::SensoryEvent;

/// The core Sensor trait.
///
/// Delivery into a sensor (e.g. an inbound message landing in its mailbox)
/// may happen concurrently with the tick loop; the hand-off is a single
/// in-memory slot, single-producer/single-consumer, last-message-wins if not
/// yet collected. A sensor implementation that needs stronger queueing is
/// free to add it internally.
pub trait Sensor: Send + Sync {
    /// A unique name for this sensor (e.g., "message_box", "time").
    fn name(&self) -> &str;

    /// Human-readable description of what this sensor perceives.
    /// Included in the capability catalog sent to the reasoning service.
    fn description(&self) -> &str;

    /// Collect unprocessed sensory data since the last call, if any.
    /// Must not block waiting for data.
    fn try_collect(&self) -> Option<SensoryEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct SlotSensor {
        slot: Mutex<Option<String>>,
    }

    impl Sensor for SlotSensor {
        fn name(&self) -> &str {
            "slot"
        }

        fn description(&self) -> &str {
            "Test sensor with a single pending slot"
        }

        fn try_collect(&self) -> Option<SensoryEvent> {
            let text = self.slot.lock().ok()?.take()?;
            Some(SensoryEvent::new("slot", text.clone(), text))
        }
    }

    #[test]
    fn slot_drains_after_collection() {
        let sensor = SlotSensor {
            slot: Mutex::new(Some("hello".into())),
        };

        let first = sensor.try_collect();
        assert!(first.is_some());
        assert!(sensor.try_collect().is_none());
    }
}
