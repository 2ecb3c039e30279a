//! Message mesh boundary.
//!
//! The core consumes the transport exclusively as "deliver text to a named
//! mailbox" / "receive text addressed to this agent's name". [`LocalMesh`] is
//! the in-process implementation used for demos and tests; a networked mesh
//! only has to implement [`Mesh`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// A text message traveling over the mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshMessage {
    /// Name of the sending agent.
    pub sender: String,

    /// The text content.
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Message delivery failed to {recipient}: {reason}")]
    DeliveryFailed { recipient: String, reason: String },
}

/// The transport contract consumed by the message-box sensor/actuator pair.
pub trait Mesh: Send + Sync {
    /// Deliver a message to the named mailbox, creating it if needed.
    fn tell(&self, recipient: &str, message: MeshMessage) -> Result<(), MeshError>;

    /// The mailbox for the given name.
    fn at(&self, name: &str) -> Arc<Mailbox>;
}

/// A single-slot mailbox.
///
/// Single-producer/single-consumer: delivery may happen concurrently with the
/// tick loop, synchronizing only at this slot. Last message wins if the
/// previous one has not been collected yet — no queueing guarantee beyond one
/// pending item.
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: Mutex<Option<MeshMessage>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a message in the slot, replacing any uncollected one.
    pub fn deliver(&self, message: MeshMessage) {
        if let Ok(mut slot) = self.slot.lock() {
            if slot.is_some() {
                debug!(sender = %message.sender, "Replacing uncollected mailbox message");
            }
            *slot = Some(message);
        }
    }

    /// Take the pending message, if any.
    pub fn collect(&self) -> Option<MeshMessage> {
        self.slot.lock().ok()?.take()
    }
}

/// An in-process mesh: a name-keyed map of mailboxes.
#[derive(Default)]
pub struct LocalMesh {
    mailboxes: Mutex<HashMap<String, Arc<Mailbox>>>,
}

impl LocalMesh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Mesh for LocalMesh {
    fn tell(&self, recipient: &str, message: MeshMessage) -> Result<(), MeshError> {
        self.at(recipient).deliver(message);
        Ok(())
    }

    fn at(&self, name: &str) -> Arc<Mailbox> {
        let mut mailboxes = match self.mailboxes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            mailboxes
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Mailbox::new())),
        )
    }
}
