//! Sensor and actuator implementations for Percept.
//!
//! The message mesh is the agent's link to its peers: a [`MessageBoxSensor`]
//! perceives inbound messages, a [`MessageBoxActuator`] sends them. A
//! [`TimeSensor`] provides periodic temporal awareness.

pub mod mesh;
pub mod message_box;
pub mod time;

pub use mesh::{LocalMesh, Mailbox, Mesh, MeshError, MeshMessage};
pub use message_box::{MessageBoxActuator, MessageBoxSensor};
pub use time::TimeSensor;
