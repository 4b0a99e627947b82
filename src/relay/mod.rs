//! Relay module - cross-participant coordination
//!
//! The relay holds the canonical board, rebroadcasts participant actions as
//! line-delimited JSON events, and resets the round after a loss.

pub mod protocol;
pub mod roster;
pub mod server;

// Re-export the event surface and entry points
pub use protocol::{BoardSnapshot, ClientEvent, Participant, ServerEvent};
pub use roster::Roster;
pub use server::{run_relay, RelayConfig};
