//! Slack front door - event model and socket-mode runner
//!
//! The chat platform delivers two event kinds the bot cares about: an
//! app mention in a channel and a direct message. Both carry raw text;
//! both go through the same `CommandService` contract
//! (`handle(raw_text) -> response_text`). Everything else - the bot's
//! own messages, channel chatter without a mention - is filtered before
//! the core sees it.
//!
//! The WebSocket transport itself is an external collaborator behind
//! the `SocketTransport` trait; a no-op transport ships in-tree so the
//! server binary runs without platform wiring.

pub mod events;
pub mod socket;

pub use events::{
    CommandService, EventDispatcher, HandlerResult, SlackEnvelope, SlackEvent,
};
pub use socket::{ReconnectPolicy, SocketModeRunner, SocketTransport, TransportError};
