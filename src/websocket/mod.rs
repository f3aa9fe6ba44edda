//! WebSocket Live Updates
//!
//! Keeps the local activity collection in step with changes made elsewhere.
//!
//! ## Architecture
//!
//! - **Messages**: `{ "event": "created" | "updated" | "deleted", "activity": {...} }`
//! - **Transport**: Connector/transport seam with a real `tokio-tungstenite`
//!   implementation and an in-process channel implementation
//! - **Subscription**: Background reader task forwarding events to a sink
//!
//! ## Usage
//!
//! The stream lives at `/ws/activities` on the API host, with the scheme
//! switched from `http(s)` to `ws(s)` (see [`crate::config::ApiConfig::ws_url`]).
//! Malformed frames are logged and dropped; the stream is best-effort and is
//! never reopened automatically.

mod messages;
mod subscription;
mod transport;

pub use messages::{ActivityEvent, EventKind};
pub use subscription::{ActivitySubscription, EventSink};
pub use transport::{
    ChannelConnector, Connector, SubscriptionError, Transport, TungsteniteConnector,
};
