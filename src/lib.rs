//! # Activity Calendar
//!
//! Client for a personal activity calendar service: a month view of
//! activities grouped by life pillar, kept current by a live event stream,
//! plus a chat panel for the service's AI assistant.
//!
//! ## Features
//!
//! - **Month calendar**: Day grid with time-sorted activity chips
//! - **Create/edit/delete**: Form-backed drafts sent to the REST API
//! - **Live updates**: WebSocket events merged into the shared collection
//! - **Assistant chat**: Request/response transcript with suggested questions
//!
//! ## Modules
//!
//! - [`model`]: Activity and chat message types
//! - [`api`]: REST client for the calendar service
//! - [`websocket`]: Live activity event subscription
//! - [`calendar`]: Month grid, activity store and the calendar view
//! - [`chat`]: Assistant chat view
//! - [`shell`]: Terminal shell switching between the two views
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use activity_calendar::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::new("http://localhost:8000");
//!     let ws_url = config.ws_url();
//!     let api: Arc<dyn CalendarApi> = Arc::new(ApiClient::new(config)?);
//!
//!     let mut calendar = CalendarView::new(
//!         api.clone(),
//!         Arc::new(FixedConfirm(true)),
//!         Arc::new(SystemClock),
//!         ws_url,
//!     );
//!     calendar.mount(&TungsteniteConnector).await?;
//!
//!     println!("{}", shell::render_grid(&calendar.grid().await));
//!
//!     calendar.unmount().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod calendar;
pub mod chat;
pub mod config;
pub mod model;
pub mod platform;
pub mod shell;
pub mod websocket;

// Re-export top-level types for convenience
pub use model::{
    Activity, ActivityDraft, ActivityId, ChatMessage, ChatRole, ClockTime, MessageId, Pillar,
};

pub use api::{ApiClient, ApiError, ApiResult, CalendarApi, ChatReply, DeleteAck};

pub use calendar::{
    ActivityForm, ActivityStore, CalendarError, CalendarView, FormError, FormField, MonthCursor,
    MonthGrid,
};

pub use chat::{ChatView, SubmitOutcome};

pub use config::{ApiConfig, Config, ConfigError, EnvSource, LoggingConfig, ProcessEnv};

pub use platform::{Clock, Confirm, FixedClock, FixedConfirm, StdinConfirm, SystemClock};

pub use shell::{Shell, ShellOutcome};

pub use websocket::{
    ActivityEvent, ActivitySubscription, ChannelConnector, Connector, EventKind, EventSink,
    SubscriptionError, TungsteniteConnector,
};
