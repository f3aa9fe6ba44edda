//! Calendar Service API
//!
//! Client side of the calendar service's REST contract.
//!
//! # Endpoints
//!
//! ## Activities
//! - `GET /api/activities` - List all activities
//! - `GET /api/activities/{id}` - Get an activity
//! - `POST /api/activities` - Create an activity
//! - `PUT /api/activities/{id}` - Update an activity
//! - `DELETE /api/activities/{id}` - Delete an activity
//!
//! ## Chat
//! - `POST /api/chat` - Ask the assistant about your activities
//!
//! Non-success responses are expected to carry `{ "detail": "..." }`; see
//! [`ApiError::from_status`] for how bodies without one are reported.
//!
//! # Example
//!
//! ```rust,no_run
//! use activity_calendar::api::{ApiClient, CalendarApi};
//! use activity_calendar::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiConfig::default())?;
//!     for activity in client.get_activities().await? {
//!         println!("{} {}", activity.date, activity.chip_label());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, CalendarApi};
pub use dto::{ChatReply, ChatRequest, DeleteAck};
pub use error::{ApiError, ApiResult, UNKNOWN_ERROR};
