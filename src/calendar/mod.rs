//! Calendar
//!
//! Month calendar of activities.
//!
//! ## Architecture
//!
//! - **Grid**: Month arithmetic and per-day layout (pure functions)
//! - **Store**: Shared activity collection, fed by reloads and live events
//! - **Form**: Create/edit draft with input checks
//! - **View**: The state machine tying them to the API and the live stream

mod form;
mod grid;
mod store;
mod view;

pub use form::{ActivityForm, FormError, FormField};
pub use grid::{
    activities_on, DayCell, GridCell, MonthCursor, MonthGrid, VISIBLE_PER_DAY, WEEKDAY_NAMES,
};
pub use store::{ActivityStore, ReloadTicket};
pub use view::{CalendarError, CalendarView, DELETE_PROMPT};
