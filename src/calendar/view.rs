//! Calendar View
//!
//! State machine behind the month calendar: displayed month, selected day,
//! the create/edit modal, the error banner, and the live-update subscription.

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use super::form::{ActivityForm, FormError};
use super::grid::{MonthCursor, MonthGrid};
use super::store::ActivityStore;
use crate::api::{ApiError, CalendarApi};
use crate::model::{Activity, ActivityId};
use crate::platform::{Clock, Confirm};
use crate::websocket::{ActivitySubscription, Connector, EventSink};

/// Prompt shown before deleting
pub const DELETE_PROMPT: &str = "Delete this activity?";

/// Errors from calendar operations
///
/// The `Load`, `Save` and `Delete` messages are also what the banner shows.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Failed to load activities: {0}")]
    Load(ApiError),

    #[error("Failed to save activity: {0}")]
    Save(ApiError),

    #[error("Failed to delete activity: {0}")]
    Delete(ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("No activity form is open")]
    NoForm,

    #[error("Day {day} is not in {month}")]
    InvalidDay { day: u32, month: String },

    #[error("Activity {0} not found")]
    NotFound(ActivityId),
}

pub struct CalendarView {
    api: Arc<dyn CalendarApi>,
    confirm: Arc<dyn Confirm>,
    clock: Arc<dyn Clock>,
    store: ActivityStore,
    subscription: ActivitySubscription,
    current_month: MonthCursor,
    selected_date: Option<NaiveDate>,
    form: Option<ActivityForm>,
    loading: bool,
    error: Option<String>,
}

impl CalendarView {
    /// Create a view showing the clock's current month
    pub fn new(
        api: Arc<dyn CalendarApi>,
        confirm: Arc<dyn Confirm>,
        clock: Arc<dyn Clock>,
        ws_url: impl Into<String>,
    ) -> Self {
        let current_month = MonthCursor::containing(clock.today());
        Self {
            api,
            confirm,
            clock,
            store: ActivityStore::new(),
            subscription: ActivitySubscription::new(ws_url),
            current_month,
            selected_date: None,
            form: None,
            loading: false,
            error: None,
        }
    }

    pub fn current_month(&self) -> MonthCursor {
        self.current_month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// The open create/edit form, if the modal is showing
    pub fn form(&self) -> Option<&ActivityForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ActivityForm> {
        self.form.as_mut()
    }

    pub fn is_modal_open(&self) -> bool {
        self.form.is_some()
    }

    /// Set only while a network operation runs inside `&mut self`, so callers
    /// holding the view never observe it as `true`
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Banner text from the last failed network operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn is_live(&self) -> bool {
        self.subscription.is_connected()
    }

    // ============================================
    // Lifecycle
    // ============================================

    /// Load activities and open the live-update stream
    ///
    /// A stream that cannot be opened is logged; the view keeps working from
    /// reloads alone.
    pub async fn mount(&mut self, connector: &dyn Connector) -> Result<(), CalendarError> {
        let sink: Arc<dyn EventSink> = Arc::new(self.store.clone());
        if let Err(e) = self.subscription.connect(connector, sink).await {
            tracing::warn!(error = %e, "Live updates unavailable");
        }
        self.reload().await
    }

    /// Close the live-update stream
    pub async fn unmount(&mut self) {
        self.subscription.disconnect().await;
    }

    // ============================================
    // Navigation
    // ============================================

    pub fn prev_month(&mut self) {
        self.current_month = self.current_month.prev();
    }

    pub fn next_month(&mut self) {
        self.current_month = self.current_month.next();
    }

    pub fn show_month(&mut self, month: MonthCursor) {
        self.current_month = month;
    }

    /// Lay out the displayed month from the current collection
    pub async fn grid(&self) -> MonthGrid {
        let activities = self.store.snapshot().await;
        MonthGrid::build(self.current_month, &activities, self.clock.today())
    }

    /// Activities of the selected day, time-sorted
    pub async fn selected_activities(&self) -> Vec<Activity> {
        match self.selected_date {
            Some(date) => self.store.on_date(date).await,
            None => Vec::new(),
        }
    }

    // ============================================
    // Form handling
    // ============================================

    /// Select a day of the displayed month and open a create form for it
    pub fn select_day(&mut self, day: u32) -> Result<(), CalendarError> {
        let date = self
            .current_month
            .date(day)
            .ok_or_else(|| CalendarError::InvalidDay {
                day,
                month: self.current_month.label(),
            })?;

        self.selected_date = Some(date);
        self.form = Some(ActivityForm::new_on(date));
        Ok(())
    }

    /// Open an edit form for an existing activity
    pub async fn open_edit(&mut self, id: &ActivityId) -> Result<(), CalendarError> {
        let activity = self
            .store
            .get(id)
            .await
            .ok_or_else(|| CalendarError::NotFound(id.clone()))?;

        self.form = Some(ActivityForm::edit(&activity));
        Ok(())
    }

    /// Open a create form for today, whatever month is displayed
    pub fn open_new_today(&mut self) {
        let today = self.clock.today();
        self.selected_date = Some(today);
        self.form = Some(ActivityForm::new_on(today));
    }

    /// Dismiss the modal and drop the draft
    pub fn close_modal(&mut self) {
        self.form = None;
    }

    // ============================================
    // Network operations
    // ============================================

    /// Replace the collection with the server's
    pub async fn reload(&mut self) -> Result<(), CalendarError> {
        self.loading = true;
        let result = self.reload_inner().await;
        self.loading = false;
        result
    }

    /// Create or update from the open form, then reload and close the modal
    pub async fn submit(&mut self) -> Result<(), CalendarError> {
        let form = self.form.as_ref().ok_or(CalendarError::NoForm)?;
        let draft = form.to_draft()?;
        let editing = form.editing.clone();

        self.loading = true;
        let saved = match &editing {
            Some(id) => self.api.update_activity(id, &draft).await,
            None => self.api.create_activity(&draft).await,
        };

        let result = match saved {
            Ok(activity) => {
                tracing::info!(id = %activity.id, updated = editing.is_some(), "Activity saved");
                self.error = None;
                let reloaded = self.reload_inner().await;
                self.form = None;
                reloaded
            }
            Err(e) => Err(self.fail(CalendarError::Save(e))),
        };

        self.loading = false;
        result
    }

    /// Delete after confirmation, then reload
    ///
    /// Returns `Ok(false)` when the user declined.
    pub async fn delete(&mut self, id: &ActivityId) -> Result<bool, CalendarError> {
        if !self.confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        self.loading = true;
        let result = match self.api.delete_activity(id).await {
            Ok(_) => {
                tracing::info!(id = %id, "Activity deleted");
                self.error = None;
                if self.form.as_ref().and_then(|f| f.editing.as_ref()) == Some(id) {
                    self.form = None;
                }
                self.reload_inner().await.map(|_| true)
            }
            Err(e) => Err(self.fail(CalendarError::Delete(e))),
        };

        self.loading = false;
        result
    }

    async fn reload_inner(&mut self) -> Result<(), CalendarError> {
        let ticket = self.store.begin_reload().await;
        match self.api.get_activities().await {
            Ok(activities) => {
                tracing::debug!(count = activities.len(), "Activities loaded");
                self.store.finish_reload(ticket, activities).await;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.store.abort_reload(ticket).await;
                Err(self.fail(CalendarError::Load(e)))
            }
        }
    }

    /// Show `err` in the banner and hand it back
    fn fail(&mut self, err: CalendarError) -> CalendarError {
        tracing::warn!(error = %err, "Calendar operation failed");
        self.error = Some(err.to_string());
        err
    }
}
