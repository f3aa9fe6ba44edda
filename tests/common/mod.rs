//! In-memory calendar service shared by the integration tests

#![allow(dead_code)]

use activity_calendar::api::{ApiError, ApiResult, CalendarApi, ChatReply, DeleteAck};
use activity_calendar::model::{Activity, ActivityDraft, ActivityId};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
pub struct FakeApi {
    activities: Mutex<Vec<Activity>>,
    next_id: AtomicI64,
    pub fail_loads: AtomicBool,
    pub fail_saves: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub fail_chat: AtomicBool,
    pub calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    pub fn with(activities: Vec<Activity>) -> Self {
        let next = activities
            .iter()
            .filter_map(|a| match a.id {
                ActivityId::Int(n) => Some(n),
                ActivityId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            activities: Mutex::new(activities),
            next_id: AtomicI64::new(next),
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Vec<Activity> {
        self.activities.lock().unwrap().clone()
    }

    fn status(status: u16, detail: &str) -> ApiError {
        ApiError::Status {
            status,
            message: detail.to_string(),
        }
    }
}

#[async_trait]
impl CalendarApi for FakeApi {
    async fn get_activities(&self) -> ApiResult<Vec<Activity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("connection refused".to_string()));
        }
        Ok(self.stored())
    }

    async fn get_activity(&self, id: &ActivityId) -> ApiResult<Activity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stored()
            .into_iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| Self::status(404, "Activity not found"))
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> ApiResult<Activity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::status(500, "database is locked"));
        }
        let id = ActivityId::Int(self.next_id.fetch_add(1, Ordering::SeqCst));
        let activity = draft.clone().into_activity(id);
        self.activities.lock().unwrap().push(activity.clone());
        Ok(activity)
    }

    async fn update_activity(&self, id: &ActivityId, draft: &ActivityDraft) -> ApiResult<Activity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::status(500, "database is locked"));
        }
        let mut activities = self.activities.lock().unwrap();
        let slot = activities
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| Self::status(404, "Activity not found"))?;
        *slot = draft.clone().into_activity(id.clone());
        Ok(slot.clone())
    }

    async fn delete_activity(&self, id: &ActivityId) -> ApiResult<DeleteAck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::status(404, "Activity not found"));
        }
        self.activities.lock().unwrap().retain(|a| &a.id != id);
        Ok(DeleteAck {
            message: Some("Activity deleted".to_string()),
        })
    }

    async fn send_chat_message(&self, message: &str) -> ApiResult<ChatReply> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("connection refused".to_string()));
        }
        Ok(ChatReply {
            response: format!("You said: {}", message),
        })
    }
}
