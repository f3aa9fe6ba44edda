//! Local Activity Store
//!
//! The in-memory copy of the activity collection that the calendar renders
//! from. It is written from two directions: full reloads from the REST API and
//! live events from the WebSocket reader task.
//!
//! Both paths merge by id, which makes every event idempotent. A reload takes
//! a [`ReloadTicket`] before it calls the server; events that land while it is
//! in flight are journaled and replayed on top of its snapshot, so a push is
//! never lost to a reload that started before it. A reload that finishes after
//! a newer one has already been applied is discarded.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::grid::activities_on;
use crate::model::{Activity, ActivityId};
use crate::websocket::{ActivityEvent, EventKind, EventSink};

/// Marks the start of a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    activities: Vec<Activity>,
    /// Sequence number of the next applied event
    next_seq: u64,
    /// Generation handed to the last reload that started
    started_generation: u64,
    /// Generation of the snapshot currently held
    applied_generation: u64,
    in_flight: usize,
    journal: Vec<(u64, ActivityEvent)>,
}

/// Shared, clonable handle to the activity collection
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    state: Arc<RwLock<StoreState>>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the whole collection, in server order plus appended inserts
    pub async fn snapshot(&self) -> Vec<Activity> {
        self.state.read().await.activities.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.activities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.activities.is_empty()
    }

    pub async fn get(&self, id: &ActivityId) -> Option<Activity> {
        self.state
            .read()
            .await
            .activities
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }

    /// Activities on one date, time-sorted
    pub async fn on_date(&self, date: NaiveDate) -> Vec<Activity> {
        activities_on(&self.state.read().await.activities, date)
    }

    /// Apply one live event
    pub async fn apply(&self, event: ActivityEvent) {
        let mut state = self.state.write().await;
        let seq = state.next_seq;
        state.next_seq += 1;

        merge(&mut state.activities, &event);
        if state.in_flight > 0 {
            state.journal.push((seq, event));
        }
    }

    /// Register a reload that is about to call the server
    pub async fn begin_reload(&self) -> ReloadTicket {
        let mut state = self.state.write().await;
        state.started_generation += 1;
        state.in_flight += 1;
        ReloadTicket {
            generation: state.started_generation,
            seq: state.next_seq,
        }
    }

    /// Install a reload's snapshot
    ///
    /// Returns `false` when the snapshot was discarded because a newer reload
    /// had already been applied.
    pub async fn finish_reload(&self, ticket: ReloadTicket, activities: Vec<Activity>) -> bool {
        let mut state = self.state.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);

        let applied = ticket.generation > state.applied_generation;
        if applied {
            let mut merged = activities;
            for (_, event) in state.journal.iter().filter(|(seq, _)| *seq >= ticket.seq) {
                merge(&mut merged, event);
            }
            state.activities = merged;
            state.applied_generation = ticket.generation;
        } else {
            tracing::debug!(
                generation = ticket.generation,
                current = state.applied_generation,
                "Discarding stale reload"
            );
        }

        if state.in_flight == 0 {
            state.journal.clear();
        }
        applied
    }

    /// Forget a reload that failed
    pub async fn abort_reload(&self, _ticket: ReloadTicket) {
        let mut state = self.state.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            state.journal.clear();
        }
    }
}

/// Upsert on created/updated, remove on deleted
fn merge(activities: &mut Vec<Activity>, event: &ActivityEvent) {
    match event.event {
        EventKind::Created | EventKind::Updated => {
            match activities.iter_mut().find(|a| a.id == event.activity.id) {
                Some(existing) => *existing = event.activity.clone(),
                None => activities.push(event.activity.clone()),
            }
        }
        EventKind::Deleted => activities.retain(|a| a.id != event.activity.id),
    }
}

#[async_trait]
impl EventSink for ActivityStore {
    async fn deliver(&self, event: ActivityEvent) {
        self.apply(event).await;
    }
}
