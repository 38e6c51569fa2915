//! In-process event storage.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::error::DomainError;
use crate::domain::model::{Event, EventDraft, SearchField};
use crate::domain::repo::EventsRepository;

/// Events kept in a `BTreeMap` so listings come back in id order.
/// Ids are sequential from 1 and never reused.
pub struct InMemoryEventsRepository {
    events: RwLock<BTreeMap<i64, Event>>,
    next_id: AtomicI64,
}

impl Default for InMemoryEventsRepository {
    fn default() -> Self {
        Self {
            events: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryEventsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventsRepository for InMemoryEventsRepository {
    async fn insert(
        &self,
        draft: EventDraft,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Event, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let event = Event {
            id,
            name: draft.name,
            description: draft.description,
            date_start: draft.date_start,
            date_end: draft.date_end,
            location: draft.location,
            capacity: draft.capacity,
            reminder: draft.reminder,
            max_additional_guests: draft.max_additional_guests,
            created_by: created_by.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.events.write().insert(id, event.clone());
        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>, DomainError> {
        Ok(self.events.read().values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Event>, DomainError> {
        Ok(self.events.read().get(&id).cloned())
    }

    async fn replace(
        &self,
        id: i64,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, DomainError> {
        let mut events = self.events.write();
        let Some(event) = events.get_mut(&id) else {
            return Ok(None);
        };
        event.name = draft.name;
        event.description = draft.description;
        event.date_start = draft.date_start;
        event.date_end = draft.date_end;
        event.location = draft.location;
        event.capacity = draft.capacity;
        event.reminder = draft.reminder;
        event.max_additional_guests = draft.max_additional_guests;
        event.updated_at = now;
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Event>, DomainError> {
        Ok(self.events.write().remove(&id))
    }

    async fn search(&self, field: SearchField, term: &str) -> Result<Vec<Event>, DomainError> {
        let term = term.to_lowercase();
        Ok(self
            .events
            .read()
            .values()
            .filter(|event| field.matches(event, &term))
            .cloned()
            .collect())
    }
}
