use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::model::{Event, EventDraft, SearchField};

#[async_trait]
pub trait EventsRepository: Send + Sync {
    /// Store a new event; the repository assigns the id.
    async fn insert(
        &self,
        draft: EventDraft,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Event, DomainError>;

    /// All events ordered by id.
    async fn list(&self) -> Result<Vec<Event>, DomainError>;

    async fn find(&self, id: i64) -> Result<Option<Event>, DomainError>;

    /// Replace the caller-supplied fields; `None` if the id is unknown.
    async fn replace(
        &self,
        id: i64,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, DomainError>;

    /// Remove and return the event; `None` if the id is unknown.
    async fn delete(&self, id: i64) -> Result<Option<Event>, DomainError>;

    /// Events whose `field` contains `term`, ignoring case, ordered by id.
    async fn search(&self, field: SearchField, term: &str) -> Result<Vec<Event>, DomainError>;
}
