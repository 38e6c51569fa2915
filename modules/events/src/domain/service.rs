use std::sync::Arc;

use chrono::Utc;
use evently_security::SecurityContext;
use tracing::{debug, info};

use super::error::DomainError;
use super::model::{Event, EventDraft, SearchField};
use super::repo::EventsRepository;
use crate::config::EventsConfig;

/// Field names as they appear in validation errors.
pub(crate) mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const LOCATION: &str = "location";
    pub const DATE_END: &str = "date_end";
    pub const CAPACITY: &str = "capacity";
    pub const MAX_ADDITIONAL_GUESTS: &str = "max_additional_guests";
}

pub struct Service<R: EventsRepository> {
    repo: Arc<R>,
    config: EventsConfig,
}

impl<R: EventsRepository> Service<R> {
    #[must_use]
    pub fn new(repo: Arc<R>, config: EventsConfig) -> Self {
        Self { repo, config }
    }

    #[tracing::instrument(skip(self, ctx, draft), fields(subject_id = %ctx.subject_id()))]
    pub async fn create_event(
        &self,
        ctx: &SecurityContext,
        draft: EventDraft,
    ) -> Result<Event, DomainError> {
        let draft = self.validate(draft)?;
        let event = self.repo.insert(draft, ctx.subject_id(), Utc::now()).await?;
        info!(event_id = event.id, "Event created");
        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, DomainError> {
        self.repo.list().await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event, DomainError> {
        self.repo
            .find(id)
            .await?
            .ok_or(DomainError::NotFound { id })
    }

    #[tracing::instrument(skip(self, ctx, draft), fields(subject_id = %ctx.subject_id()))]
    pub async fn replace_event(
        &self,
        ctx: &SecurityContext,
        id: i64,
        draft: EventDraft,
    ) -> Result<Event, DomainError> {
        let draft = self.validate(draft)?;
        let event = self
            .repo
            .replace(id, draft, Utc::now())
            .await?
            .ok_or(DomainError::NotFound { id })?;
        info!(event_id = id, "Event replaced");
        Ok(event)
    }

    #[tracing::instrument(skip(self, ctx), fields(subject_id = %ctx.subject_id()))]
    pub async fn delete_event(&self, ctx: &SecurityContext, id: i64) -> Result<Event, DomainError> {
        let event = self
            .repo
            .delete(id)
            .await?
            .ok_or(DomainError::NotFound { id })?;
        info!(event_id = id, "Event deleted");
        Ok(event)
    }

    /// Case-insensitive substring search. An empty result is `NoMatches`.
    pub async fn search(&self, field: SearchField, term: &str) -> Result<Vec<Event>, DomainError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DomainError::validation(field.as_str(), "search term must not be blank"));
        }

        let found = self.repo.search(field, term).await?;
        debug!(field = field.as_str(), term, matches = found.len(), "Event search");
        if found.is_empty() {
            return Err(DomainError::NoMatches {
                field,
                term: term.to_owned(),
            });
        }
        Ok(found)
    }

    fn validate(&self, mut draft: EventDraft) -> Result<EventDraft, DomainError> {
        draft.name = Self::required_text(fields::NAME, &draft.name, self.config.max_name_length)?;
        draft.location = Self::required_text(
            fields::LOCATION,
            &draft.location,
            self.config.max_location_length,
        )?;

        if let Some(description) = &draft.description
            && description.chars().count() > self.config.max_description_length
        {
            return Err(DomainError::validation(
                fields::DESCRIPTION,
                format!(
                    "exceeds maximum length of {}",
                    self.config.max_description_length
                ),
            ));
        }

        if draft.date_end < draft.date_start {
            return Err(DomainError::validation(
                fields::DATE_END,
                "must not be earlier than date_start",
            ));
        }
        if draft.capacity == 0 {
            return Err(DomainError::validation(fields::CAPACITY, "must be at least 1"));
        }
        if draft.max_additional_guests > draft.capacity {
            return Err(DomainError::validation(
                fields::MAX_ADDITIONAL_GUESTS,
                "must not exceed capacity",
            ));
        }

        Ok(draft)
    }

    fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation(field, "must not be blank"));
        }
        if value.chars().count() > max_len {
            return Err(DomainError::validation(
                field,
                format!("exceeds maximum length of {max_len}"),
            ));
        }
        Ok(value.to_owned())
    }
}
