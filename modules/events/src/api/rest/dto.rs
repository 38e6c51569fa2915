use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::model::{Event, EventDraft};

/// REST DTO for an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDto {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    /// Minutes before `date_start`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<u32>,
    pub max_additional_guests: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create and replace requests
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EventRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    /// Minutes before `date_start`.
    #[serde(default)]
    pub reminder: Option<u32>,
    #[serde(default)]
    pub max_additional_guests: u32,
}

impl From<Event> for EventDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            date_start: e.date_start,
            date_end: e.date_end,
            location: e.location,
            capacity: e.capacity,
            reminder: e.reminder,
            max_additional_guests: e.max_additional_guests,
            created_by: e.created_by,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<EventRequest> for EventDraft {
    fn from(r: EventRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            date_start: r.date_start,
            date_end: r.date_end,
            location: r.location,
            capacity: r.capacity,
            reminder: r.reminder,
            max_additional_guests: r.max_additional_guests,
        }
    }
}
