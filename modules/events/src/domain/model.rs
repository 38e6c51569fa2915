use chrono::{DateTime, Utc};

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    /// Minutes before `date_start`.
    pub reminder: Option<u32>,
    pub max_additional_guests: u32,
    /// Subject id of the caller that created the event.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields, used both to create and to replace an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub description: Option<String>,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    pub reminder: Option<u32>,
    pub max_additional_guests: u32,
}

/// Text field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Location,
}

impl SearchField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Location => "location",
        }
    }

    /// Case-insensitive substring match against the event's field.
    #[must_use]
    pub fn matches(self, event: &Event, lowercase_term: &str) -> bool {
        let value = match self {
            SearchField::Name => &event.name,
            SearchField::Location => &event.location,
        };
        value.to_lowercase().contains(lowercase_term)
    }
}
