use serde::Deserialize;

/// Configuration for the events module
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    /// Maximum length of `name`, in characters.
    pub max_name_length: usize,
    /// Maximum length of `location`, in characters.
    pub max_location_length: usize,
    /// Maximum length of `description`, in characters.
    pub max_description_length: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            max_name_length: 200,
            max_location_length: 200,
            max_description_length: 2000,
        }
    }
}
