pub mod error;
pub mod model;
pub mod repo;
pub mod service;

#[cfg(test)]
mod service_test;

pub use error::DomainError;
pub use model::{Event, EventDraft, SearchField};
pub use repo::EventsRepository;
pub use service::Service;
