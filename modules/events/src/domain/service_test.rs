//! Service tests against the in-memory repository.

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use evently_security::SecurityContext;

    use crate::config::EventsConfig;
    use crate::domain::error::DomainError;
    use crate::domain::model::{EventDraft, SearchField};
    use crate::domain::service::Service;
    use crate::infra::storage::InMemoryEventsRepository;

    type ConcreteService = Service<InMemoryEventsRepository>;

    fn service() -> ConcreteService {
        Service::new(
            Arc::new(InMemoryEventsRepository::new()),
            EventsConfig {
                max_name_length: 20,
                max_location_length: 20,
                max_description_length: 50,
            },
        )
    }

    fn ctx(subject: &str) -> SecurityContext {
        SecurityContext::builder().subject_id(subject).build()
    }

    fn draft() -> EventDraft {
        let start = Utc.with_ymd_and_hms(2026, 6, 12, 19, 0, 0).unwrap();
        EventDraft {
            name: "Rust Meetup".to_owned(),
            description: Some("Talks and pizza".to_owned()),
            date_start: start,
            date_end: start + Duration::hours(3),
            location: "Berlin".to_owned(),
            capacity: 40,
            reminder: Some(60),
            max_additional_guests: 2,
        }
    }

    fn validation_field(err: DomainError) -> String {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_records_creator_and_trims_text() {
        let svc = service();
        let mut input = draft();
        input.name = "  Rust Meetup  ".to_owned();

        let event = svc.create_event(&ctx("u1"), input).await.unwrap();

        assert_eq!(event.id, 1);
        assert_eq!(event.name, "Rust Meetup");
        assert_eq!(event.created_by, "u1");
        assert_eq!(event.created_at, event.updated_at);
        assert_eq!(svc.get_event(1).await.unwrap(), event);
    }

    #[tokio::test]
    async fn invalid_drafts_are_rejected_per_field() {
        let svc = service();

        let cases: Vec<(&str, Box<dyn Fn(&mut EventDraft)>)> = vec![
            ("name", Box::new(|d| d.name = "   ".to_owned())),
            ("name", Box::new(|d| d.name = "x".repeat(21))),
            ("location", Box::new(|d| d.location = String::new())),
            ("location", Box::new(|d| d.location = "y".repeat(21))),
            ("description", Box::new(|d| d.description = Some("z".repeat(51)))),
            (
                "date_end",
                Box::new(|d| d.date_end = d.date_start - Duration::minutes(1)),
            ),
            ("capacity", Box::new(|d| d.capacity = 0)),
            (
                "max_additional_guests",
                Box::new(|d| {
                    d.capacity = 3;
                    d.max_additional_guests = 4;
                }),
            ),
        ];

        for (field, mutate) in cases {
            let mut input = draft();
            mutate(&mut input);
            let err = svc.create_event(&ctx("u1"), input).await.unwrap_err();
            assert_eq!(validation_field(err), field);
        }
        assert!(svc.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn boundary_values_are_accepted() {
        let svc = service();
        let mut input = draft();
        input.name = "n".repeat(20);
        input.date_end = input.date_start;
        input.capacity = 1;
        input.max_additional_guests = 1;

        assert!(svc.create_event(&ctx("u1"), input).await.is_ok());
    }

    #[tokio::test]
    async fn replace_validates_and_requires_existing_event() {
        let svc = service();
        let created = svc.create_event(&ctx("u1"), draft()).await.unwrap();

        let mut update = draft();
        update.capacity = 100;
        let replaced = svc
            .replace_event(&ctx("u2"), created.id, update)
            .await
            .unwrap();
        assert_eq!(replaced.capacity, 100);
        assert_eq!(replaced.created_by, "u1");

        let mut bad = draft();
        bad.capacity = 0;
        assert!(matches!(
            svc.replace_event(&ctx("u2"), created.id, bad).await,
            Err(DomainError::Validation { .. })
        ));

        assert!(matches!(
            svc.replace_event(&ctx("u2"), 42, draft()).await,
            Err(DomainError::NotFound { id: 42 })
        ));
    }

    #[tokio::test]
    async fn delete_returns_removed_event() {
        let svc = service();
        let created = svc.create_event(&ctx("u1"), draft()).await.unwrap();

        let deleted = svc.delete_event(&ctx("u1"), created.id).await.unwrap();
        assert_eq!(deleted, created);

        assert!(matches!(
            svc.get_event(created.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            svc.delete_event(&ctx("u1"), created.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn search_reports_no_matches_and_blank_terms() {
        let svc = service();
        svc.create_event(&ctx("u1"), draft()).await.unwrap();

        let found = svc.search(SearchField::Name, "meet").await.unwrap();
        assert_eq!(found.len(), 1);

        assert!(matches!(
            svc.search(SearchField::Location, "Paris").await,
            Err(DomainError::NoMatches {
                field: SearchField::Location,
                ..
            })
        ));
        assert_eq!(
            validation_field(svc.search(SearchField::Name, "  ").await.unwrap_err()),
            "name"
        );
    }
}
