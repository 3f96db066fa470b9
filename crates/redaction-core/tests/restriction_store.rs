//! Store behaviour against an in-memory documents API

#[path = "common/fake_api.rs"]
mod fake_api;

use fake_api::{area_record, field_record, FakeApi};
use pretty_assertions::assert_eq;
use redaction_core::redaction_types::{
    Collaborator, CollaboratorRef, NaturalRect, NaturalSize, NewRestriction, RestrictionTarget,
    Role, SessionContext,
};
use redaction_core::{
    FetchOutcome, Notice, PanelConfig, RestrictionError, RestrictionStore, ValidationError,
};

const DOC: &str = "7";

fn collaborators() -> Vec<Collaborator> {
    vec![
        Collaborator::new("42", "Ada Lovelace"),
        Collaborator::new("43", "Grace Hopper"),
    ]
}

fn admin() -> SessionContext {
    SessionContext::new("1", Role::Admin, None)
}

fn store_with(api: FakeApi) -> RestrictionStore<FakeApi> {
    let store = RestrictionStore::new(api, &PanelConfig::default()).with_session(admin());
    store.open_document(DOC, collaborators());
    store
}

fn field_restriction(field: &str, user_id: &str) -> NewRestriction {
    NewRestriction {
        target: RestrictionTarget::Field {
            name: field.to_string(),
        },
        reason: "PII".to_string(),
        collaborator: CollaboratorRef::new(user_id, "Viewer"),
    }
}

#[tokio::test]
async fn field_restriction_round_trip() {
    let store = store_with(FakeApi::new().with_document(DOC, collaborators()));

    store
        .create_restriction(DOC, &field_restriction("Full Name", "42"))
        .await
        .unwrap();

    let fields = store.field_restrictions();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].restriction.field(), "Full Name");
    assert_eq!(fields[0].restriction.reason, "PII");
    assert_eq!(fields[0].collaborator_name, "Ada Lovelace");
    assert!(store.area_restrictions().is_empty());

    let stored = store.api().stored(DOC);
    assert_eq!(stored[0].width, Some(0.0));
    assert_eq!(
        store.notice(),
        Some(Notice::Success("Restriction added".to_string()))
    );
}

#[tokio::test]
async fn restrictions_are_split_by_target() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "42"));
    api.seed(DOC, area_record("2", "43", [10.0, 10.0, 50.0, 40.0]));
    api.seed(DOC, field_record("3", "Full Name", "43"));
    let store = store_with(api);

    store.refresh(DOC).await.unwrap();

    assert_eq!(store.restrictions().len(), 3);
    let fields: Vec<_> = store
        .field_restrictions()
        .into_iter()
        .map(|r| r.restriction.id)
        .collect();
    assert_eq!(fields, vec!["1".to_string(), "3".to_string()]);
    let areas = store.area_restrictions();
    assert_eq!(areas.len(), 1);
    assert_eq!(
        areas[0].restriction.target.area(),
        Some(NaturalRect::new(10.0, 10.0, 50.0, 40.0))
    );
    assert_eq!(areas[0].collaborator_name, "Grace Hopper");
}

#[tokio::test]
async fn concurrent_double_delete() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "42"));
    api.seed(DOC, field_record("2", "Full Name", "42"));
    let store = store_with(api);
    store.refresh(DOC).await.unwrap();

    let (first, second) = futures::join!(
        store.remove_restriction(DOC, "1"),
        store.remove_restriction(DOC, "1")
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(RestrictionError::NotFound(_))))
            .count(),
        1
    );

    let ids: Vec<_> = store
        .restrictions()
        .into_iter()
        .map(|r| r.restriction.id)
        .collect();
    assert_eq!(ids, vec!["2".to_string()]);
    assert_eq!(store.api().stored(DOC).len(), 1);
}

#[tokio::test]
async fn deleting_a_missing_restriction_refetches() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "42"));
    let store = store_with(api);

    let err = store.remove_restriction(DOC, "99").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.api().count_calls("LIST"), 1);
    assert_eq!(store.restrictions().len(), 1);
    assert!(matches!(store.notice(), Some(Notice::Error(msg)) if msg.contains("already removed")));
}

#[tokio::test]
async fn invalid_input_never_reaches_the_server() {
    let store = store_with(FakeApi::new().with_document(DOC, collaborators()));

    let mut blank_reason = field_restriction("SSN", "42");
    blank_reason.reason = "   ".to_string();
    let err = store.create_restriction(DOC, &blank_reason).await.unwrap_err();
    assert_eq!(
        err,
        RestrictionError::Validation(ValidationError::MissingReason)
    );

    store.set_image_size(NaturalSize::new(100.0, 100.0));
    let outside = NewRestriction {
        target: RestrictionTarget::Area {
            rect: NaturalRect::new(50.0, 50.0, 100.0, 100.0),
        },
        reason: "stamp".to_string(),
        collaborator: CollaboratorRef::new("42", "Viewer"),
    };
    let err = store.create_restriction(DOC, &outside).await.unwrap_err();
    assert_eq!(
        err,
        RestrictionError::Validation(ValidationError::AreaOutOfBounds)
    );

    assert_eq!(store.api().count_calls("CREATE"), 0);
}

#[tokio::test]
async fn area_is_refused_until_the_image_size_is_known() {
    let store = store_with(FakeApi::new().with_document(DOC, collaborators()));
    // a 0x0 image counts as not loaded
    store.set_image_size(NaturalSize::new(0.0, 0.0));

    let area = NewRestriction {
        target: RestrictionTarget::Area {
            rect: NaturalRect::new(100.0, 50.0, 200.0, 150.0),
        },
        reason: "Signature".to_string(),
        collaborator: CollaboratorRef::new("42", "Viewer"),
    };
    let err = store.create_restriction(DOC, &area).await.unwrap_err();

    assert_eq!(
        err,
        RestrictionError::Validation(ValidationError::ImageNotLoaded)
    );
    assert_eq!(store.api().count_calls("CREATE"), 0);
    assert!(store.api().stored(DOC).is_empty());
}

#[tokio::test]
async fn failed_fetch_keeps_previous_list() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "42"));
    let store = store_with(api);
    assert_eq!(
        store.fetch_restrictions(DOC).await.unwrap(),
        FetchOutcome::Applied(1)
    );

    store.api().fail_next_list.set(true);
    let err = store.fetch_restrictions(DOC).await.unwrap_err();

    assert!(matches!(err, RestrictionError::Server { status: 500, .. }));
    assert_eq!(store.restrictions().len(), 1);
    assert!(matches!(store.notice(), Some(Notice::Error(_))));
}

#[tokio::test]
async fn failed_create_changes_nothing() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "42"));
    api.fail_creates.set(true);
    let store = store_with(api);
    store.refresh(DOC).await.unwrap();
    let lists_before = store.api().count_calls("LIST");

    let err = store
        .create_restriction(DOC, &field_restriction("Full Name", "42"))
        .await
        .unwrap_err();

    assert!(matches!(err, RestrictionError::Network(_)));
    assert_eq!(store.restrictions().len(), 1);
    assert_eq!(store.api().count_calls("LIST"), lists_before);
    assert!(matches!(store.take_notice(), Some(Notice::Error(_))));
    assert_eq!(store.notice(), None);
}

#[tokio::test]
async fn unknown_collaborator_gets_placeholder_name() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "999"));
    let store = store_with(api);

    store.refresh(DOC).await.unwrap();

    assert_eq!(store.restrictions()[0].collaborator_name, "Unknown User");
}

#[tokio::test]
async fn document_collaborators_replace_initial_list() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "43"));
    let store = RestrictionStore::new(api, &PanelConfig::default());
    store.open_document(DOC, Vec::new());

    store.refresh(DOC).await.unwrap();

    assert_eq!(store.collaborators().len(), 2);
    assert_eq!(store.restrictions()[0].collaborator_name, "Grace Hopper");
    assert_eq!(
        store.field_names(),
        vec!["Full Name".to_string(), "SSN".to_string()]
    );
}

#[tokio::test]
async fn stale_list_is_dropped_after_switching_documents() {
    let api = FakeApi::new();
    api.seed("A", field_record("1", "SSN", "42"));
    api.seed("B", field_record("2", "Full Name", "42"));
    let release_a = api.gate_list("A");
    let store = RestrictionStore::new(api, &PanelConfig::default());
    store.open_document("A", collaborators());

    let (a, b) = futures::join!(store.fetch_restrictions("A"), async {
        store.open_document("B", collaborators());
        let _ = release_a.send(());
        store.fetch_restrictions("B").await
    });

    assert_eq!(a.unwrap(), FetchOutcome::Stale);
    assert_eq!(b.unwrap(), FetchOutcome::Applied(1));
    assert_eq!(store.active_document().as_deref(), Some("B"));
    let ids: Vec<_> = store
        .restrictions()
        .into_iter()
        .map(|r| r.restriction.id)
        .collect();
    assert_eq!(ids, vec!["2".to_string()]);
}

#[tokio::test]
async fn create_finishing_after_a_switch_leaves_the_new_document_alone() {
    let api = FakeApi::new();
    api.seed("B", field_record("2", "Full Name", "43"));
    let release_create = api.hold("CREATE", "A");
    let store = RestrictionStore::new(api, &PanelConfig::default()).with_session(admin());
    store.open_document("A", collaborators());

    let ssn_restriction = field_restriction("SSN", "42");
    let (created, opened) = futures::join!(
        store.create_restriction("A", &ssn_restriction),
        async {
            store.open_document("B", collaborators());
            let _ = release_create.send(());
            store.fetch_restrictions("B").await
        }
    );

    assert_eq!(created, Ok(FetchOutcome::Stale));
    assert_eq!(opened, Ok(FetchOutcome::Applied(1)));
    assert_eq!(store.api().count_calls("LIST A"), 0);
    assert_eq!(store.api().stored("A").len(), 1);
    assert_eq!(store.active_document().as_deref(), Some("B"));
    assert_eq!(store.notice(), None);
    assert_eq!(store.restrictions()[0].restriction.id, "2");
}

#[tokio::test]
async fn delete_finishing_after_a_switch_is_stale() {
    let api = FakeApi::new();
    api.seed("A", field_record("1", "SSN", "42"));
    let release_delete = api.hold("DELETE", "A");
    let store = RestrictionStore::new(api, &PanelConfig::default()).with_session(admin());
    store.open_document("A", collaborators());

    let (removed, ()) = futures::join!(store.remove_restriction("A", "1"), async {
        store.open_document("B", collaborators());
        let _ = release_delete.send(());
    });

    assert_eq!(removed, Ok(FetchOutcome::Stale));
    assert_eq!(store.api().count_calls("LIST"), 0);
    assert!(store.api().stored("A").is_empty());
    assert_eq!(store.notice(), None);
    assert!(store.restrictions().is_empty());
}

#[tokio::test]
async fn missing_document_is_reported_as_such() {
    let store = store_with(FakeApi::new());

    let err = store.fetch_document(DOC).await.unwrap_err();

    assert_eq!(err, RestrictionError::DocumentNotFound(DOC.to_string()));
    assert_eq!(
        store.notice(),
        Some(Notice::Error("This document could not be found.".to_string()))
    );
}

#[tokio::test]
async fn viewers_cannot_mutate() {
    let api = FakeApi::new().with_document(DOC, collaborators());
    api.seed(DOC, field_record("1", "SSN", "42"));
    let store = RestrictionStore::new(api, &PanelConfig::default())
        .with_session(SessionContext::new("5", Role::Viewer, None));
    store.open_document(DOC, collaborators());

    let create = store
        .create_restriction(DOC, &field_restriction("SSN", "42"))
        .await;
    let remove = store.remove_restriction(DOC, "1").await;

    assert_eq!(create, Err(RestrictionError::Forbidden));
    assert_eq!(remove, Err(RestrictionError::Forbidden));
    assert_eq!(store.api().count_calls("CREATE"), 0);
    assert_eq!(store.api().count_calls("DELETE"), 0);
    assert_eq!(store.api().stored(DOC).len(), 1);
}
