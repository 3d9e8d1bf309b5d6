//! Integration tests for the SQLite-backed analyze-tags pipeline
//!
//! Runs the full use case (fallback tagger, in-system alerts, history)
//! against a file database in a temporary directory.

use std::sync::Arc;

use application::{
    AnalyzeTagsService, ApplicationError, CustomerProfileStore, FallbackTagger,
    NotificationService, TaggingService,
};
use domain::{
    AnalysisRequest, CustomerId, CustomerProfile, NotificationChannel, NotificationStatus,
    ReservationId, SentimentLevel, TagName, TenantId,
};
use infrastructure::{
    DatabaseConfig, InMemoryAnalysisHistory, InSystemNotificationAdapter,
    SqliteCustomerProfileStore, create_pool,
};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    store: Arc<SqliteCustomerProfileStore>,
    inbox: Arc<InSystemNotificationAdapter>,
    service: AnalyzeTagsService,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("smart_tags.db").to_string_lossy().into_owned(),
        max_connections: 2,
        run_migrations: true,
    };
    let store = Arc::new(SqliteCustomerProfileStore::new(Arc::new(
        create_pool(&config).unwrap(),
    )));
    let inbox = Arc::new(InSystemNotificationAdapter::default());

    let service = AnalyzeTagsService::new(
        TaggingService::new(FallbackTagger::new()),
        NotificationService::new(inbox.clone()),
        store.clone(),
        Arc::new(InMemoryAnalysisHistory::new(10)),
    );

    Harness {
        _dir: dir,
        store,
        inbox,
        service,
    }
}

#[tokio::test]
async fn urgent_analysis_is_stored_and_alerted() {
    let h = harness();
    let profile = CustomerProfile::new(TenantId::new(), "Maria", "Santos", "+15550101");
    h.store.save_profile(&profile).await.unwrap();

    let request = AnalysisRequest::new(
        ReservationId::new(),
        profile.tenant_id,
        "Severe peanut allergy, carries an EpiPen",
        "Nut-free",
    )
    .with_customer(profile.id)
    .with_customer_name("Maria Santos");

    let outcome = h.service.analyze(request).await.unwrap();
    assert!(outcome.notification_triggered);
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].channel, NotificationChannel::InSystem);
    assert_eq!(h.inbox.len(), 1);
    assert_eq!(h.inbox.recent(1)[0].status(), NotificationStatus::Sent);

    let stored = h
        .service
        .customer_tags(profile.tenant_id, profile.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.sentiment(), SentimentLevel::Urgent);
    assert!(stored.has_tag(TagName::Allergies));
    assert!(stored.has_tag(TagName::DietaryRestrictions));

    let (records, total) = h.service.history(None, 5).await;
    assert_eq!(total, 1);
    assert_eq!(records[0].customer_name.as_deref(), Some("Maria Santos"));
}

#[tokio::test]
async fn unknown_customer_fails_before_alerting() {
    let h = harness();
    let request = AnalysisRequest::new(
        ReservationId::new(),
        TenantId::new(),
        "history of anaphylaxis",
        "",
    )
    .with_customer(CustomerId::new());

    let result = h.service.analyze(request).await;
    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    assert!(h.inbox.is_empty());
    assert_eq!(h.service.history(None, 5).await.1, 0);
}

#[tokio::test]
async fn customer_of_other_tenant_is_not_found() {
    let h = harness();
    let profile = CustomerProfile::new(TenantId::new(), "A", "B", "+15550102");
    h.store.save_profile(&profile).await.unwrap();

    let result = h.service.customer_tags(TenantId::new(), profile.id).await;
    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[tokio::test]
async fn analysis_without_customer_skips_persistence() {
    let h = harness();
    let request = AnalysisRequest::new(
        ReservationId::new(),
        TenantId::new(),
        "Celebrating our anniversary",
        "vegetarian",
    );

    let outcome = h.service.analyze(request).await.unwrap();
    assert!(!outcome.notification_triggered);
    assert!(outcome.analysis.has_tag(TagName::Anniversary));
    assert!(outcome.analysis.has_tag(TagName::DietaryRestrictions));
    assert_eq!(h.service.history(None, 5).await.1, 1);
}

#[tokio::test]
async fn tags_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("tags.db").to_string_lossy().into_owned(),
        max_connections: 1,
        run_migrations: true,
    };
    let profile = CustomerProfile::new(TenantId::new(), "A", "B", "+15550103");
    let analysis = FallbackTagger::new().tag("VIP guest, birthday dinner", "");

    {
        let store = SqliteCustomerProfileStore::new(Arc::new(create_pool(&config).unwrap()));
        store.save_profile(&profile).await.unwrap();
        assert!(store
            .save_tags(&profile.tenant_id, &profile.id, &analysis)
            .await
            .unwrap());
    }

    let store = SqliteCustomerProfileStore::new(Arc::new(create_pool(&config).unwrap()));
    let reloaded = store
        .get_profile(&profile.tenant_id, &profile.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.smart_tags, Some(analysis));
}
