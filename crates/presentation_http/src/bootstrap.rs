//! Wires configuration into adapters and services
//!
//! The in-system channel and the keyword fallback are always present. The
//! hosted classifier, the WhatsApp and e-mail channels and SQLite persistence
//! are each enabled only when their configuration is complete.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{
    AnalyzeTagsService, CustomerProfileStore, FallbackTagger, InferencePort, LlmTagClassifier,
    NotificationService, TaggingService,
};
use infrastructure::{
    AppConfig, DEFAULT_INBOX_CAPACITY, GroqInferenceAdapter, InMemoryAnalysisHistory,
    InMemoryCustomerProfileStore, InSystemNotificationAdapter, SmtpNotificationAdapter,
    SqliteCustomerProfileStore, WhatsAppAppConfig, WhatsAppNotificationAdapter, create_pool,
};
use tracing::info;

use crate::state::AppState;

/// Build the shared application state from configuration
///
/// Fails only when an enabled component cannot be constructed (e.g. the
/// database file cannot be opened or an SMTP section is invalid).
pub fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let config = Arc::new(config);

    let inference = build_inference(&config)?;
    let tagging = build_tagging(&config, inference.clone());

    let inbox = Arc::new(InSystemNotificationAdapter::new(DEFAULT_INBOX_CAPACITY));
    let notifications = build_notifications(&config, Arc::clone(&inbox))?;

    let profiles = build_profile_store(&config)?;
    let history = Arc::new(InMemoryAnalysisHistory::new(config.tagging.history_capacity));

    let analyze_tags = AnalyzeTagsService::new(tagging, notifications, profiles, history)
        .with_targets(config.notifications.targets());

    Ok(AppState {
        analyze_tags: Arc::new(analyze_tags),
        inference,
        inbox,
        config,
    })
}

fn build_inference(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn InferencePort>>> {
    if !config.classifier_enabled() {
        return Ok(None);
    }

    let adapter = GroqInferenceAdapter::new(config.inference.clone())
        .context("Failed to initialize inference adapter")?
        .with_retry(config.retry.to_retry_config());

    info!(model = %config.inference.default_model, "Hosted classifier enabled");
    Ok(Some(Arc::new(adapter)))
}

fn build_tagging(config: &AppConfig, inference: Option<Arc<dyn InferencePort>>) -> TaggingService {
    let fallback = FallbackTagger::with_confidence(config.tagging.fallback_confidence);
    let tagging = TaggingService::new(fallback);

    match inference {
        Some(inference) => {
            let mut classifier = LlmTagClassifier::new(inference);
            if let Some(ms) = config.tagging.classifier_timeout_ms {
                classifier = classifier.with_timeout(Duration::from_millis(ms));
            }
            tagging.with_classifier(Arc::new(classifier))
        },
        None => tagging,
    }
}

fn build_notifications(
    config: &AppConfig,
    inbox: Arc<InSystemNotificationAdapter>,
) -> anyhow::Result<NotificationService> {
    let mut service = NotificationService::new(inbox);
    let settings = &config.notifications;

    if let Some(client_config) = settings
        .whatsapp
        .as_ref()
        .and_then(WhatsAppAppConfig::to_client_config)
    {
        let adapter = WhatsAppNotificationAdapter::new(client_config)
            .context("Failed to initialize WhatsApp channel")?;
        service = service.with_transport(Arc::new(adapter));
        info!("WhatsApp alert channel enabled");
    }

    if let Some(email) = &settings.email {
        let adapter = SmtpNotificationAdapter::new(email.to_smtp_config())
            .context("Failed to initialize e-mail channel")?;
        service = service.with_transport(Arc::new(adapter));
        info!(host = %email.smtp_host, "E-mail alert channel enabled");
    }

    Ok(service)
}

fn build_profile_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CustomerProfileStore>> {
    match &config.database {
        Some(database) => {
            let pool = create_pool(database).context("Failed to open database")?;
            info!(path = %database.path, "SQLite customer profile store enabled");
            Ok(Arc::new(SqliteCustomerProfileStore::new(Arc::new(pool))))
        },
        None => {
            info!("No database configured, customer profiles kept in memory");
            Ok(Arc::new(InMemoryCustomerProfileStore::new()))
        },
    }
}

#[cfg(test)]
mod tests {
    use domain::NotificationChannel;
    use infrastructure::{DatabaseConfig, EmailAppConfig};

    use super::*;

    #[test]
    fn default_config_runs_on_fallback_only() {
        let state = build_state(AppConfig::default()).unwrap();
        assert!(state.inference.is_none());
        assert!(!state.analyze_tags.has_classifier());
    }

    #[test]
    fn api_key_enables_classifier() {
        let mut config = AppConfig::default();
        config.inference = ai_core::InferenceConfig::groq("gsk_test");

        let state = build_state(config).unwrap();
        assert!(state.analyze_tags.has_classifier());
        assert_eq!(
            state.inference.unwrap().current_model(),
            ai_core::InferenceConfig::default().default_model
        );
    }

    #[test]
    fn email_section_registers_channel() {
        let mut config = AppConfig::default();
        config.notifications.email = Some(EmailAppConfig::default());

        let service = build_notifications(&config, Arc::new(InSystemNotificationAdapter::default()))
            .unwrap();
        assert!(service.has_channel(NotificationChannel::Email));
        assert!(!service.has_channel(NotificationChannel::WhatsApp));
    }

    #[test]
    fn database_section_opens_sqlite() {
        let mut config = AppConfig::default();
        config.database = Some(DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        });
        assert!(build_state(config).is_ok());
    }
}
