use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use storefront_api::{app, AppState, AuthConfig, Repositories, StateOptions};
use storefront_core::{LocalizationSettings, StoreContext};
use storefront_order::ReturnRequestSettings;
use storefront_store::{
    app_config::Config, DbClient, EventProducer, EventWorkflowMessageService,
    StoreLanguageRepository, StoreLocaleResourceRepository, StoreOrderRepository,
    StoreProductRepository, StoreReturnRequestRepository, StoreSettingRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Storefront API on port {}", config.server.port);

    // Postgres
    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    // Kafka Connection
    let kafka_producer = EventProducer::new(&config.kafka.brokers)
        .context("Failed to create Kafka producer")?;

    let repos = Repositories {
        products: Arc::new(StoreProductRepository::new(db.pool.clone())),
        orders: Arc::new(StoreOrderRepository::new(db.pool.clone())),
        return_requests: Arc::new(StoreReturnRequestRepository::new(db.pool.clone())),
        settings: Arc::new(StoreSettingRepository::new(db.pool.clone())),
        locale_resources: Arc::new(StoreLocaleResourceRepository::new(db.pool.clone())),
        languages: Arc::new(StoreLanguageRepository::new(db.pool.clone())),
        messages: Arc::new(EventWorkflowMessageService::new(
            Arc::new(kafka_producer),
            config.kafka.notification_topic.clone(),
        )),
    };

    let options = StateOptions {
        store: StoreContext::new(config.store.id.clone(), config.store.url.clone()),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        localization: LocalizationSettings {
            default_admin_language_id: config.localization.default_admin_language_id.clone(),
            default_language_id: config.localization.default_language_id.clone(),
        },
        returns: ReturnRequestSettings {
            enabled: config.returns.enabled,
            days_limit: config.returns.days_limit,
        },
    };

    let app_state = AppState::build(repos, options)
        .await
        .context("Failed to initialise plugins")?;

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
