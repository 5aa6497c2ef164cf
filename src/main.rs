use std::future::Future;
use std::sync::Arc;

use baas_admin::adapters::http::{build_router, AppComponents, RouterSettings};
use baas_admin::adapters::{
    FanOut, InMemoryDocumentStore, InMemoryIdentityProvider, InMemoryObjectStorage, JwtConfig,
    JwtTokenVerifier,
};
use baas_admin::config::{AppConfig, LogFormat, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let components = components(&config);
    let app = build_router(components, RouterSettings::from_config(&config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        bucket = %config.storage.bucket,
        "Admin gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

fn components(config: &AppConfig) -> AppComponents {
    let jwt = JwtConfig {
        secret: config.auth.jwt_secret.clone(),
        issuer: config.auth.issuer.clone(),
        audience: config.auth.audience.clone(),
        leeway_secs: config.auth.leeway_secs,
    };

    AppComponents {
        documents: Arc::new(InMemoryDocumentStore::new()),
        identity: Arc::new(InMemoryIdentityProvider::new()),
        storage: Arc::new(InMemoryObjectStorage::new(
            config.storage.bucket.clone(),
            config.storage.public_base_url.clone(),
            config.storage.signing_secret.clone(),
        )),
        verifier: Arc::new(JwtTokenVerifier::new(&jwt)),
        fanout: Arc::new(FanOut::new(config.realtime.subscriber_buffer)),
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires. If the handler cannot be installed this
/// never resolves, so the server keeps running until killed.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Graceful shutdown initiated");
}
