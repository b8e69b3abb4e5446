use std::sync::Arc;

use concierge::concierge::{Concierge, ConciergeDeps};
use concierge::config::Config;
use concierge::dialogue::DialogueEngine;
use concierge::routes::concierge_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Warning: a rustls crypto provider was already installed");
    }

    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, using process environment");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    eprintln!("🛎️  Concierge v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Profile: {}", config.profile);
    eprintln!("   Webhook: http://0.0.0.0:{}/bot", config.port);
    eprintln!("   Broadcast: http://0.0.0.0:{}/broadcast?msg=...", config.port);
    eprintln!("   Known senders: {}", config.users_path.display());
    eprintln!("   Guest ledger: {}", config.ledger_path.display());
    if config.provider.manager_number.is_none() {
        eprintln!("   Manager alerts: log only (MANAGER_WHATSAPP_NUMBER not set)");
    }
    if config.mail.recipients.is_empty() {
        eprintln!("   Email: disabled (MANAGER_EMAIL not set)");
    }
    eprintln!();

    let engine = DialogueEngine::new(config.profile);
    let concierge = Arc::new(Concierge::new(engine, ConciergeDeps::from_config(&config)).await);
    let app = concierge_routes(concierge);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, profile = %config.profile, "Concierge server started");
    axum::serve(listener, app).await?;

    Ok(())
}
