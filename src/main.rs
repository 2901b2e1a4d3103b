//! Build Bridge - coding project mentor chat
//!
//! Serves a single chat page and forwards each user turn to a hosted
//! Mistral agent, keeping one remote conversation per browser session.

mod agent;
mod api;
mod dispatch;
mod render;
mod secrets;
mod session;

use agent::{AgentClient, LoggingClient, MistralClient};
use api::{create_router, AppState};
use secrets::{SecretStore, Secrets};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "build_bridge=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Secrets: no UI without both of them
    let store = SecretStore::from_env();
    let secrets = match Secrets::resolve(&store) {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::error!(error = %e, "Startup halted");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let port: u16 = std::env::var("BRIDGE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8501);

    let base_url = std::env::var("MISTRAL_API_BASE").ok();
    let mistral = MistralClient::new(secrets.api_key.clone(), base_url.as_deref())?;
    let client: Arc<dyn AgentClient> = Arc::new(LoggingClient::new(Arc::new(mistral)));

    tracing::info!(
        agent_id = %secrets.agent_id,
        base_url = base_url.as_deref().unwrap_or(agent::DEFAULT_BASE_URL),
        "Agent client initialized"
    );

    let state = AppState::new(client, secrets.agent_id.as_str());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Build Bridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
