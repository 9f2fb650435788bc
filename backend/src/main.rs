use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travel_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
};

/// main
///
/// Entry point: configuration, logging, shared state, then the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production settings)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise local debugging defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "travel_portal=debug,tower_http=info,axum=trace".into());

    // 3. Pretty output locally, JSON for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Portal gateway starting in {:?} mode", config.env);

    if config.dev_bypass {
        tracing::warn!("Development bypass ENABLED: visitors without a role get a mock session");
    }

    match &config.portal_upstream {
        Some(upstream) => tracing::info!("Forwarding allowed pages to {}", upstream),
        None => tracing::warn!("No PORTAL_UPSTREAM_URL; serving built-in page shells"),
    }

    // 4. Shared state: Route Table, backend client, page renderer.
    let bind_addr = config.bind_addr;
    let app_state = AppState::from_config(config)
        .expect("FATAL: Failed to build HTTP clients for backend and renderer.");

    // 5. Router and server
    let app = create_router(app_state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .expect("FATAL: Failed to bind the portal listener.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
