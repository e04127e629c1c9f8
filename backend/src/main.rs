use axum::{http::Method, middleware as axum_middleware, routing::post, Router};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate_backend::{
    config::Config,
    db::connection::{create_pool, DbPool},
    handlers,
    middleware::auth as auth_middleware,
    utils::jwt::TokenCodec,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        app_name = %config.app_name,
        app_secret = %mask_secret(&config.app_secret),
        token_ttl_hours = config.token_ttl_hours,
        refresh_token_ttl_hours = config.refresh_token_ttl_hours,
        "Loaded configuration from environment/.env"
    );

    let codec = TokenCodec::from_config(&config)?;

    // Initialize database
    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Build public routes (no auth)
    let public_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Routes gated on a live access token
    let session_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route_layer(axum_middleware::from_fn_with_state(
            (pool.clone(), codec.clone()),
            auth_middleware::auth,
        ));

    // The refresh endpoint is gated on the refresh token instead
    let refresh_routes = Router::new()
        .route("/api/auth/refresh-token", post(handlers::auth::refresh_token))
        .route_layer(axum_middleware::from_fn_with_state(
            (pool.clone(), codec.clone()),
            auth_middleware::auth_refresh,
        ));

    // Compose app with shared layers (CORS/Trace) and shared state
    let app = Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(refresh_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state((pool, codec));

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
