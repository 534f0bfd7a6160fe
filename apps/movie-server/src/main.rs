use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use movie_api::{build_router, AppState};
use movie_core::services::{AuthService, SeedService};
use movie_infrastructure::{create_pool, run_migrations, PgMovieRepository, PgReviewRepository, PgUserRepository};
use movie_security::JwtService;
use movie_shared::config::{AppConfig, SecuritySettings};

const LOGIN_LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    movie_shared::telemetry::init_telemetry();
    info!("Movie server starting...");

    let config = AppConfig::load().context("failed to load configuration")?;

    // Database
    info!(max_connections = config.database.max_connections, "Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool).await.context("failed to run migrations")?;
    info!("Database ready.");

    // Repositories & services
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let movies = Arc::new(PgMovieRepository::new(pool.clone()));
    let reviews = Arc::new(PgReviewRepository::new(pool));
    let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry));
    let auth_service = Arc::new(AuthService::new(users.clone(), jwt));

    let report = SeedService::new(auth_service.clone(), users, movies.clone())
        .run(&config.seed)
        .await
        .context("failed to seed database")?;
    info!(
        users_created = report.users_created,
        users_existing = report.users_existing,
        movies_created = report.movies_created,
        "Seeding complete"
    );

    let state = AppState::new(
        config.app.name.clone(),
        movies,
        reviews,
        auth_service,
        config.security.login_attempts_per_minute,
    );
    spawn_login_limiter_pruning(state.clone());
    let app = build_router(state).layer(cors_layer(&config.security));

    let host: std::net::IpAddr = config.app.host.parse().context("invalid app.host")?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_login_limiter_pruning(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LOGIN_LIMITER_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            state.prune_login_limiter();
        }
    });
}

fn cors_layer(security: &SecuritySettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
