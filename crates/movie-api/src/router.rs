//! Route table

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::handlers::{auth, health, home, movies, reviews};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/home", get(home::index))
        .route("/home/about", get(home::about))
        .route("/home/contact", get(home::contact))
        .route("/home/analytics", get(home::analytics))
        .route("/home/privacy", get(home::privacy))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/movies", get(movies::list).post(movies::create))
        .route("/movies/create", get(movies::create_form))
        .route("/movies/{id}", get(movies::details).post(reviews::submit))
        .route("/movies/{id}/edit", get(movies::edit_form).post(movies::update))
        .route(
            "/movies/{id}/delete",
            get(movies::delete_confirm).post(movies::delete),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
