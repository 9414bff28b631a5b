use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{expenses, summary, types::health::Health};
use engine::Engine;

#[derive(Clone, Debug)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// When set, every route except `/health` requires this bearer token.
    pub api_token: Option<Arc<str>>,
}

impl ServerState {
    pub fn new(engine: Arc<Engine>, api_token: Option<String>) -> Self {
        Self {
            engine,
            api_token: api_token.map(Arc::from),
        }
    }
}

async fn auth(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    match bearer {
        Some(TypedHeader(Authorization(bearer))) if bearer.token() == expected => {
            Ok(next.run(request).await)
        }
        _ => {
            tracing::warn!("rejected unauthenticated request to {}", request.uri().path());
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/summary/today", get(summary::today))
        .route("/summary/month", get(summary::month))
        .route("/expenses", post(expenses::create))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run(state: ServerState, address: &str) {
    let listener = match tokio::net::TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {address}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
