//! Frame Solver HTTP Server
//!
//! Solves run on tokio's blocking pool, at most `MAX_CONCURRENT_SOLVES` at a
//! time. A solve still running after `SOLVE_TIMEOUT_SECS` gets a 504 and is
//! flagged for cancellation; it releases its worker and pool slot at the next
//! stage boundary, so an in-progress factorization still finishes first.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};

use frame_solver::prelude::*;
use frame_solver::results::NodeDisplacements;
use frame_solver::solve_cancellable;

#[derive(Debug, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
    max_concurrent_solves: usize,
    solve_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", 8086)?;
        let default_workers = std::thread::available_parallelism().map_or(1, |n| n.get());
        let max_concurrent_solves = env_or("MAX_CONCURRENT_SOLVES", default_workers)?.max(1);
        let solve_timeout = Duration::from_secs(env_or("SOLVE_TIMEOUT_SECS", 30)?);
        Ok(Self {
            host,
            port,
            max_concurrent_solves,
            solve_timeout,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

struct AppState {
    permits: Arc<Semaphore>,
    solve_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct SolveRequest {
    model: Model,
    #[serde(default)]
    options: SolveOptions,
}

#[derive(Debug, Serialize)]
struct SolveResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    displacements: Option<BTreeMap<String, NodeDisplacements>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SolveSummary>,
}

impl SolveResponse {
    fn solved(result: SolveResult) -> Self {
        Self {
            success: true,
            error: None,
            summary: Some(result.summary()),
            displacements: Some(result.displacements),
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            displacements: None,
            summary: None,
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn solve(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SolveRequest>,
) -> (StatusCode, Json<SolveResponse>) {
    let permit = match state.permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(SolveResponse::failed(e)),
            )
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let task = tokio::task::spawn_blocking({
        let cancel = Arc::clone(&cancel);
        move || {
            let _permit = permit;
            solve_cancellable(&request.model, &request.options, &cancel)
        }
    });

    match tokio::time::timeout(state.solve_timeout, task).await {
        Ok(Ok(Ok(result))) => (StatusCode::OK, Json(SolveResponse::solved(result))),
        Ok(Ok(Err(e))) => {
            let status = match e {
                FrameError::SingularMatrix { .. } | FrameError::IllConditioned { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::BAD_REQUEST,
            };
            (status, Json(SolveResponse::failed(e)))
        }
        Ok(Err(join_error)) => {
            log::error!("solve task failed: {}", join_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SolveResponse::failed(join_error)),
            )
        }
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            log::warn!("solve exceeded {:?}; cancelling", state.solve_timeout);
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(SolveResponse::failed(format!(
                    "solve exceeded {} s",
                    state.solve_timeout.as_secs()
                ))),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState {
        permits: Arc::new(Semaphore::new(config.max_concurrent_solves)),
        solve_timeout: config.solve_timeout,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/solve", post(solve))
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    log::info!("Frame Solver Server listening on http://{}", addr);
    log::info!("  Health check: GET  /health");
    log::info!("  Solve:        POST /api/v1/solve");
    log::info!(
        "  {} concurrent solves, {} s deadline",
        config.max_concurrent_solves,
        config.solve_timeout.as_secs()
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
