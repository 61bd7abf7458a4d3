//! sqm-server — webhook and scheduler-tick transport for sqm-bot.
//!
//! # Routes
//!
//! | Method | Path | Trigger |
//! |--------|------|---------|
//! | `POST` | `/api/webhook`, `/api/index` | Telegram update |
//! | `GET`  | `/api/hourly_report` | cron tick |
//! | `GET`  | `/healthz` | liveness |
//!
//! Trigger routes always answer `200 OK`, whatever happened inside.

pub mod commands;
pub mod context;
pub mod handlers;
pub mod update;

pub use context::{Availability, BotContext};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Body returned by the cron route.
pub const REPORT_ACK: &str = "Report generation triggered.";

pub fn router(ctx: Arc<BotContext>) -> Router {
    Router::new()
        .route("/api/webhook", post(webhook))
        .route("/api/index", post(webhook))
        .route("/api/hourly_report", get(hourly_report))
        .route("/healthz", get(healthz))
        .with_state(ctx)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(ctx: Arc<BotContext>, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "ctrl-c handler unavailable; shutting down");
            }
        })
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn webhook(State(ctx): State<Arc<BotContext>>, body: Bytes) -> impl IntoResponse {
    handlers::invoke("webhook", handlers::handle_webhook(&ctx, &body)).await;
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn hourly_report(State(ctx): State<Arc<BotContext>>) -> impl IntoResponse {
    handlers::invoke("hourly report", handlers::handle_scheduled_report(&ctx)).await;
    (StatusCode::OK, REPORT_ACK)
}

async fn healthz() -> &'static str {
    "ok"
}
