use std::path::PathBuf;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use dealflow_sheets::SheetsCredentials;

#[derive(Clone)]
pub struct HealthState {
    token_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub credentials: HealthCheck,
    pub checked_at: String,
}

pub fn router(token_path: PathBuf) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { token_path })
}

pub async fn spawn(bind_address: &str, port: u16, token_path: PathBuf) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(token_path)).await {
            error!(
                event_name = "system.health.error",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let credentials = credentials_check(&state.token_path);
    let ready = credentials.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "dealflow-server runtime initialized".to_string(),
        },
        credentials,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

// A cheap local check; the sheets API itself is rate-limited and must
// not be probed on every health poll.
fn credentials_check(token_path: &std::path::Path) -> HealthCheck {
    match SheetsCredentials::load(token_path) {
        Ok(_) => HealthCheck { status: "ready", detail: "bearer token loadable".to_string() },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("credential load failed: {error}") }
        }
    }
}
