//! Operational routes: liveness, readiness against the storage backend, and
//! build/runtime details of this service.

use crate::config::{DeletePolicy, StorageKind};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    storage: StorageKind,
}

#[derive(Serialize)]
struct Build {
    name: &'static str,
    version: &'static str,
}

impl Build {
    fn current() -> Self {
        Build {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInfo {
    #[serde(flatten)]
    build: Build,
    storage: StorageKind,
    delete_policy: DeletePolicy,
}

async fn health() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

/// 200 when the storage backend answers, 503 otherwise.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let storage = state.service.storage();
    match state.service.ping().await {
        Ok(()) => (StatusCode::OK, Json(Readiness { status: "ok", storage })),
        Err(e) => {
            tracing::warn!(error = %e, ?storage, "storage not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "unavailable",
                    storage,
                }),
            )
        }
    }
}

async fn version() -> Json<Build> {
    Json(Build::current())
}

async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        build: Build::current(),
        storage: state.service.storage(),
        delete_policy: state.service.delete_policy(),
    })
}

pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/info", get(info))
        .with_state(state)
}
