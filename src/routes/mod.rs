// HTTP routes (standalone mode; under CGI the binary answers a single request on stdout)

mod http;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::metrics_repo::MetricsRepo;
use crate::version::banner;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) metrics_repo: MetricsRepo,
}

pub fn app(metrics_repo: MetricsRepo) -> Router {
    let state = AppState { metrics_repo };
    Router::new()
        .route("/", get(|| async { banner() })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route("/dashboard/metrics", get(http::metrics_handler)) // GET /dashboard/metrics
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
