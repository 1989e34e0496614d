// In crates/web-server/src/lib.rs

use analytics::{daily_totals, streaks, MetricsEngine, MetricsQuery, MetricsResult};
use app_config::{ReportSettings, Settings};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::net::TcpListener;
use types::{CalendarRequest, CalendarResponse, MetricsRequest};

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MetricsEngine>,
    pub report: ReportSettings,
}

impl AppState {
    pub fn new(engine: MetricsEngine, report: ReportSettings) -> Self {
        Self {
            engine: Arc::new(engine),
            report,
        }
    }
}

/// Creates the main application router with all routes and middleware.
pub fn create_router(app_state: AppState) -> Router {
    // The dashboard is served from a different origin.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let api_router = Router::new()
        .route("/metrics", post(metrics_handler))
        .route("/calendar", post(calendar_handler));

    Router::new()
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// The handler for `POST /api/metrics`.
///
/// The calculation is CPU-bound and runs on the blocking pool.
async fn metrics_handler(
    State(state): State<AppState>,
    Json(mut request): Json<MetricsRequest>,
) -> Result<Json<MetricsResult>> {
    request.snapshot.validate()?;
    request.snapshot.canonicalize_dates();

    let active = request.snapshot.select_accounts(request.active_account_ids.as_deref());
    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let mut query = MetricsQuery::new(active, as_of);
    query.granularity = request.granularity(state.report.default_granularity)?;
    query.locale = request.locale(state.report.default_locale)?;
    query.window = request.window;

    tracing::info!(
        trades = request.snapshot.trades.len(),
        granularity = %query.granularity,
        %as_of,
        "Computing metrics."
    );

    let engine = state.engine.clone();
    let result =
        tokio::task::spawn_blocking(move || engine.calculate(&request.snapshot, &query)).await?;
    Ok(Json(result))
}

/// The handler for `POST /api/calendar`.
async fn calendar_handler(
    Json(mut request): Json<CalendarRequest>,
) -> Result<Json<CalendarResponse>> {
    request.snapshot.validate()?;
    request.snapshot.canonicalize_dates();

    let active = request.snapshot.select_accounts(request.active_account_ids.as_deref());
    let days = daily_totals(
        request
            .snapshot
            .trades
            .iter()
            .filter(|t| active.contains(&t.account_id)),
    );
    let streaks = streaks(days.values().copied());
    Ok(Json(CalendarResponse { days, streaks }))
}

/// The main entry point for running the web server.
///
/// It will run forever until the process is terminated.
pub async fn run(settings: Settings) -> Result<()> {
    let app_state = AppState::new(MetricsEngine::new(settings.metrics), settings.report);
    let app = create_router(app_state);

    let address = settings.server.address();
    tracing::info!("Web server listening on {}", address);

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServeError)?;

    Ok(())
}
