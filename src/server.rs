use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    activity::ActivityLog, auth, config::Config, error::handle_panic, handlers, metrics,
    signals::setup_signal_handlers,
};

/// Shared state for the pricing and operator routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Config>>,
    pub activity: Arc<ActivityLog>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let activity = Arc::new(ActivityLog::new(config.activity.max_entries));
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            activity,
        }
    }
}

/// Start the pricing calculator server
///
/// This function:
/// 1. Initializes metrics
/// 2. Sets up signal handlers for graceful shutdown and config reload
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics()?);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting pricing calculator on {}", addr);
    info!(
        "Configuration: {} API keys, {} catalog plans ({}), activity log keeps {} entries",
        config.api_keys.len(),
        config.catalog.plans.len(),
        config.catalog.currency,
        config.activity.max_entries
    );
    if config.api_keys.iter().all(|k| !k.enabled) {
        warn!("No enabled API keys: operator routes will reject every request");
    }

    let state = AppState::new(config);

    // SIGTERM, SIGINT for shutdown; SIGHUP for reload
    let (shutdown_tx, signal_handle) = setup_signal_handlers(state.config.clone(), config_path)?;
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, metrics_handle: Arc<PrometheusHandle>) -> Router {
    let server_config = state.config.load().server.clone();

    // Operator routes require an API key
    let admin_routes = Router::new()
        .route("/admin/calculations", get(handlers::admin::list_calculations))
        .route("/admin/purchases", get(handlers::admin::list_purchases))
        .route("/admin/summary", get(handlers::admin::summary))
        .route(
            "/api/checkout/complete",
            post(handlers::checkout::complete_checkout),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth::auth_middleware,
        ))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/api/calculate-pricing",
            post(handlers::calculate::calculate_pricing),
        )
        .route("/api/catalog", get(handlers::checkout::get_catalog))
        .route("/api/checkout/quote", post(handlers::checkout::quote_checkout))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(server_config.max_body_bytes))
        .layer(cors_layer(&server_config.cors_allowed_origins))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when the list is empty, otherwise only the listed ones
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
