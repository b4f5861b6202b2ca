use axum::{
    routing::{get, post},
    Router,
};
use axum_prometheus::PrometheusMetricLayer;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cruxboard_server::config::Config;
use cruxboard_server::crux::CruxClient;
use cruxboard_server::handlers;
use cruxboard_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "cruxboard_server=info,tower_http=info".parse().unwrap()
    });

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Cruxboard Server starting...");

    // Load configuration — fatal if CRUX_API_KEY is missing.
    let config = Config::from_env().expect("Failed to load configuration");
    info!("📝 Configuration loaded");

    // One HTTP client for every outbound CrUX call. No timeout override —
    // lookups run to completion or transport failure.
    let http_client = reqwest::Client::new();
    let crux = CruxClient::new(http_client, &config.crux_api_key, &config.crux_api_base);

    // CORS: permissive in dev, restrictive in production.
    let cors = if config.is_dev {
        info!("🔓 CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!(
            "🔒 CORS: restrictive (production mode). \
             Cross-origin requests will be denied."
        );
        CorsLayer::new()
    };

    let addr = config.server_addr();

    let app_state = AppState { crux };

    // Prometheus metrics layer
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    // Build router
    let app = Router::new()
        // Health check + metrics
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        // CrUX lookup routes
        .route("/api/search", post(handlers::search::search))
        .route("/api/report", post(handlers::report::report))
        // Middleware. catch-panic turns an orchestration panic into a 500
        // instead of a dropped connection.
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer)
        .layer(cors)
        .with_state(app_state);

    // Start server
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
