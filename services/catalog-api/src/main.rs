//! Lyceum Catalog API
//!
//! Course-catalog backend: course/lesson CRUD, subscriptions, payments
//! and subscriber notifications.
//!
//! ## REST Endpoints
//!
//! - `GET/POST /courses`, `GET/PUT/DELETE /courses/{id}` - course CRUD
//! - `POST /lessons/create`, `GET /lessons`, `GET /lessons/{id}`,
//!   `PUT /lessons/{id}/update`, `DELETE /lessons/{id}/delete` - lesson CRUD
//! - `POST /subscription` - toggle course subscription
//! - `POST /users/register`, `POST /users/login`,
//!   `POST /users/token/refresh` - accounts and tokens
//! - `GET /users/{id}`, `PUT /users/{id}/update`,
//!   `DELETE /users/{id}/delete` - profile
//! - `GET /users/payments`, `POST /users/payments/create` - payments
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod extractors;
mod handlers;
mod scheduler;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lyceum_auth_core::TokenService;
use lyceum_billing_core::{PaymentService, StripeProvider};
use lyceum_catalog_core::CatalogService;
use lyceum_db::Repositories;
use lyceum_notify::{NotificationQueue, SmtpMailer};

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("catalog_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lyceum Catalog API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool
    let pool = lyceum_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Create repositories
    let repos = Repositories::new(pool.clone());

    // Start the notification worker
    let mailer = SmtpMailer::new(config.smtp.clone());
    let (notifications, _notify_worker) = NotificationQueue::start(mailer);

    // Create services
    let catalog = CatalogService::new(
        Arc::new(repos.courses.clone()),
        Arc::new(repos.lessons.clone()),
        Arc::new(repos.subscriptions.clone()),
        Arc::new(repos.users.clone()),
        notifications,
    )
    .with_notify_throttle(config.notify_throttle);

    let payments = PaymentService::new(
        Arc::new(repos.payments.clone()),
        Arc::new(repos.courses.clone()),
        Arc::new(repos.lessons.clone()),
        StripeProvider::new(config.billing.clone()),
    );

    let tokens = TokenService::new(config.auth.clone());

    // Spawn the daily inactive-account sweep
    let _sweep = scheduler::spawn_inactive_user_sweep(
        Arc::new(repos.users.clone()),
        config.inactive_after,
    );

    // Create application state
    let state = AppState::new(catalog, payments, tokens, repos, pool, config.clone());

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // Catalog routes
    let catalog_routes = Router::new()
        .route(
            "/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/courses/{id}",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/lessons", get(handlers::list_lessons))
        .route("/lessons/create", post(handlers::create_lesson))
        .route("/lessons/{id}", get(handlers::get_lesson))
        .route("/lessons/{id}/update", put(handlers::update_lesson))
        .route("/lessons/{id}/delete", delete(handlers::delete_lesson))
        .route("/subscription", post(handlers::toggle_subscription));

    // Account and payment routes
    let user_routes = Router::new()
        .route("/users/register", post(handlers::register))
        .route("/users/login", post(handlers::login))
        .route("/users/token/refresh", post(handlers::refresh))
        .route("/users/payments", get(handlers::list_payments))
        .route("/users/payments/create", post(handlers::create_payment))
        .route("/users/{id}", get(handlers::get_user))
        .route("/users/{id}/update", put(handlers::update_user))
        .route("/users/{id}/delete", delete(handlers::delete_user));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .merge(catalog_routes)
        .merge(user_routes)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Most catalog operations are single queries; the payment path adds a
    // gateway round-trip, hence the long tail.
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("catalog_operation_duration_seconds".to_string()),
        latency_buckets,
    )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!("users_registered_total", "Total accounts registered");
    metrics::describe_counter!(
        "users_deactivated_total",
        "Total accounts deactivated by the daily sweep"
    );
    metrics::describe_counter!(
        "subscriptions_toggled_total",
        "Total subscription toggle requests"
    );
    metrics::describe_counter!(
        "course_update_notifications_total",
        "Course/lesson updates that fanned out subscriber notifications"
    );
    metrics::describe_counter!(
        "payments_checkouts_created_total",
        "Total checkout sessions created"
    );
    metrics::describe_counter!(
        "notifications_queued_total",
        "Notification jobs enqueued for delivery"
    );
    metrics::describe_counter!(
        "notifications_sent_total",
        "Notification emails delivered"
    );
    metrics::describe_counter!(
        "notifications_failed_total",
        "Notification emails that failed to deliver"
    );
    metrics::describe_histogram!(
        "catalog_operation_duration_seconds",
        "Catalog operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
