//! Application state for the Catalog API service.

use std::sync::Arc;

use lyceum_auth_core::TokenService;
use lyceum_billing_core::{PaymentService, StripeProvider};
use lyceum_catalog_core::CatalogService;
use lyceum_db::pg::{
    PgCourseRepository, PgLessonRepository, PgPaymentRepository, PgSubscriptionRepository,
    PgUserRepository,
};
use lyceum_db::{DbPool, Repositories};

use crate::config::Config;

/// The catalog service over the Postgres repositories
pub type Catalog = CatalogService<
    PgCourseRepository,
    PgLessonRepository,
    PgSubscriptionRepository,
    PgUserRepository,
>;

/// The payment service over the Postgres repositories and Stripe
pub type Payments = PaymentService<
    PgPaymentRepository,
    PgCourseRepository,
    PgLessonRepository,
    StripeProvider,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog service (courses, lessons, subscriptions, notifications)
    pub catalog: Arc<Catalog>,
    /// Payment service (checkout orchestration, payment listing)
    pub payments: Arc<Payments>,
    /// Token issue/validation
    pub tokens: Arc<TokenService>,
    /// Database repositories (for direct access where no service applies)
    pub repos: Repositories,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        catalog: Catalog,
        payments: Payments,
        tokens: TokenService,
        repos: Repositories,
        pool: DbPool,
        config: Config,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            payments: Arc::new(payments),
            tokens: Arc::new(tokens),
            repos,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
