//! Payment service
//!
//! Orchestrates payment creation: the payment row is persisted (with its
//! user) before the first gateway call, so a gateway failure always leaves
//! an attributable audit row without session data. No retries here;
//! retrying is the caller's responsibility.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use lyceum_db::{
    CourseRepository, CreatePayment, LessonRepository, PaymentFilter, PaymentRepository,
    PaymentRow,
};
use lyceum_types::{Actor, CourseId, LessonId, PaymentId, PaymentMethod};

use crate::{BillingError, PaymentProvider};

/// Input for the payment creation workflow
#[derive(Debug, Clone)]
pub struct CreatePaymentRequest {
    pub paid_course_id: Option<CourseId>,
    pub paid_lesson_id: Option<LessonId>,
    pub amount: i64,
    pub payment_method: PaymentMethod,
}

/// Payment service
pub struct PaymentService<P, C, L, G> {
    payments: Arc<P>,
    courses: Arc<C>,
    lessons: Arc<L>,
    provider: G,
}

impl<P, C, L, G> PaymentService<P, C, L, G>
where
    P: PaymentRepository,
    C: CourseRepository,
    L: LessonRepository,
    G: PaymentProvider,
{
    /// Create a new payment service
    pub fn new(payments: Arc<P>, courses: Arc<C>, lessons: Arc<L>, provider: G) -> Self {
        Self {
            payments,
            courses,
            lessons,
            provider,
        }
    }

    /// Create a payment and drive the external checkout flow.
    ///
    /// Steps: validate -> persist row -> product -> price -> session ->
    /// persist session id/url. A failure in the gateway chain is surfaced
    /// after the row is persisted and never rolls it back.
    #[instrument(skip(self, req), fields(user_id = %actor.user_id))]
    pub async fn create_payment(
        &self,
        actor: &Actor,
        req: CreatePaymentRequest,
    ) -> Result<PaymentRow, BillingError> {
        if req.amount <= 0 {
            return Err(BillingError::InvalidAmount);
        }

        // Resolve the paid item's title up front; exactly one target.
        let product_name = match (req.paid_course_id, req.paid_lesson_id) {
            (Some(course_id), None) => self
                .courses
                .find_by_id(course_id.0)
                .await?
                .ok_or(BillingError::CourseNotFound)?
                .title,
            (None, Some(lesson_id)) => self
                .lessons
                .find_by_id(lesson_id.0)
                .await?
                .ok_or(BillingError::LessonNotFound)?
                .title,
            _ => return Err(BillingError::InvalidPaymentTarget),
        };

        let row = self
            .payments
            .create(CreatePayment {
                id: PaymentId::new().0,
                user_id: actor.user_id.0,
                paid_course_id: req.paid_course_id.map(|c| c.0),
                paid_lesson_id: req.paid_lesson_id.map(|l| l.0),
                amount: req.amount,
                payment_method: req.payment_method.to_string(),
            })
            .await?;

        let session = match self.checkout_chain(&product_name, req.amount).await {
            Ok(session) => session,
            Err(e) => {
                warn!(payment_id = %row.id, error = %e,
                    "gateway chain failed; payment row kept without session");
                return Err(e);
            }
        };

        self.payments
            .set_checkout_session(row.id, &session.session_id, &session.url)
            .await?;

        info!(payment_id = %row.id, session_id = %session.session_id, "Checkout session created");

        let mut row = row;
        row.stripe_session_id = Some(session.session_id);
        row.payment_url = Some(session.url);
        Ok(row)
    }

    /// List a user's payments with optional filters
    pub async fn list_payments(
        &self,
        actor: &Actor,
        filter: PaymentFilter,
    ) -> Result<Vec<PaymentRow>, BillingError> {
        Ok(self.payments.list_by_user(actor.user_id.0, filter).await?)
    }

    // Product -> price -> session, each step feeding the next.
    async fn checkout_chain(
        &self,
        product_name: &str,
        amount: i64,
    ) -> Result<lyceum_types::CheckoutSession, BillingError> {
        let product_id = self.provider.create_product(product_name).await?;
        // Gateway prices are in minor units; amounts are stored in whole
        // units of a two-decimal currency.
        let price_id = self.provider.create_price(&product_id, amount * 100).await?;
        self.provider.create_checkout_session(&price_id).await
    }
}
