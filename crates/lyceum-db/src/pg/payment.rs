//! PostgreSQL payment repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::PaymentRow;
use crate::repo::{CreatePayment, DateOrder, PaymentFilter, PaymentRepository};

/// PostgreSQL payment repository
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PaymentRow>> {
        let payment = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, user_id, paid_course_id, paid_lesson_id, amount,
                   payment_method, stripe_session_id, payment_url, created_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn create(&self, payment: CreatePayment) -> DbResult<PaymentRow> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments (id, user_id, paid_course_id, paid_lesson_id,
                                  amount, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, paid_course_id, paid_lesson_id, amount,
                      payment_method, stripe_session_id, payment_url, created_at
            "#,
        )
        .bind(payment.id)
        .bind(payment.user_id)
        .bind(payment.paid_course_id)
        .bind(payment.paid_lesson_id)
        .bind(payment.amount)
        .bind(&payment.payment_method)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set_checkout_session(&self, id: Uuid, session_id: &str, url: &str) -> DbResult<()> {
        sqlx::query("UPDATE payments SET stripe_session_id = $1, payment_url = $2 WHERE id = $3")
            .bind(session_id)
            .bind(url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: PaymentFilter,
    ) -> DbResult<Vec<PaymentRow>> {
        // NULL filter binds match everything, so a single statement covers
        // every filter combination.
        let query = match filter.order {
            DateOrder::Asc => {
                r#"
                SELECT id, user_id, paid_course_id, paid_lesson_id, amount,
                       payment_method, stripe_session_id, payment_url, created_at
                FROM payments
                WHERE user_id = $1
                  AND ($2::uuid IS NULL OR paid_course_id = $2)
                  AND ($3::uuid IS NULL OR paid_lesson_id = $3)
                  AND ($4::text IS NULL OR payment_method = $4)
                ORDER BY created_at
                "#
            }
            DateOrder::Desc => {
                r#"
                SELECT id, user_id, paid_course_id, paid_lesson_id, amount,
                       payment_method, stripe_session_id, payment_url, created_at
                FROM payments
                WHERE user_id = $1
                  AND ($2::uuid IS NULL OR paid_course_id = $2)
                  AND ($3::uuid IS NULL OR paid_lesson_id = $3)
                  AND ($4::text IS NULL OR payment_method = $4)
                ORDER BY created_at DESC
                "#
            }
        };

        let payments = sqlx::query_as::<_, PaymentRow>(query)
            .bind(user_id)
            .bind(filter.paid_course_id)
            .bind(filter.paid_lesson_id)
            .bind(&filter.payment_method)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }
}
