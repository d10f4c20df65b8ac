//! PostgreSQL repository implementations

mod course;
mod lesson;
mod payment;
mod subscription;
mod user;

pub use course::PgCourseRepository;
pub use lesson::PgLessonRepository;
pub use payment::PgPaymentRepository;
pub use subscription::PgSubscriptionRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub courses: PgCourseRepository,
    pub lessons: PgLessonRepository,
    pub subscriptions: PgSubscriptionRepository,
    pub payments: PgPaymentRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            courses: PgCourseRepository::new(pool.clone()),
            lessons: PgLessonRepository::new(pool.clone()),
            subscriptions: PgSubscriptionRepository::new(pool.clone()),
            payments: PgPaymentRepository::new(pool),
        }
    }
}
