//! Shared handler helpers: pagination and response mapping

use serde::{Deserialize, Serialize};

use lyceum_db::{CourseRow, LessonRow, PaymentRow};
use lyceum_catalog_core::CourseDetail;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Largest page a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page-number pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Resolve to a (limit, offset) pair, clamping the page size to
    /// [1, MAX_PAGE_SIZE] and the page number to >= 1
    pub fn limit_offset(&self) -> (i64, i64) {
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1).max(1);
        (page_size, (page - 1) * page_size)
    }

    /// The resolved page number
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of results
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub results: Vec<T>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub id: String,
    pub course: String,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
    pub owner: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub owner: Option<String>,
    pub last_updated: Option<String>,
    pub lesson_count: i64,
    pub lessons: Vec<LessonResponse>,
    pub is_subscribed: bool,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub amount: i64,
    pub date: String,
    pub paid_course: Option<String>,
    pub paid_lesson: Option<String>,
    pub payment_method: String,
    pub stripe_session_id: Option<String>,
    pub payment_url: Option<String>,
}

pub fn lesson_to_response(lesson: LessonRow) -> LessonResponse {
    LessonResponse {
        id: lesson.id.to_string(),
        course: lesson.course_id.to_string(),
        title: lesson.title,
        description: lesson.description,
        preview: lesson.preview,
        video_url: lesson.video_url,
        owner: lesson.owner_id.map(|o| o.to_string()),
        created_at: lesson.created_at.to_rfc3339(),
    }
}

pub fn course_row_to_response(course: CourseRow) -> CourseResponse {
    CourseResponse {
        id: course.id.to_string(),
        title: course.title,
        description: course.description,
        preview: course.preview,
        owner: course.owner_id.map(|o| o.to_string()),
        last_updated: course.last_updated.map(|t| t.to_rfc3339()),
        lesson_count: 0,
        lessons: Vec::new(),
        is_subscribed: false,
    }
}

pub fn course_detail_to_response(detail: CourseDetail) -> CourseResponse {
    let mut response = course_row_to_response(detail.course);
    response.lesson_count = detail.lesson_count;
    response.lessons = detail.lessons.into_iter().map(lesson_to_response).collect();
    response.is_subscribed = detail.is_subscribed;
    response
}

pub fn payment_to_response(payment: PaymentRow) -> PaymentResponse {
    PaymentResponse {
        id: payment.id.to_string(),
        amount: payment.amount,
        date: payment.created_at.to_rfc3339(),
        paid_course: payment.paid_course_id.map(|c| c.to_string()),
        paid_lesson: payment.paid_lesson_id.map(|l| l.to_string()),
        payment_method: payment.payment_method,
        stripe_session_id: payment.stripe_session_id,
        payment_url: payment.payment_url,
    }
}
