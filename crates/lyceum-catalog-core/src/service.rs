//! Catalog service
//!
//! Course/lesson CRUD behind the authorization policy, the subscription
//! toggle, and the per-course notification throttle: an update outside the
//! throttle window advances `last_updated` and fans one email job out per
//! active subscriber; an update inside the window only persists.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

use lyceum_db::{
    CourseRepository, CourseRow, CreateCourse, CreateLesson, CreateSubscription, DbError,
    LessonRepository, LessonRow, SubscriptionRepository, UpdateCourse, UpdateLesson,
    UserRepository,
};
use lyceum_notify::{CourseUpdateEmail, NotificationQueue};
use lyceum_types::{Actor, CourseId, LessonId, SubscriptionChange, SubscriptionId};

use crate::{policy, validate, CatalogError};

/// Minimum interval between notification fan-outs for one course
pub fn default_notify_throttle() -> Duration {
    Duration::hours(4)
}

/// Input for course creation
#[derive(Debug, Clone)]
pub struct CreateCourseInput {
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
}

/// Input for lesson creation
#[derive(Debug, Clone)]
pub struct CreateLessonInput {
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
}

/// A course with its read-model extras
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: CourseRow,
    pub lessons: Vec<LessonRow>,
    pub lesson_count: i64,
    pub is_subscribed: bool,
}

/// Result of a course update
#[derive(Debug, Clone)]
pub struct CourseUpdateOutcome {
    pub course: CourseRow,
    /// Whether subscriber notifications were fanned out
    pub notified: bool,
}

/// Result of a lesson update
#[derive(Debug, Clone)]
pub struct LessonUpdateOutcome {
    pub lesson: LessonRow,
    /// Whether subscriber notifications were fanned out
    pub notified: bool,
}

/// One page of a listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Decide whether an update qualifies for subscriber notification.
///
/// A course that was never notified qualifies immediately; otherwise the
/// elapsed time must reach the throttle window.
fn should_notify(
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    match last_updated {
        None => true,
        Some(last) => now - last >= window,
    }
}

/// Catalog service
pub struct CatalogService<C, L, S, U> {
    courses: Arc<C>,
    lessons: Arc<L>,
    subscriptions: Arc<S>,
    users: Arc<U>,
    notifications: NotificationQueue,
    notify_throttle: Duration,
}

impl<C, L, S, U> CatalogService<C, L, S, U>
where
    C: CourseRepository,
    L: LessonRepository,
    S: SubscriptionRepository,
    U: UserRepository,
{
    /// Create a new catalog service with the default 4-hour throttle
    pub fn new(
        courses: Arc<C>,
        lessons: Arc<L>,
        subscriptions: Arc<S>,
        users: Arc<U>,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            courses,
            lessons,
            subscriptions,
            users,
            notifications,
            notify_throttle: default_notify_throttle(),
        }
    }

    /// Override the notification throttle window
    pub fn with_notify_throttle(mut self, window: Duration) -> Self {
        self.notify_throttle = window;
        self
    }

    // =========================================================================
    // Courses
    // =========================================================================

    /// Create a course owned by the actor
    #[instrument(skip(self, input), fields(user_id = %actor.user_id))]
    pub async fn create_course(
        &self,
        actor: &Actor,
        input: CreateCourseInput,
    ) -> Result<CourseRow, CatalogError> {
        policy::ensure_can_create(actor)?;

        let row = self
            .courses
            .create(CreateCourse {
                id: CourseId::new().0,
                title: input.title,
                description: input.description,
                preview: input.preview,
                owner_id: Some(actor.user_id.0),
            })
            .await?;

        info!(course_id = %row.id, "Course created");
        Ok(row)
    }

    /// Fetch a course with lessons, lesson count and subscription flag
    pub async fn get_course(
        &self,
        actor: &Actor,
        id: CourseId,
    ) -> Result<CourseDetail, CatalogError> {
        let course = self
            .courses
            .find_by_id(id.0)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        policy::ensure_can_view(actor, course.owner_id)?;

        self.course_detail(actor, course).await
    }

    /// List courses with the read-model extras; requires authentication only
    pub async fn list_courses(
        &self,
        actor: &Actor,
        limit: i64,
        offset: i64,
    ) -> Result<Page<CourseDetail>, CatalogError> {
        let total = self.courses.count().await?;
        let rows = self.courses.list(limit, offset).await?;

        let mut items = Vec::with_capacity(rows.len());
        for course in rows {
            items.push(self.course_detail(actor, course).await?);
        }

        Ok(Page { items, total })
    }

    /// Update a course; outside the throttle window this fans out
    /// subscriber notifications and advances `last_updated`
    #[instrument(skip(self, update), fields(user_id = %actor.user_id, course_id = %id))]
    pub async fn update_course(
        &self,
        actor: &Actor,
        id: CourseId,
        update: UpdateCourse,
    ) -> Result<CourseUpdateOutcome, CatalogError> {
        let course = self
            .courses
            .find_by_id(id.0)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        policy::ensure_can_update(actor, course.owner_id)?;

        let mut updated = self.courses.update(course.id, update).await?;

        let now = Utc::now();
        if !should_notify(course.last_updated, now, self.notify_throttle) {
            debug!(course_id = %course.id, "inside throttle window; update persisted without notification");
            return Ok(CourseUpdateOutcome {
                course: updated,
                notified: false,
            });
        }

        self.courses.set_last_updated(course.id, now).await?;
        updated.last_updated = Some(now);

        self.notify_subscribers(&updated, "курс").await;

        Ok(CourseUpdateOutcome {
            course: updated,
            notified: true,
        })
    }

    /// Delete a course; owner only, cascades to lessons and subscriptions
    #[instrument(skip(self), fields(user_id = %actor.user_id, course_id = %id))]
    pub async fn delete_course(&self, actor: &Actor, id: CourseId) -> Result<(), CatalogError> {
        let course = self
            .courses
            .find_by_id(id.0)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        policy::ensure_can_delete(actor, course.owner_id)?;

        self.courses.delete(course.id).await?;
        info!(course_id = %course.id, "Course deleted");
        Ok(())
    }

    // =========================================================================
    // Lessons
    // =========================================================================

    /// Create a lesson under an existing course, owned by the actor
    #[instrument(skip(self, input), fields(user_id = %actor.user_id))]
    pub async fn create_lesson(
        &self,
        actor: &Actor,
        input: CreateLessonInput,
    ) -> Result<LessonRow, CatalogError> {
        policy::ensure_can_create(actor)?;

        if let Some(ref url) = input.video_url {
            validate::validate_video_url(url)?;
        }

        let course = self
            .courses
            .find_by_id(input.course_id.0)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        let row = self
            .lessons
            .create(CreateLesson {
                id: LessonId::new().0,
                course_id: course.id,
                title: input.title,
                description: input.description,
                preview: input.preview,
                video_url: input.video_url,
                owner_id: Some(actor.user_id.0),
            })
            .await?;

        info!(lesson_id = %row.id, course_id = %course.id, "Lesson created");
        Ok(row)
    }

    /// Fetch a single lesson
    pub async fn get_lesson(&self, actor: &Actor, id: LessonId) -> Result<LessonRow, CatalogError> {
        let lesson = self
            .lessons
            .find_by_id(id.0)
            .await?
            .ok_or(CatalogError::LessonNotFound)?;

        policy::ensure_can_view(actor, lesson.owner_id)?;

        Ok(lesson)
    }

    /// List lessons; requires authentication only
    pub async fn list_lessons(
        &self,
        _actor: &Actor,
        limit: i64,
        offset: i64,
    ) -> Result<Page<LessonRow>, CatalogError> {
        let total = self.lessons.count().await?;
        let items = self.lessons.list(limit, offset).await?;

        Ok(Page { items, total })
    }

    /// Update a lesson; throttling and notification run against the parent
    /// course, with the lesson title as the change description
    #[instrument(skip(self, update), fields(user_id = %actor.user_id, lesson_id = %id))]
    pub async fn update_lesson(
        &self,
        actor: &Actor,
        id: LessonId,
        update: UpdateLesson,
    ) -> Result<LessonUpdateOutcome, CatalogError> {
        let lesson = self
            .lessons
            .find_by_id(id.0)
            .await?
            .ok_or(CatalogError::LessonNotFound)?;

        policy::ensure_can_update(actor, lesson.owner_id)?;

        if let Some(ref url) = update.video_url {
            validate::validate_video_url(url)?;
        }

        let course = self
            .courses
            .find_by_id(lesson.course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        let updated = self.lessons.update(lesson.id, update).await?;

        let now = Utc::now();
        if !should_notify(course.last_updated, now, self.notify_throttle) {
            debug!(lesson_id = %lesson.id, "inside throttle window; update persisted without notification");
            return Ok(LessonUpdateOutcome {
                lesson: updated,
                notified: false,
            });
        }

        self.courses.set_last_updated(course.id, now).await?;

        let change = format!("урок {}", updated.title);
        self.notify_subscribers(&course, &change).await;

        Ok(LessonUpdateOutcome {
            lesson: updated,
            notified: true,
        })
    }

    /// Delete a lesson; owner only
    #[instrument(skip(self), fields(user_id = %actor.user_id, lesson_id = %id))]
    pub async fn delete_lesson(&self, actor: &Actor, id: LessonId) -> Result<(), CatalogError> {
        let lesson = self
            .lessons
            .find_by_id(id.0)
            .await?
            .ok_or(CatalogError::LessonNotFound)?;

        policy::ensure_can_delete(actor, lesson.owner_id)?;

        self.lessons.delete(lesson.id).await?;
        info!(lesson_id = %lesson.id, "Lesson deleted");
        Ok(())
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Flip the actor's subscription to a course.
    ///
    /// The existence check and the mutation are not atomic against a
    /// concurrent duplicate request; the unique (user, course) constraint
    /// is the backstop, and a violation is reported as "already
    /// subscribed" rather than as a failure.
    #[instrument(skip(self), fields(user_id = %actor.user_id, course_id = %course_id))]
    pub async fn toggle_subscription(
        &self,
        actor: &Actor,
        course_id: CourseId,
    ) -> Result<SubscriptionChange, CatalogError> {
        let course = self
            .courses
            .find_by_id(course_id.0)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        let existing = self
            .subscriptions
            .find_by_user_and_course(actor.user_id.0, course.id)
            .await?;

        if existing.is_some() {
            self.subscriptions
                .delete_by_user_and_course(actor.user_id.0, course.id)
                .await?;
            info!("Subscription removed");
            return Ok(SubscriptionChange::Removed);
        }

        match self
            .subscriptions
            .create(CreateSubscription {
                id: SubscriptionId::new().0,
                user_id: actor.user_id.0,
                course_id: course.id,
            })
            .await
        {
            Ok(_) => {
                info!("Subscription added");
                Ok(SubscriptionChange::Added)
            }
            Err(DbError::UniqueViolation) => {
                debug!("concurrent subscribe hit the unique constraint; treating as subscribed");
                Ok(SubscriptionChange::Added)
            }
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn course_detail(
        &self,
        actor: &Actor,
        course: CourseRow,
    ) -> Result<CourseDetail, CatalogError> {
        let lessons = self.lessons.list_by_course(course.id).await?;
        let is_subscribed = self
            .subscriptions
            .find_by_user_and_course(actor.user_id.0, course.id)
            .await?
            .is_some();

        Ok(CourseDetail {
            lesson_count: lessons.len() as i64,
            lessons,
            is_subscribed,
            course,
        })
    }

    /// Enqueue one email job per active subscriber.
    ///
    /// Failures enumerating subscribers are logged, not propagated: the
    /// edit is already persisted and must not be rolled back or failed by
    /// the notification path.
    async fn notify_subscribers(&self, course: &CourseRow, change: &str) -> usize {
        let subscribers = match self.subscriptions.list_active_by_course(course.id).await {
            Ok(subs) => subs,
            Err(e) => {
                warn!(course_id = %course.id, error = %e, "failed to enumerate subscribers");
                return 0;
            }
        };

        let mut queued = 0;
        for sub in subscribers {
            let user = match self.users.find_by_id(sub.user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => continue,
                Err(e) => {
                    warn!(user_id = %sub.user_id, error = %e, "failed to load subscriber");
                    continue;
                }
            };

            self.notifications.enqueue(CourseUpdateEmail {
                recipient: user.email,
                course_title: course.title.clone(),
                change: change.to_string(),
            });
            queued += 1;
        }

        debug!(course_id = %course.id, queued, "subscriber notifications queued");
        queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_notify_never_notified() {
        assert!(should_notify(None, Utc::now(), Duration::hours(4)));
    }

    #[test]
    fn test_should_notify_inside_window() {
        let now = Utc::now();
        let last = now - Duration::hours(3) - Duration::minutes(59);
        assert!(!should_notify(Some(last), now, Duration::hours(4)));
    }

    #[test]
    fn test_should_notify_at_boundary() {
        let now = Utc::now();
        let last = now - Duration::hours(4);
        assert!(should_notify(Some(last), now, Duration::hours(4)));
    }

    #[test]
    fn test_should_notify_past_boundary() {
        let now = Utc::now();
        let last = now - Duration::hours(5);
        assert!(should_notify(Some(last), now, Duration::hours(4)));
    }
}
