//! Mock repositories for testing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use lyceum_db::{
    CourseRepository, CourseRow, CreateCourse, CreateLesson, CreateSubscription, CreateUser,
    DbError, DbResult, LessonRepository, LessonRow, SubscriptionRepository, SubscriptionRow,
    UpdateCourse, UpdateLesson, UpdateUser, UserRepository, UserRow,
};

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test user directly
    pub fn insert_user(&self, user: UserRow) {
        self.by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user);
    }

    /// Build a plain active user row
    pub fn test_user(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "$argon2$test".to_string(),
            phone: None,
            city: None,
            role: "user".to_string(),
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        if self.by_email.contains_key(&user.email) {
            return Err(DbError::UniqueViolation);
        }
        let row = UserRow {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            city: user.city,
            role: user.role,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        };
        self.insert_user(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> DbResult<UserRow> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(city) = update.city {
            user.city = Some(city);
        }
        Ok(user.clone())
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn deactivate_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let mut count = 0;
        for mut user in self.users.iter_mut() {
            let reference = user.last_login.unwrap_or(user.created_at);
            if user.is_active && reference < cutoff {
                user.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        if let Some((_, user)) = self.users.remove(&id) {
            self.by_email.remove(&user.email);
        }
        Ok(())
    }
}

/// In-memory course repository for testing
#[derive(Default, Clone)]
pub struct MockCourseRepository {
    courses: Arc<DashMap<Uuid, CourseRow>>,
}

impl MockCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a course row directly
    pub fn insert_course(&self, course: CourseRow) {
        self.courses.insert(course.id, course);
    }

    /// Build a course owned by `owner`
    pub fn test_course(title: &str, owner: Option<Uuid>) -> CourseRow {
        CourseRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            preview: None,
            owner_id: owner,
            last_updated: None,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl CourseRepository for MockCourseRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CourseRow>> {
        Ok(self.courses.get(&id).map(|r| r.value().clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<CourseRow>> {
        let mut all: Vec<CourseRow> = self.courses.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.courses.len() as i64)
    }

    async fn create(&self, course: CreateCourse) -> DbResult<CourseRow> {
        let row = CourseRow {
            id: course.id,
            title: course.title,
            description: course.description,
            preview: course.preview,
            owner_id: course.owner_id,
            last_updated: None,
            created_at: Utc::now(),
        };
        self.courses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, update: UpdateCourse) -> DbResult<CourseRow> {
        let mut course = self.courses.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(title) = update.title {
            course.title = title;
        }
        if let Some(description) = update.description {
            course.description = Some(description);
        }
        if let Some(preview) = update.preview {
            course.preview = Some(preview);
        }
        Ok(course.clone())
    }

    async fn set_last_updated(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()> {
        if let Some(mut course) = self.courses.get_mut(&id) {
            course.last_updated = Some(at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.courses.remove(&id);
        Ok(())
    }
}

/// In-memory lesson repository for testing
#[derive(Default, Clone)]
pub struct MockLessonRepository {
    lessons: Arc<DashMap<Uuid, LessonRow>>,
}

impl MockLessonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a lesson row directly
    pub fn insert_lesson(&self, lesson: LessonRow) {
        self.lessons.insert(lesson.id, lesson);
    }

    /// Build a lesson in `course_id` owned by `owner`
    pub fn test_lesson(title: &str, course_id: Uuid, owner: Option<Uuid>) -> LessonRow {
        LessonRow {
            id: Uuid::new_v4(),
            course_id,
            title: title.to_string(),
            description: None,
            preview: None,
            video_url: Some("https://youtube.com/watch?v=test".to_string()),
            owner_id: owner,
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }
}

#[async_trait]
impl LessonRepository for MockLessonRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<LessonRow>> {
        Ok(self.lessons.get(&id).map(|r| r.value().clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<LessonRow>> {
        let mut all: Vec<LessonRow> = self.lessons.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.lessons.len() as i64)
    }

    async fn list_by_course(&self, course_id: Uuid) -> DbResult<Vec<LessonRow>> {
        let mut rows: Vec<LessonRow> = self
            .lessons
            .iter()
            .filter(|r| r.value().course_id == course_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn count_by_course(&self, course_id: Uuid) -> DbResult<i64> {
        Ok(self
            .lessons
            .iter()
            .filter(|r| r.value().course_id == course_id)
            .count() as i64)
    }

    async fn create(&self, lesson: CreateLesson) -> DbResult<LessonRow> {
        let row = LessonRow {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            description: lesson.description,
            preview: lesson.preview,
            video_url: lesson.video_url,
            owner_id: lesson.owner_id,
            created_at: Utc::now(),
        };
        self.lessons.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, update: UpdateLesson) -> DbResult<LessonRow> {
        let mut lesson = self.lessons.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(title) = update.title {
            lesson.title = title;
        }
        if let Some(description) = update.description {
            lesson.description = Some(description);
        }
        if let Some(preview) = update.preview {
            lesson.preview = Some(preview);
        }
        if let Some(video_url) = update.video_url {
            lesson.video_url = Some(video_url);
        }
        Ok(lesson.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.lessons.remove(&id);
        Ok(())
    }
}

/// In-memory subscription repository for testing.
///
/// Enforces the (user, course) uniqueness the real table guarantees and
/// can inject a violation to simulate a lost insert race.
#[derive(Default, Clone)]
pub struct MockSubscriptionRepository {
    subs: Arc<DashMap<Uuid, SubscriptionRow>>,
    inject_unique_violation: Arc<AtomicBool>,
}

impl MockSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subscription row directly
    pub fn insert_subscription(&self, sub: SubscriptionRow) {
        self.subs.insert(sub.id, sub);
    }

    /// Build a subscription row
    pub fn test_subscription(user_id: Uuid, course_id: Uuid, is_active: bool) -> SubscriptionRow {
        SubscriptionRow {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            is_active,
            created_at: Utc::now(),
        }
    }

    /// Make the next create fail as if a concurrent insert won the race
    pub fn inject_unique_violation(&self) {
        self.inject_unique_violation.store(true, Ordering::SeqCst);
    }

    pub fn active_count(&self, user_id: Uuid, course_id: Uuid) -> usize {
        self.subs
            .iter()
            .filter(|r| {
                r.value().user_id == user_id
                    && r.value().course_id == course_id
                    && r.value().is_active
            })
            .count()
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<SubscriptionRow>> {
        Ok(self
            .subs
            .iter()
            .find(|r| r.value().user_id == user_id && r.value().course_id == course_id)
            .map(|r| r.value().clone()))
    }

    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow> {
        if self.inject_unique_violation.swap(false, Ordering::SeqCst) {
            return Err(DbError::UniqueViolation);
        }
        let duplicate = self
            .subs
            .iter()
            .any(|r| r.value().user_id == sub.user_id && r.value().course_id == sub.course_id);
        if duplicate {
            return Err(DbError::UniqueViolation);
        }

        let row = SubscriptionRow {
            id: sub.id,
            user_id: sub.user_id,
            course_id: sub.course_id,
            is_active: true,
            created_at: Utc::now(),
        };
        self.subs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_by_user_and_course(&self, user_id: Uuid, course_id: Uuid) -> DbResult<u64> {
        let ids: Vec<Uuid> = self
            .subs
            .iter()
            .filter(|r| r.value().user_id == user_id && r.value().course_id == course_id)
            .map(|r| r.id)
            .collect();
        let count = ids.len() as u64;
        for id in ids {
            self.subs.remove(&id);
        }
        Ok(count)
    }

    async fn list_active_by_course(&self, course_id: Uuid) -> DbResult<Vec<SubscriptionRow>> {
        let mut rows: Vec<SubscriptionRow> = self
            .subs
            .iter()
            .filter(|r| r.value().course_id == course_id && r.value().is_active)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }
}
