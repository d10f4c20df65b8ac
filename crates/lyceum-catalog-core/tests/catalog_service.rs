//! CatalogService integration tests over in-memory repositories

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::mpsc::UnboundedReceiver;

use common::mock_repos::{
    MockCourseRepository, MockLessonRepository, MockSubscriptionRepository, MockUserRepository,
};
use lyceum_catalog_core::{
    CatalogError, CatalogService, CreateCourseInput, CreateLessonInput,
};
use lyceum_db::{CourseRepository, UpdateCourse, UpdateLesson};
use lyceum_notify::{CourseUpdateEmail, NotificationQueue};
use lyceum_types::{Actor, CourseId, LessonId, Role, SubscriptionChange, UserId};

type TestService = CatalogService<
    MockCourseRepository,
    MockLessonRepository,
    MockSubscriptionRepository,
    MockUserRepository,
>;

struct Fixture {
    service: TestService,
    courses: MockCourseRepository,
    lessons: MockLessonRepository,
    subscriptions: MockSubscriptionRepository,
    users: MockUserRepository,
    emails: UnboundedReceiver<CourseUpdateEmail>,
}

fn fixture() -> Fixture {
    let courses = MockCourseRepository::new();
    let lessons = MockLessonRepository::new();
    let subscriptions = MockSubscriptionRepository::new();
    let users = MockUserRepository::new();
    let (queue, emails) = NotificationQueue::channel();

    let service = CatalogService::new(
        Arc::new(courses.clone()),
        Arc::new(lessons.clone()),
        Arc::new(subscriptions.clone()),
        Arc::new(users.clone()),
        queue,
    );

    Fixture {
        service,
        courses,
        lessons,
        subscriptions,
        users,
        emails,
    }
}

fn actor_for(user: &lyceum_db::UserRow) -> Actor {
    Actor {
        user_id: UserId(user.id),
        email: user.email.clone(),
        role: user.role.parse().unwrap_or(Role::User),
    }
}

fn moderator() -> Actor {
    Actor {
        user_id: UserId::new(),
        email: "moderator@example.com".to_string(),
        role: Role::Moderator,
    }
}

fn drain(emails: &mut UnboundedReceiver<CourseUpdateEmail>) -> Vec<CourseUpdateEmail> {
    let mut out = Vec::new();
    while let Ok(job) = emails.try_recv() {
        out.push(job);
    }
    out
}

// ============================================================================
// Subscription toggle
// ============================================================================

#[tokio::test]
async fn test_toggle_twice_returns_to_original_state() {
    let fx = fixture();
    let user = MockUserRepository::test_user("student@example.com");
    fx.users.insert_user(user.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(user.id));
    fx.courses.insert_course(course.clone());
    let actor = actor_for(&user);

    let first = fx
        .service
        .toggle_subscription(&actor, CourseId(course.id))
        .await
        .unwrap();
    assert_eq!(first, SubscriptionChange::Added);
    assert_eq!(fx.subscriptions.active_count(user.id, course.id), 1);

    let second = fx
        .service
        .toggle_subscription(&actor, CourseId(course.id))
        .await
        .unwrap();
    assert_eq!(second, SubscriptionChange::Removed);
    assert_eq!(fx.subscriptions.active_count(user.id, course.id), 0);
}

#[tokio::test]
async fn test_toggle_never_duplicates_active_rows() {
    let fx = fixture();
    let user = MockUserRepository::test_user("student@example.com");
    fx.users.insert_user(user.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(user.id));
    fx.courses.insert_course(course.clone());
    let actor = actor_for(&user);

    for _ in 0..5 {
        fx.service
            .toggle_subscription(&actor, CourseId(course.id))
            .await
            .unwrap();
        assert!(fx.subscriptions.active_count(user.id, course.id) <= 1);
    }
}

#[tokio::test]
async fn test_toggle_treats_lost_insert_race_as_added() {
    let fx = fixture();
    let user = MockUserRepository::test_user("student@example.com");
    fx.users.insert_user(user.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(user.id));
    fx.courses.insert_course(course.clone());
    let actor = actor_for(&user);

    // A concurrent request inserts between our existence check and insert.
    fx.subscriptions.inject_unique_violation();

    let result = fx
        .service
        .toggle_subscription(&actor, CourseId(course.id))
        .await
        .unwrap();
    assert_eq!(result, SubscriptionChange::Added);
}

#[tokio::test]
async fn test_toggle_missing_course_is_not_found() {
    let fx = fixture();
    let user = MockUserRepository::test_user("student@example.com");
    fx.users.insert_user(user.clone());
    let actor = actor_for(&user);

    let result = fx.service.toggle_subscription(&actor, CourseId::new()).await;
    assert!(matches!(result, Err(CatalogError::CourseNotFound)));
}

// ============================================================================
// Update notification throttle
// ============================================================================

#[tokio::test]
async fn test_update_outside_window_notifies_active_subscribers() {
    let mut fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    let sub_a = MockUserRepository::test_user("a@example.com");
    let sub_b = MockUserRepository::test_user("b@example.com");
    let idle = MockUserRepository::test_user("idle@example.com");
    for u in [&owner, &sub_a, &sub_b, &idle] {
        fx.users.insert_user(u.clone());
    }

    let mut course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    course.last_updated = Some(Utc::now() - Duration::hours(5));
    fx.courses.insert_course(course.clone());

    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            sub_a.id, course.id, true,
        ));
    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            sub_b.id, course.id, true,
        ));
    // Inactive subscription must not be notified.
    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            idle.id, course.id, false,
        ));

    let before = Utc::now();
    let outcome = fx
        .service
        .update_course(
            &actor_for(&owner),
            CourseId(course.id),
            UpdateCourse {
                title: Some("Rust 102".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.notified);
    assert!(outcome.course.last_updated.unwrap() >= before);

    let jobs = drain(&mut fx.emails);
    assert_eq!(jobs.len(), 2);
    let mut recipients: Vec<&str> = jobs.iter().map(|j| j.recipient.as_str()).collect();
    recipients.sort();
    assert_eq!(recipients, ["a@example.com", "b@example.com"]);
    for job in &jobs {
        assert_eq!(job.course_title, "Rust 102");
        assert_eq!(job.change, "курс");
    }
}

#[tokio::test]
async fn test_update_inside_window_persists_without_notification() {
    let mut fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    let subscriber = MockUserRepository::test_user("a@example.com");
    fx.users.insert_user(owner.clone());
    fx.users.insert_user(subscriber.clone());

    let mut course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    let last = Utc::now() - Duration::hours(1);
    course.last_updated = Some(last);
    fx.courses.insert_course(course.clone());
    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            subscriber.id,
            course.id,
            true,
        ));

    let outcome = fx
        .service
        .update_course(
            &actor_for(&owner),
            CourseId(course.id),
            UpdateCourse {
                title: Some("Rust 102".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!outcome.notified);
    assert_eq!(outcome.course.title, "Rust 102");
    // The throttle timestamp must not advance inside the window.
    assert_eq!(outcome.course.last_updated, Some(last));
    assert!(drain(&mut fx.emails).is_empty());
}

#[tokio::test]
async fn test_first_ever_update_notifies() {
    let mut fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    let subscriber = MockUserRepository::test_user("a@example.com");
    fx.users.insert_user(owner.clone());
    fx.users.insert_user(subscriber.clone());

    let course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    fx.courses.insert_course(course.clone());
    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            subscriber.id,
            course.id,
            true,
        ));

    let outcome = fx
        .service
        .update_course(
            &actor_for(&owner),
            CourseId(course.id),
            UpdateCourse {
                description: Some("now with content".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.notified);
    assert_eq!(drain(&mut fx.emails).len(), 1);
}

#[tokio::test]
async fn test_lesson_update_notifies_with_lesson_title() {
    let mut fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    let subscriber = MockUserRepository::test_user("a@example.com");
    fx.users.insert_user(owner.clone());
    fx.users.insert_user(subscriber.clone());

    let course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    fx.courses.insert_course(course.clone());
    let lesson = MockLessonRepository::test_lesson("Ownership", course.id, Some(owner.id));
    fx.lessons.insert_lesson(lesson.clone());
    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            subscriber.id,
            course.id,
            true,
        ));

    let outcome = fx
        .service
        .update_lesson(
            &actor_for(&owner),
            LessonId(lesson.id),
            UpdateLesson {
                title: Some("Ownership and Borrowing".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.notified);
    let jobs = drain(&mut fx.emails);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].course_title, "Rust 101");
    assert_eq!(jobs[0].change, "урок Ownership and Borrowing");

    // Lesson updates advance the parent course's throttle window.
    let course_after = fx.courses.find_by_id(course.id).await.unwrap().unwrap();
    assert!(course_after.last_updated.is_some());
}

// ============================================================================
// Authorization policy
// ============================================================================

#[tokio::test]
async fn test_moderator_cannot_create_course() {
    let fx = fixture();

    let result = fx
        .service
        .create_course(
            &moderator(),
            CreateCourseInput {
                title: "Moderated".to_string(),
                description: None,
                preview: None,
            },
        )
        .await;

    assert!(matches!(result, Err(CatalogError::Forbidden(_))));
}

#[tokio::test]
async fn test_moderator_cannot_delete_unowned_course_but_owner_can() {
    let fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    fx.users.insert_user(owner.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    fx.courses.insert_course(course.clone());

    let denied = fx
        .service
        .delete_course(&moderator(), CourseId(course.id))
        .await;
    assert!(matches!(denied, Err(CatalogError::Forbidden(_))));

    fx.service
        .delete_course(&actor_for(&owner), CourseId(course.id))
        .await
        .unwrap();
    assert!(fx.courses.find_by_id(course.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_moderator_can_update_unowned_course() {
    let fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    fx.users.insert_user(owner.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    fx.courses.insert_course(course.clone());

    let outcome = fx
        .service
        .update_course(
            &moderator(),
            CourseId(course.id),
            UpdateCourse {
                title: Some("Rust 101 (edited)".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.course.title, "Rust 101 (edited)");
}

#[tokio::test]
async fn test_stranger_cannot_view_unowned_course() {
    let fx = fixture();
    let owner = MockUserRepository::test_user("owner@example.com");
    let stranger = MockUserRepository::test_user("stranger@example.com");
    fx.users.insert_user(owner.clone());
    fx.users.insert_user(stranger.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(owner.id));
    fx.courses.insert_course(course.clone());

    let result = fx
        .service
        .get_course(&actor_for(&stranger), CourseId(course.id))
        .await;
    assert!(matches!(result, Err(CatalogError::Forbidden(_))));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_lesson_with_non_youtube_url_rejected_before_persistence() {
    let fx = fixture();
    let user = MockUserRepository::test_user("author@example.com");
    fx.users.insert_user(user.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(user.id));
    fx.courses.insert_course(course.clone());

    let result = fx
        .service
        .create_lesson(
            &actor_for(&user),
            CreateLessonInput {
                course_id: CourseId(course.id),
                title: "Intro".to_string(),
                description: None,
                preview: None,
                video_url: Some("https://vimeo.com/12345".to_string()),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(CatalogError::Validation { field: "video_url", .. })
    ));
    assert_eq!(fx.lessons.len(), 0);
}

#[tokio::test]
async fn test_lesson_with_youtube_url_accepted() {
    let fx = fixture();
    let user = MockUserRepository::test_user("author@example.com");
    fx.users.insert_user(user.clone());
    let course = MockCourseRepository::test_course("Rust 101", Some(user.id));
    fx.courses.insert_course(course.clone());

    let lesson = fx
        .service
        .create_lesson(
            &actor_for(&user),
            CreateLessonInput {
                course_id: CourseId(course.id),
                title: "Intro".to_string(),
                description: None,
                preview: None,
                video_url: Some("https://youtube.com/watch?v=abc".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(lesson.video_url.as_deref(), Some("https://youtube.com/watch?v=abc"));
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_subscribe_then_update_emails_the_subscriber() {
    let mut fx = fixture();

    // Register user A and create their course X.
    let user = MockUserRepository::test_user("a@example.com");
    fx.users.insert_user(user.clone());
    let actor = actor_for(&user);

    let course = fx
        .service
        .create_course(
            &actor,
            CreateCourseInput {
                title: "Course X".to_string(),
                description: None,
                preview: None,
            },
        )
        .await
        .unwrap();

    // Subscribe A to X.
    let change = fx
        .service
        .toggle_subscription(&actor, CourseId(course.id))
        .await
        .unwrap();
    assert_eq!(change, SubscriptionChange::Added);

    // Update X; the course has never notified, so the window is open.
    let outcome = fx
        .service
        .update_course(
            &actor,
            CourseId(course.id),
            UpdateCourse {
                description: Some("updated".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(outcome.notified);

    let jobs = drain(&mut fx.emails);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].recipient, "a@example.com");
    assert_eq!(jobs[0].course_title, "Course X");
}

#[tokio::test]
async fn test_inactive_sweep_is_idempotent() {
    use lyceum_db::UserRepository;

    let users = MockUserRepository::new();

    let mut idle = MockUserRepository::test_user("idle@example.com");
    idle.last_login = Some(Utc::now() - Duration::days(45));
    users.insert_user(idle.clone());

    let mut fresh = MockUserRepository::test_user("fresh@example.com");
    fresh.last_login = Some(Utc::now() - Duration::days(2));
    users.insert_user(fresh.clone());

    let cutoff = Utc::now() - Duration::days(30);

    // First sweep deactivates only the idle account.
    assert_eq!(users.deactivate_inactive(cutoff).await.unwrap(), 1);
    assert!(!users.find_by_id(idle.id).await.unwrap().unwrap().is_active);
    assert!(users.find_by_id(fresh.id).await.unwrap().unwrap().is_active);

    // Re-running only re-matches already-inactive accounts: a no-op.
    assert_eq!(users.deactivate_inactive(cutoff).await.unwrap(), 0);
}

#[tokio::test]
async fn test_course_detail_embeds_read_model() {
    let fx = fixture();
    let user = MockUserRepository::test_user("a@example.com");
    fx.users.insert_user(user.clone());
    let actor = actor_for(&user);

    let course = MockCourseRepository::test_course("Rust 101", Some(user.id));
    fx.courses.insert_course(course.clone());
    fx.lessons
        .insert_lesson(MockLessonRepository::test_lesson(
            "Intro",
            course.id,
            Some(user.id),
        ));
    fx.lessons
        .insert_lesson(MockLessonRepository::test_lesson(
            "Ownership",
            course.id,
            Some(user.id),
        ));
    fx.subscriptions
        .insert_subscription(MockSubscriptionRepository::test_subscription(
            user.id, course.id, true,
        ));

    let detail = fx
        .service
        .get_course(&actor, CourseId(course.id))
        .await
        .unwrap();

    assert_eq!(detail.lesson_count, 2);
    assert_eq!(detail.lessons.len(), 2);
    assert!(detail.is_subscribed);
}
