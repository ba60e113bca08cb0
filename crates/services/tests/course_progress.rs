use std::sync::Arc;

use api::InMemoryBackend;
use edupath_core::model::{
    AuthToken, ChapterAccess, ChapterId, CourseId, CourseOutline, ChapterSummary, LessonId,
    LessonSummary, QuizGate, Score,
};
use services::{CourseProgressService, SessionContext};

fn lesson(id: u64, completed: bool) -> LessonSummary {
    LessonSummary {
        id: LessonId::new(id),
        title: format!("Lesson {id}"),
        video_url: None,
        completed,
    }
}

fn seed_course(backend: &InMemoryBackend) -> CourseId {
    let course_id = CourseId::new(1);
    backend
        .seed_course(CourseOutline {
            id: course_id,
            title: "Algebra".into(),
            chapters: vec![
                ChapterSummary {
                    id: ChapterId::new(1),
                    title: "Foundations".into(),
                    lessons: vec![lesson(1, true), lesson(2, true)],
                    quiz_score: Some(Score::from_percent(85.0)),
                },
                ChapterSummary {
                    id: ChapterId::new(2),
                    title: "Equations".into(),
                    lessons: vec![lesson(3, true), lesson(4, false)],
                    quiz_score: None,
                },
                ChapterSummary {
                    id: ChapterId::new(3),
                    title: "Graphs".into(),
                    lessons: vec![lesson(5, false)],
                    quiz_score: None,
                },
            ],
        })
        .unwrap();
    course_id
}

#[tokio::test]
async fn board_applies_lock_step_gating() {
    let backend = InMemoryBackend::new();
    let course_id = seed_course(&backend);
    let ctx = SessionContext::login(AuthToken::new("token"), "Dana");

    let svc = CourseProgressService::new(Arc::new(backend));
    let board = svc.outline(course_id, &ctx).await.unwrap();

    assert_eq!(board.outline.title, "Algebra");
    assert_eq!(board.access.len(), 3);

    // chapter 1 passed, its quiz shows as passed
    let ChapterAccess::Open { quiz, .. } = board.access[0] else {
        panic!("chapter 1 should be open");
    };
    assert_eq!(quiz, QuizGate::Passed);

    // chapter 2 open because chapter 1 passed; lesson 4 reachable, quiz locked
    let ChapterAccess::Open { open_lessons, quiz } = board.access[1] else {
        panic!("chapter 2 should be open");
    };
    assert_eq!(open_lessons, 2);
    assert_eq!(quiz, QuizGate::Locked);

    // chapter 3 locked until chapter 2's quiz is passed
    assert_eq!(board.access[2], ChapterAccess::Locked);
}

#[tokio::test]
async fn unknown_course_is_an_error() {
    let backend = InMemoryBackend::new();
    let ctx = SessionContext::login(AuthToken::new("token"), "Dana");

    let svc = CourseProgressService::new(Arc::new(backend));
    assert!(svc.outline(CourseId::new(77), &ctx).await.is_err());
}
