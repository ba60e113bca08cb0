use std::sync::Arc;
use std::time::Duration;

use api::InMemoryBackend;
use edupath_core::model::{AuthToken, LessonId};
use services::{AccountKind, HeartbeatService, HeartbeatStatus, SessionContext};

fn service(backend: &InMemoryBackend) -> HeartbeatService {
    HeartbeatService::new(Arc::new(backend.clone()))
}

#[tokio::test(start_paused = true)]
async fn reports_learning_time_while_session_is_valid() {
    let backend = InMemoryBackend::new();
    let ctx = SessionContext::login(AuthToken::new("token"), "Dana");
    let lesson_id = LessonId::new(11);

    let handle = service(&backend).spawn(lesson_id, &ctx);
    tokio::time::sleep(Duration::from_secs(95)).await;
    handle.stop();

    let reports = backend.reported_time();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|(id, secs)| *id == lesson_id && *secs == 30));
}

#[tokio::test(start_paused = true)]
async fn stale_session_stops_polling_and_publishes_status() {
    let backend = InMemoryBackend::new();
    let ctx = SessionContext::login(AuthToken::new("token"), "Dana");

    // another device took over the account
    backend.set_active_session(Some(edupath_core::model::SessionId::generate()));

    let mut handle = service(&backend).spawn(LessonId::new(1), &ctx);
    let status = handle.changed().await;
    assert_eq!(status, HeartbeatStatus::Stale);

    // no learning time was reported, and nothing fires afterwards
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(backend.reported_time().is_empty());
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn stopped_heartbeat_fires_nothing() {
    let backend = InMemoryBackend::new();
    let ctx = SessionContext::login(AuthToken::new("token"), "Dana");

    let handle = service(&backend).spawn(LessonId::new(2), &ctx);
    handle.stop();

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert!(backend.reported_time().is_empty());
    assert_eq!(handle.status(), HeartbeatStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn switching_accounts_goes_stale_on_the_old_context() {
    let backend = InMemoryBackend::new();
    let ctx = SessionContext::login(AuthToken::new("token"), "Dana");
    backend.set_active_session(Some(ctx.session_id()));

    let child = ctx.switch_account("Milo", AccountKind::SubAccount);
    backend.set_active_session(Some(child.session_id()));

    let mut old_handle = service(&backend).spawn(LessonId::new(3), &ctx);
    assert_eq!(old_handle.changed().await, HeartbeatStatus::Stale);

    let new_handle = service(&backend).spawn(LessonId::new(3), &child);
    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(new_handle.status(), HeartbeatStatus::Active);
    assert!(!backend.reported_time().is_empty());
}
