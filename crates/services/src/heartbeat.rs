use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use api::SessionHeartbeat;
use edupath_core::model::LessonId;

use crate::context::SessionContext;

/// Default polling interval for lesson screens.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Learning time reported per successful poll.
pub const LEARNING_TIME_INCREMENT_SECS: u32 = 30;

/// What the heartbeat currently knows about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatStatus {
    /// The backend still considers this device session active.
    Active,
    /// Another login took over; the screen must stop and navigate away.
    Stale,
}

/// Periodic session-validity check and learning-time reporter.
///
/// One heartbeat runs per focused lesson screen. It is not part of the quiz
/// engine; the quiz has its own ticker.
#[derive(Clone)]
pub struct HeartbeatService {
    sessions: Arc<dyn SessionHeartbeat>,
    interval: Duration,
    increment_secs: u32,
}

impl HeartbeatService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionHeartbeat>) -> Self {
        Self {
            sessions,
            interval: HEARTBEAT_INTERVAL,
            increment_secs: LEARNING_TIME_INCREMENT_SECS,
        }
    }

    /// Override the polling interval (tests, debug builds).
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling for a focused lesson screen.
    ///
    /// Every interval the session is checked first; a stale session publishes
    /// `HeartbeatStatus::Stale` and ends the loop without reporting time.
    /// Transport failures are logged and polling continues — staleness is
    /// decided by a backend answer, not by a flaky connection.
    #[must_use]
    pub fn spawn(&self, lesson_id: LessonId, ctx: &SessionContext) -> HeartbeatHandle {
        let (tx, rx) = watch::channel(HeartbeatStatus::Active);
        let sessions = Arc::clone(&self.sessions);
        let interval = self.interval;
        let increment_secs = self.increment_secs;
        let session_id = ctx.session_id();
        let auth = ctx.auth_token().clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match sessions.check_session(&session_id, &auth).await {
                    Ok(check) if !check.still_valid => {
                        log::warn!("session {session_id} superseded by another login");
                        let _ = tx.send(HeartbeatStatus::Stale);
                        break;
                    }
                    Ok(_) => {
                        if let Err(err) =
                            sessions.report_time(lesson_id, increment_secs, &auth).await
                        {
                            log::warn!("learning time report failed for lesson {lesson_id}: {err}");
                        }
                    }
                    Err(err) => {
                        log::warn!("session check failed: {err}");
                    }
                }
            }
        });

        HeartbeatHandle {
            status: rx,
            task,
        }
    }
}

/// Owner handle for a running heartbeat.
///
/// `stop()` and `Drop` abort the task immediately; nothing fires after
/// teardown.
pub struct HeartbeatHandle {
    status: watch::Receiver<HeartbeatStatus>,
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Last published status.
    #[must_use]
    pub fn status(&self) -> HeartbeatStatus {
        *self.status.borrow()
    }

    /// Wait until the status changes, returning the new value.
    ///
    /// If the heartbeat has already ended, the last published status is
    /// returned immediately.
    pub async fn changed(&mut self) -> HeartbeatStatus {
        let _ = self.status.changed().await;
        *self.status.borrow()
    }

    /// Stop polling immediately.
    pub fn stop(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
