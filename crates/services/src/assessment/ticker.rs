use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::engine::AssessmentSession;
use super::workflow::AssessmentLoopService;
use crate::context::SessionContext;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Drives one `tick()` per second against a shared session.
///
/// On the tick that expires the timer, the pending submission is dispatched
/// and the ticker stops. The handle owns the task: `stop()` or dropping it
/// aborts immediately, so no tick can fire into a torn-down screen.
pub struct QuizTicker {
    task: JoinHandle<()>,
}

impl QuizTicker {
    /// Spawn the one-second drive loop for a session.
    ///
    /// The ticker also stops on its own once the session is submitted (by
    /// whichever path) and nothing is left to dispatch.
    #[must_use]
    pub fn spawn(
        service: AssessmentLoopService,
        session: Arc<Mutex<AssessmentSession>>,
        ctx: SessionContext,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                // never hold the lock across an await
                let (pending, done) = {
                    let Ok(mut guard) = session.lock() else {
                        break;
                    };
                    let tick = guard.tick();
                    let pending = if tick.expired_score.is_some() {
                        guard
                            .take_pending_submission()
                            .map(|score| (guard.chapter_id(), score))
                    } else {
                        None
                    };
                    (pending, guard.is_submitted())
                };

                if let Some((chapter_id, score)) = pending {
                    if service.deliver(chapter_id, score, &ctx).await {
                        if let Ok(mut guard) = session.lock() {
                            guard.mark_submission_accepted();
                        }
                    } else if let Ok(mut guard) = session.lock() {
                        guard.mark_submission_failed();
                    }
                    break;
                }

                if done {
                    break;
                }
            }
        });

        Self { task }
    }

    /// Stop ticking immediately.
    pub fn stop(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for QuizTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
