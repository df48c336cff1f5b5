//! Second-resolution session ticker.
//!
//! The ticker is the only autonomously-triggered event source in the
//! system. It holds a weak reference to the shared session, fires
//! [`Session::tick`] once per second, and stops itself the moment the
//! session completes or is dropped. The returned guard aborts the task on
//! drop, so no tick can outlive the owning session's scope.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::session::Session;

/// A session shared between its driving surface and the ticker.
pub type SharedSession = Arc<Mutex<Session>>;

/// Owns the background ticking task; dropping it cancels the task.
#[derive(Debug)]
pub struct TickerGuard {
    handle: JoinHandle<()>,
}

impl TickerGuard {
    /// Stop the ticker explicitly. Equivalent to dropping the guard.
    pub fn stop(self) {
        self.handle.abort();
    }

    /// Whether the ticking task has already exited on its own.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the once-per-second ticker for `session`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_ticker(session: &SharedSession) -> TickerGuard {
    let weak: Weak<Mutex<Session>> = Arc::downgrade(session);

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; consume it so the
        // first increment lands a full second after start.
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(session) = weak.upgrade() else {
                break;
            };
            let mut session = session.lock().unwrap();
            if session.is_completed() {
                break;
            }
            session.tick();
        }
    });

    TickerGuard { handle }
}
