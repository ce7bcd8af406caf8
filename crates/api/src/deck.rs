//! The process-wide deck session.
//!
//! A single [`DeckSession`] behind an async mutex. Every request handles its
//! message against the state current when it takes the lock. Timed exits
//! finish on a spawned task, so the deck settles even if the request that
//! started the exit goes away. Operations that write decisions run on the
//! blocking pool, since a [`FileStore`] write syncs to disk.

use std::sync::Arc;

use eventdeck_core::decisions::{Decision, DecisionStore};
use eventdeck_core::motion::MotionConfig;
use eventdeck_core::session::{DeckSession, DeckSnapshot, PointerInput, SessionEvent};
use eventdeck_core::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
use eventdeck_core::types::EventId;
use eventdeck_db::models::event::Event;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Storage behind the decision sets.
pub type DecisionBackend = Box<dyn KeyValueStore + Send>;

type Session = DeckSession<Event, DecisionBackend>;

pub struct DeckManager {
    session: Arc<Mutex<Session>>,
}

impl DeckManager {
    pub fn new(store: DecisionBackend, motion: MotionConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(DeckSession::new(
                DecisionStore::new(store),
                motion,
            ))),
        }
    }

    /// Decisions in memory only; lost on restart.
    pub fn in_memory(motion: MotionConfig) -> Self {
        Self::new(Box::new(MemoryStore::new()), motion)
    }

    /// Decisions persisted under `dir`.
    pub fn persistent(dir: &std::path::Path, motion: MotionConfig) -> Result<Self, StorageError> {
        let store = FileStore::open(dir)?;
        tracing::info!(dir = %dir.display(), "Decisions persisted to disk");
        Ok(Self::new(Box::new(store), motion))
    }

    /// Replace the deck with `events`. Returns how many cards remain after
    /// already-decided events are skipped.
    pub async fn load(&self, events: Vec<Event>) -> usize {
        let fetched = events.len();
        let count = match self.blocking(move |session| session.load(events)).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Deck load task failed");
                0
            }
        };
        tracing::info!(fetched, count, "Deck loaded");
        count
    }

    pub async fn snapshot(&self) -> DeckSnapshot<Event> {
        self.session.lock().await.snapshot()
    }

    pub async fn pointer(&self, input: PointerInput) -> AppResult<SessionEvent> {
        Ok(self.blocking(move |session| session.pointer(input)).await??)
    }

    /// Programmatic swipe. Resolves once the exit animation has elapsed and
    /// the decision is recorded, or immediately if the swipe was ignored.
    pub async fn swipe(self: &Arc<Self>, decision: Decision) -> AppResult<SessionEvent> {
        let started = self.session.lock().await.swipe(decision);
        let SessionEvent::ExitStarted {
            exit_id, duration, ..
        } = started
        else {
            return Ok(started);
        };

        let manager = Arc::clone(self);
        let finish = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            manager
                .blocking(move |session| session.finish_exit(exit_id))
                .await
        });

        let finished = finish
            .await
            .map_err(|e| AppError::InternalError(format!("Exit task failed: {e}")))??;
        Ok(finished?)
    }

    /// Start over from the first card, abandoning any exit in flight.
    pub async fn reset(&self) -> DeckSnapshot<Event> {
        let mut session = self.session.lock().await;
        session.reset();
        session.snapshot()
    }

    pub async fn saved_ids(&self) -> Vec<EventId> {
        self.session.lock().await.saved_ids()
    }

    pub async fn dismissed_ids(&self) -> Vec<EventId> {
        self.session.lock().await.dismissed_ids()
    }

    pub async fn unsave(&self, id: &str) -> AppResult<bool> {
        let id = id.to_string();
        Ok(self.blocking(move |session| session.unsave(&id)).await??)
    }

    pub async fn clear_dismissed(&self) -> AppResult<()> {
        Ok(self.blocking(|session| session.clear_dismissed()).await??)
    }

    /// Run `f` on the blocking pool while holding the session lock.
    async fn blocking<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Session) -> R + Send + 'static,
        R: Send + 'static,
    {
        let mut session = Arc::clone(&self.session).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut session))
            .await
            .map_err(|e| AppError::InternalError(format!("Deck task failed: {e}")))
    }
}
