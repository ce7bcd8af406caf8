//! A single user's browsing session over the deck.
//!
//! [`DeckSession`] owns the deck, the top card's motion state and the
//! decision store, and is driven by discrete messages (pointer input,
//! swipe requests, animation completion). Every message is handled against
//! the state current at that moment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::deck::{CommitOutcome, CommitTicket, Deck, DeckItem, IgnoreReason};
use crate::decisions::{Decision, DecisionSet, DecisionStore};
use crate::motion::{
    CardMotion, CardTransform, Direction, ExitRequest, MotionConfig, MotionState, Release,
};
use crate::storage::{KeyValueStore, StorageError};
use crate::types::EventId;

/// Pointer input for the top card. `offset_x` is relative to where the
/// pointer went down.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PointerInput {
    Down,
    Move { offset_x: f64 },
    Up,
}

/// What a session message did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Drag started or moved.
    Dragged,
    /// Released below the threshold; nothing recorded.
    SnappedBack,
    /// A timed exit began; report its end with [`DeckSession::finish_exit`].
    ExitStarted {
        exit_id: u64,
        card_id: EventId,
        direction: Direction,
        #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
        duration: Duration,
    },
    /// The decision was recorded and the deck advanced.
    Committed { id: EventId, decision: Decision },
    Ignored { reason: IgnoreReason },
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSnapshot<T> {
    pub cursor: usize,
    pub total: usize,
    pub exhausted: bool,
    pub window: Vec<T>,
    pub motion: MotionState,
    pub transform: CardTransform,
}

#[derive(Debug)]
struct PendingExit {
    exit_id: u64,
    ticket: CommitTicket,
    decision: Decision,
}

#[derive(Debug)]
pub struct DeckSession<T, S> {
    deck: Deck<T>,
    motion: CardMotion,
    config: MotionConfig,
    pending: Option<PendingExit>,
    next_exit_id: u64,
    store: DecisionStore<S>,
}

impl<T: DeckItem + Clone, S: KeyValueStore> DeckSession<T, S> {
    pub fn new(store: DecisionStore<S>, config: MotionConfig) -> Self {
        Self {
            deck: Deck::new(Vec::new()),
            motion: CardMotion::new(config),
            config,
            pending: None,
            next_exit_id: 1,
            store,
        }
    }

    /// Start a new deck from `items`, skipping anything already saved or
    /// dismissed. Returns the number of cards in the deck.
    pub fn load(&mut self, items: Vec<T>) -> usize {
        let saved = self.store.all(DecisionSet::Saved);
        let dismissed = self.store.all(DecisionSet::Dismissed);
        let fresh: Vec<T> = items
            .into_iter()
            .filter(|item| {
                let id = item.item_id();
                !saved.iter().any(|s| s == id) && !dismissed.iter().any(|d| d == id)
            })
            .collect();
        let count = fresh.len();
        self.deck.replace_items(fresh);
        self.clear_motion();
        count
    }

    pub fn pointer(&mut self, input: PointerInput) -> Result<SessionEvent, StorageError> {
        if self.deck.is_exhausted() {
            return Ok(ignored(IgnoreReason::Exhausted));
        }

        match input {
            PointerInput::Down => Ok(if self.motion.pointer_down() {
                SessionEvent::Dragged
            } else {
                ignored(IgnoreReason::Busy)
            }),
            PointerInput::Move { offset_x } => Ok(if self.motion.pointer_move(offset_x) {
                SessionEvent::Dragged
            } else {
                ignored(IgnoreReason::Busy)
            }),
            PointerInput::Up => match self.motion.pointer_up() {
                Release::SnappedBack => Ok(SessionEvent::SnappedBack),
                Release::Ignored => Ok(ignored(IgnoreReason::Busy)),
                Release::Committed(direction) => {
                    let result = self.deck.commit(direction.decision(), &mut self.store);
                    self.settle(result)
                }
            },
        }
    }

    /// Button or keyboard swipe for the top card.
    pub fn swipe(&mut self, decision: Decision) -> SessionEvent {
        if self.deck.is_exhausted() {
            return ignored(IgnoreReason::Exhausted);
        }

        let direction = Direction::from_decision(decision);
        let ExitRequest::Animate { direction, duration } = self.motion.request_exit(direction)
        else {
            return ignored(IgnoreReason::Busy);
        };

        let ticket = match self.deck.begin_commit() {
            Ok(ticket) => ticket,
            Err(reason) => {
                self.motion = CardMotion::new(self.config);
                return ignored(reason);
            }
        };

        let exit_id = self.next_exit_id;
        self.next_exit_id += 1;
        let card_id = ticket.item_id().to_string();
        self.pending = Some(PendingExit {
            exit_id,
            ticket,
            decision,
        });

        tracing::debug!(exit_id, card_id = %card_id, ?direction, "Exit animation started");

        SessionEvent::ExitStarted {
            exit_id,
            card_id,
            direction,
            duration,
        }
    }

    /// Completion of the exit animation started by [`swipe`](Self::swipe).
    ///
    /// Completions for exits that were cancelled or already finished are
    /// ignored as stale.
    pub fn finish_exit(&mut self, exit_id: u64) -> Result<SessionEvent, StorageError> {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.exit_id == exit_id);
        if !is_current {
            return Ok(ignored(IgnoreReason::Stale));
        }

        let Some(pending) = self.pending.take() else {
            return Ok(ignored(IgnoreReason::Stale));
        };
        if self.motion.finish_exit().is_none() {
            self.deck.abandon(pending.ticket);
            self.clear_motion();
            return Ok(ignored(IgnoreReason::Stale));
        }

        let result = self
            .deck
            .complete_commit(pending.ticket, pending.decision, &mut self.store);
        self.settle(result)
    }

    /// Abandon an exit animation that will never complete (the card was
    /// torn down). The card returns to rest and nothing is recorded.
    pub fn cancel_exit(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.deck.abandon(pending.ticket);
        self.motion = CardMotion::new(self.config);
        true
    }

    /// Start over from the first card. Decisions are kept.
    pub fn reset(&mut self) {
        self.deck.reset();
        self.clear_motion();
    }

    pub fn snapshot(&self) -> DeckSnapshot<T> {
        DeckSnapshot {
            cursor: self.deck.cursor(),
            total: self.deck.len(),
            exhausted: self.deck.is_exhausted(),
            window: self.deck.window().to_vec(),
            motion: self.motion.state(),
            transform: self.motion.transform(),
        }
    }

    pub fn deck(&self) -> &Deck<T> {
        &self.deck
    }

    pub fn saved_ids(&self) -> Vec<EventId> {
        self.store.all(DecisionSet::Saved)
    }

    pub fn dismissed_ids(&self) -> Vec<EventId> {
        self.store.all(DecisionSet::Dismissed)
    }

    pub fn unsave(&mut self, id: &str) -> Result<bool, StorageError> {
        self.store.remove(DecisionSet::Saved, id)
    }

    pub fn clear_dismissed(&mut self) -> Result<(), StorageError> {
        self.store.clear(DecisionSet::Dismissed)
    }

    /// Map a commit result onto the session, giving the next top card a
    /// fresh motion state.
    fn settle(
        &mut self,
        result: Result<CommitOutcome, StorageError>,
    ) -> Result<SessionEvent, StorageError> {
        self.motion = CardMotion::new(self.config);
        match result? {
            CommitOutcome::Committed { id, decision } => {
                tracing::debug!(id = %id, ?decision, cursor = self.deck.cursor(), "Decision committed");
                Ok(SessionEvent::Committed { id, decision })
            }
            CommitOutcome::Ignored(reason) => Ok(ignored(reason)),
        }
    }

    fn clear_motion(&mut self) {
        self.pending = None;
        self.motion = CardMotion::new(self.config);
    }
}

fn ignored(reason: IgnoreReason) -> SessionEvent {
    SessionEvent::Ignored { reason }
}
