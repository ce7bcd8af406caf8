//! Swipe deck controller.
//!
//! A [`Deck`] owns the session's ordered items and a cursor. The visible
//! window is the top card plus up to two peek cards. Committing a decision
//! records it in the [`DecisionStore`] before the cursor moves, so a
//! failure between the two steps can never lose a decision the user saw
//! being taken.

use serde::Serialize;

use crate::decisions::{Decision, DecisionStore};
use crate::storage::{KeyValueStore, StorageError};
use crate::types::EventId;

/// Number of cards visible at once (top card plus two peek cards).
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Anything the deck can show must expose a stable id.
pub trait DeckItem {
    fn item_id(&self) -> &str;
}

/// Up to `size` items starting at `cursor`; empty once the cursor is past
/// the end.
pub fn window<T>(items: &[T], cursor: usize, size: usize) -> &[T] {
    if cursor >= items.len() {
        return &[];
    }
    let end = cursor.saturating_add(size).min(items.len());
    &items[cursor..end]
}

/// Why a commit did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No item left under the cursor.
    Exhausted,
    /// A commit for the current item has already started.
    InFlight,
    /// The ticket predates a reset or reload.
    Stale,
    /// The top card is being dragged or is already leaving.
    Busy,
}

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { id: EventId, decision: Decision },
    Ignored(IgnoreReason),
}

/// A claim on the current item, issued by [`Deck::begin_commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTicket {
    index: usize,
    generation: u64,
    id: EventId,
}

impl CommitTicket {
    pub fn item_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub struct Deck<T> {
    items: Vec<T>,
    cursor: usize,
    in_flight: bool,
    // Bumped on reset/reload so outstanding tickets become stale.
    generation: u64,
}

impl<T: DeckItem> Deck<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: 0,
            in_flight: false,
            generation: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Whether a commit has begun and not yet completed or been abandoned.
    pub fn is_commit_in_flight(&self) -> bool {
        self.in_flight
    }

    /// The top card, if any.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn window(&self) -> &[T] {
        window(&self.items, self.cursor, DEFAULT_WINDOW_SIZE)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Claim the current item for a commit.
    pub fn begin_commit(&mut self) -> Result<CommitTicket, IgnoreReason> {
        let Some(item) = self.items.get(self.cursor) else {
            return Err(IgnoreReason::Exhausted);
        };
        if self.in_flight {
            return Err(IgnoreReason::InFlight);
        }
        let ticket = CommitTicket {
            index: self.cursor,
            generation: self.generation,
            id: item.item_id().to_string(),
        };
        self.in_flight = true;
        Ok(ticket)
    }

    /// Record `decision` for the ticket's item, then advance the cursor.
    ///
    /// On a storage error the guard is released and the cursor stays put.
    pub fn complete_commit<S: KeyValueStore>(
        &mut self,
        ticket: CommitTicket,
        decision: Decision,
        store: &mut DecisionStore<S>,
    ) -> Result<CommitOutcome, StorageError> {
        if ticket.generation != self.generation || ticket.index != self.cursor {
            return Ok(CommitOutcome::Ignored(IgnoreReason::Stale));
        }

        if let Err(e) = store.record(decision, &ticket.id) {
            self.in_flight = false;
            return Err(e);
        }

        self.cursor += 1;
        self.in_flight = false;
        Ok(CommitOutcome::Committed {
            id: ticket.id,
            decision,
        })
    }

    /// Release a ticket without recording anything.
    pub fn abandon(&mut self, ticket: CommitTicket) {
        if ticket.generation == self.generation && ticket.index == self.cursor {
            self.in_flight = false;
        }
    }

    /// Begin and complete a commit for the current item in one step.
    pub fn commit<S: KeyValueStore>(
        &mut self,
        decision: Decision,
        store: &mut DecisionStore<S>,
    ) -> Result<CommitOutcome, StorageError> {
        match self.begin_commit() {
            Ok(ticket) => self.complete_commit(ticket, decision, store),
            Err(reason) => Ok(CommitOutcome::Ignored(reason)),
        }
    }

    /// Start over from the first item. Recorded decisions are kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.in_flight = false;
        self.generation += 1;
    }

    /// Swap in a freshly loaded item list and start from its beginning.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.reset();
    }
}
