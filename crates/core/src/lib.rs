//! Interaction core for eventdeck.
//!
//! Pure logic only: the swipe deck, the card motion state machine, the
//! persisted decision sets and the validation rules shared by every event
//! source. The only I/O seam is [`storage::KeyValueStore`].

pub mod category;
pub mod decisions;
pub mod deck;
pub mod error;
pub mod motion;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;
