pub mod admin_events;
pub mod deck;
pub mod events;
pub mod saved;
