/// Event identifiers are opaque strings assigned by the event source.
pub type EventId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
