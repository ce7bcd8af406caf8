//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct and, where it differs, its `FromRow` row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod event;
