//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for creates and patches

pub mod action_item;
pub mod category;
pub mod hierarchy;
pub mod next_step;
pub mod transcript;
