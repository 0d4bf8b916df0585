//! TaskVox domain core.
//!
//! Pure logic with no I/O: identifier types, the domain error type,
//! status constants, the AI response normalizer, the structure validator,
//! prompt builders and the row-grouping utility used to rebuild nested
//! category trees.

pub mod combine;
pub mod error;
pub mod grouping;
pub mod normalize;
pub mod prompts;
pub mod status;
pub mod structure;
pub mod types;
