//! AI-backed flows over the category hierarchy.
//!
//! Each flow is a free function taking the pool, the owner and whichever AI
//! clients it needs. The shape is always the same: build a prompt, call the
//! model, normalize and validate the reply, and only then hand typed data to
//! the upsert engine. A reply that fails normalization or validation never
//! reaches a write.

pub mod combine;
pub mod enhance;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod refine;

mod structured;

pub use error::PipelineError;
