//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and the acting owner's id as the
//! second. Every statement filters on `owner_id`; a row owned by someone
//! else is indistinguishable from a missing one.

pub mod action_item_repo;
pub mod category_repo;
pub mod hierarchy_repo;
pub mod next_step_repo;
pub mod transcript_repo;

pub use action_item_repo::ActionItemRepo;
pub use category_repo::CategoryRepo;
pub use hierarchy_repo::HierarchyRepo;
pub use next_step_repo::NextStepRepo;
pub use transcript_repo::TranscriptRepo;
