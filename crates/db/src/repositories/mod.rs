//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod event_repo;
pub mod moderation_repo;
pub mod post_repo;
pub mod slide_repo;

pub use event_repo::EventRepo;
pub use moderation_repo::ModerationRepo;
pub use post_repo::PostRepo;
pub use slide_repo::SlideRepo;
