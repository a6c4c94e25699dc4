//! The publish pipeline: sequential carousel rendering and the
//! end-to-end publish flow.
//!
//! - [`SlideSurface`]: single-slot staging register for the shared
//!   rendering surface.
//! - [`CarouselOrchestrator`]: drives the renderer once per slide,
//!   strictly in order, through the surface.
//! - [`PostPublisher`]: chains validation, the moderation gate,
//!   rendering, ordered uploads and the platform publish call.

pub mod error;
pub mod orchestrator;
pub mod publisher;
pub mod surface;

pub use error::PublishError;
pub use orchestrator::{CarouselOrchestrator, RenderedSlide, DEFAULT_SETTLE};
pub use publisher::PostPublisher;
pub use surface::{SlideSurface, StagedSlide};
