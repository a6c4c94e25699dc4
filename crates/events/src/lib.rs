//! Vitrine event bus infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StudioEvent`]: the canonical domain event envelope.
//! - [`EventPersistence`]: background service that durably writes every
//!   event to the `studio_events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, StudioEvent};
pub use persistence::EventPersistence;
