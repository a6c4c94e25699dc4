//! Publish gateway for the external social platform.
//!
//! The publish flow hands finished image URLs and a caption to this
//! crate; the platform answers with the permanent post id and
//! permalink. Carousels go up in one atomic request: the remote API
//! expands the ordered URL list into child media containers plus a
//! carousel container, so submitted order is display order and there
//! is no manual two-phase container dance on our side.

mod client;
mod error;
mod gateway;

pub use client::SocialClient;
pub use error::SocialApiError;
pub use gateway::{PublishedPost, SocialGateway};
