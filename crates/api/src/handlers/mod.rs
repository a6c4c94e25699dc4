//! HTTP request handlers, grouped by resource.

pub mod asset;
pub mod moderation;
pub mod post;
pub mod publish;
pub mod slide;
