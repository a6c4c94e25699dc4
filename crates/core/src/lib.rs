//! Pure domain logic for the vitrine publishing studio.
//!
//! Everything in this crate is side-effect-free: composition model types
//! and their invariants, the anchor/layout resolver, the caption
//! generator, the fallback-renderer style repair transform, the
//! moderation state machine, and shared error/ID types. No I/O, no
//! internal dependencies.

pub mod anchor;
pub mod caption;
pub mod color;
pub mod composition;
pub mod error;
pub mod moderation;
pub mod naming;
pub mod style_repair;
pub mod types;
