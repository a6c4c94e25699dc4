//! Two-tier slide rendering.
//!
//! The primary tier posts a self-contained visual document to an
//! external snapshot service and gets raster bytes back. When that
//! fails for any reason, the fallback tier rasterizes a styled-tree
//! clone in-process through a pluggable capture engine. Lower
//! fidelity, but it keeps publishing alive.

pub mod capture;
pub mod document;
pub mod error;
pub mod output;
pub mod renderer;
pub mod snapshot;

pub use capture::{BlockRasterEngine, CaptureEngine, StyledNode};
pub use error::RenderError;
pub use output::RenderedImage;
pub use renderer::SlideRenderer;
pub use snapshot::SnapshotClient;

/// Edge length of the square output canvas, in CSS pixels.
pub const OUTPUT_SIZE: u32 = 1080;
