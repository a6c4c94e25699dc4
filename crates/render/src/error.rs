//! Error type shared by both rendering tiers.

/// Errors from the snapshot and capture rendering paths.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The snapshot service did not answer within the configured
    /// timeout.
    #[error("Snapshot service timed out")]
    Timeout,

    /// The snapshot service returned a non-2xx status code.
    #[error("Snapshot service error ({status}): {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A style declaration uses a color function the capture engine
    /// cannot parse.
    #[error("Unsupported color space in '{property}': {value}")]
    UnsupportedColorSpace { property: String, value: String },

    /// The renderer produced an empty or zero-dimension image. Callers
    /// treat this as "could not generate", never a crash.
    #[error("Renderer produced an empty image")]
    EmptyOutput,

    /// The capture engine failed to rasterize the cloned tree.
    #[error("Capture failed: {0}")]
    Capture(String),
}
