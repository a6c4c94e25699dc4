//! Publish gateway errors.

/// Errors from the social platform API layer.
#[derive(Debug, thiserror::Error)]
pub enum SocialApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform returned a non-2xx status code. `detail` carries
    /// the remote body verbatim; operators need the literal upstream
    /// reason, not a paraphrase.
    #[error("Publish rejected ({status}): {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        detail: String,
    },
}
