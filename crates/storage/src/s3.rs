//! S3 object storage provider.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::{ObjectStorage, StorageError, StoredObject};

/// Stores objects in an S3 bucket fronted by a public base URL
/// (typically a CDN distribution over the bucket).
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Load AWS configuration from the environment and create a
    /// provider for `bucket` in `region`.
    ///
    /// * `public_base_url` - URL prefix under which stored keys are
    ///   publicly reachable, e.g. `https://assets.example.com`.
    pub async fn connect(bucket: String, region: String, public_base_url: String) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .load()
            .await;
        Self::with_client(aws_sdk_s3::Client::new(&config), bucket, public_base_url)
    }

    /// Create a provider reusing an existing S3 client (useful when
    /// several buckets share one set of credentials).
    pub fn with_client(
        client: aws_sdk_s3::Client,
        bucket: String,
        public_base_url: String,
    ) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn store(&self, bytes: Vec<u8>, key: &str) -> Result<StoredObject, StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type_for_key(key))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                detail: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(bucket = %self.bucket, key = %key, size, "Stored object");
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }
}

/// Content type from the key's extension. Unknown extensions upload as
/// raw bytes.
fn content_type_for_key(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_follow_the_extension() {
        assert_eq!(content_type_for_key("posts/3/slide-01-abc.png"), "image/png");
        assert_eq!(content_type_for_key("elements/logo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for_key("elements/waves.webp"), "image/webp");
        assert_eq!(content_type_for_key("no-extension"), "application/octet-stream");
    }
}
