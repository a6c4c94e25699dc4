use vitrine_core::caption::ContactHandles;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the snapshot rendering service. Unset means the
    /// server runs on the in-process capture tier alone.
    pub render_api_url: Option<String>,
    /// Timeout for a single snapshot render call in seconds (default: `20`).
    pub render_timeout_secs: u64,
    /// Settle delay between staging a slide and rendering it, in
    /// milliseconds (default: `150`).
    pub settle_ms: u64,
    /// Object storage provider selection.
    pub storage: StorageConfig,
    /// Base URL of the social platform publishing API.
    pub social_api_url: String,
    /// Bearer token for the publishing API, if the deployment requires one.
    pub social_api_token: Option<String>,
    /// Studio Instagram handle appended to generated captions.
    pub contact_instagram: Option<String>,
    /// Studio Facebook page name appended to generated captions.
    pub contact_facebook: Option<String>,
    /// Studio LinkedIn page name appended to generated captions.
    pub contact_linkedin: Option<String>,
}

/// Which object storage provider to wire at startup.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    S3 {
        bucket: String,
        region: String,
        public_base_url: String,
    },
    Memory,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                             |
    /// | `PORT`                 | `3000`                                |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`               |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                  |
    /// | `RENDER_API_URL`       | unset (capture tier only)             |
    /// | `RENDER_TIMEOUT_SECS`  | `20`                                  |
    /// | `SETTLE_MS`            | `150`                                 |
    /// | `STORAGE_BACKEND`      | `memory` (`s3` for deployments)       |
    /// | `S3_BUCKET`            | required when `STORAGE_BACKEND=s3`    |
    /// | `S3_REGION`            | `us-east-1`                           |
    /// | `S3_PUBLIC_BASE_URL`   | `https://{bucket}.s3.{region}.amazonaws.com` |
    /// | `SOCIAL_API_URL`       | `http://localhost:8787`               |
    /// | `SOCIAL_API_TOKEN`     | unset                                 |
    /// | `STUDIO_INSTAGRAM`     | unset                                 |
    /// | `STUDIO_FACEBOOK`      | unset                                 |
    /// | `STUDIO_LINKEDIN`      | unset                                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let render_timeout_secs: u64 = std::env::var("RENDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("RENDER_TIMEOUT_SECS must be a valid u64");

        let settle_ms: u64 = std::env::var("SETTLE_MS")
            .unwrap_or_else(|_| "150".into())
            .parse()
            .expect("SETTLE_MS must be a valid u64");

        let storage = Self::storage_from_env();

        let social_api_url =
            std::env::var("SOCIAL_API_URL").unwrap_or_else(|_| "http://localhost:8787".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            render_api_url: optional("RENDER_API_URL"),
            render_timeout_secs,
            settle_ms,
            storage,
            social_api_url,
            social_api_token: optional("SOCIAL_API_TOKEN"),
            contact_instagram: optional("STUDIO_INSTAGRAM"),
            contact_facebook: optional("STUDIO_FACEBOOK"),
            contact_linkedin: optional("STUDIO_LINKEDIN"),
        }
    }

    fn storage_from_env() -> StorageConfig {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".into());
        match backend.as_str() {
            "memory" => StorageConfig::Memory,
            "s3" => {
                let bucket = std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into());
                let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| format!("https://{bucket}.s3.{region}.amazonaws.com"));
                StorageConfig::S3 {
                    bucket,
                    region,
                    public_base_url,
                }
            }
            other => panic!("STORAGE_BACKEND must be 'memory' or 's3', got '{other}'"),
        }
    }

    /// Studio contact handles for the caption generator.
    pub fn contact_handles(&self) -> ContactHandles {
        ContactHandles {
            instagram: self.contact_instagram.clone(),
            facebook: self.contact_facebook.clone(),
            linkedin: self.contact_linkedin.clone(),
        }
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
