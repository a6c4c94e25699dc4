//! REST client for the social platform's publishing endpoint.
//!
//! Wraps `POST {base}/posts` using [`reqwest`]. The endpoint takes
//! camelCase bodies and answers `{id, permalink}`.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SocialApiError;
use crate::gateway::{PublishedPost, SocialGateway};

/// HTTP client for one social platform account.
pub struct SocialClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

/// Body of a single-image publish request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SinglePostRequest<'a> {
    image_url: &'a str,
    caption: &'a str,
}

/// Body of an atomic carousel publish request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CarouselPostRequest<'a> {
    image_urls: &'a [String],
    caption: &'a str,
    is_carousel: bool,
}

impl SocialClient {
    /// Create a client for the platform API.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `https://graph.example.com/v3`.
    /// * `access_token` - Bearer token; `None` for unauthenticated
    ///   local stand-ins.
    pub fn new(base_url: String, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    async fn post_json<B: Serialize>(&self, body: &B) -> Result<PublishedPost, SocialApiError> {
        let mut request = self
            .client
            .post(format!("{}/posts", self.base_url))
            .json(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`SocialApiError::Rejected`]
    /// carrying the status and verbatim body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SocialApiError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SocialApiError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body.
    async fn parse_response(response: reqwest::Response) -> Result<PublishedPost, SocialApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<PublishedPost>().await?)
    }
}

#[async_trait]
impl SocialGateway for SocialClient {
    async fn publish_single(
        &self,
        image_url: &str,
        caption: &str,
    ) -> Result<PublishedPost, SocialApiError> {
        let post = self
            .post_json(&SinglePostRequest { image_url, caption })
            .await?;
        tracing::info!(post_id = %post.id, "Published single-image post");
        Ok(post)
    }

    async fn publish_carousel(
        &self,
        image_urls: &[String],
        caption: &str,
    ) -> Result<PublishedPost, SocialApiError> {
        let post = self
            .post_json(&CarouselPostRequest {
                image_urls,
                caption,
                is_carousel: true,
            })
            .await?;
        tracing::info!(post_id = %post.id, slide_count = image_urls.len(), "Published carousel post");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use axum::extract::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    type Seen = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn recording_router(seen: Seen, reply: serde_json::Value) -> Router {
        Router::new().route(
            "/posts",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let seen = seen.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push((auth, body));
                    Json(reply)
                }
            }),
        )
    }

    #[tokio::test]
    async fn publish_single_sends_camel_case_body_and_token() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let reply = serde_json::json!({ "id": "17900001", "permalink": "https://sn.example/p/abc" });
        let base = serve(recording_router(seen.clone(), reply)).await;

        let client = SocialClient::new(base, Some("tok-123".to_string()));
        let post = client
            .publish_single("https://cdn.example/slide-01.png", "Mostra de Gravura")
            .await
            .unwrap();

        assert_eq!(post.id, "17900001");
        assert_eq!(post.permalink.as_deref(), Some("https://sn.example/p/abc"));

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (auth, body) = &calls[0];
        assert_eq!(auth.as_deref(), Some("Bearer tok-123"));
        assert_eq!(body["imageUrl"], "https://cdn.example/slide-01.png");
        assert_eq!(body["caption"], "Mostra de Gravura");
    }

    #[tokio::test]
    async fn publish_carousel_is_one_atomic_ordered_request() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let reply = serde_json::json!({ "id": "17900002" });
        let base = serve(recording_router(seen.clone(), reply)).await;

        let urls = vec![
            "https://cdn.example/slide-01.png".to_string(),
            "https://cdn.example/slide-02.png".to_string(),
            "https://cdn.example/slide-03.png".to_string(),
        ];
        let client = SocialClient::new(base, None);
        let post = client.publish_carousel(&urls, "Agenda da semana").await.unwrap();

        assert_eq!(post.id, "17900002");
        assert_eq!(post.permalink, None);

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 1, "carousel must be a single request");
        let (auth, body) = &calls[0];
        assert_eq!(auth.as_deref(), None);
        assert_eq!(body["isCarousel"], true);
        let sent: Vec<&str> = body["imageUrls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            sent,
            vec![
                "https://cdn.example/slide-01.png",
                "https://cdn.example/slide-02.png",
                "https://cdn.example/slide-03.png",
            ]
        );
    }

    #[tokio::test]
    async fn rejection_carries_the_remote_detail_verbatim() {
        let router = Router::new().route(
            "/posts",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Media aspect ratio not supported for carousel item 2",
                )
            }),
        );

        let client = SocialClient::new(serve(router).await, None);
        let result = client.publish_single("https://cdn.example/a.png", "x").await;
        assert_matches!(
            result,
            Err(SocialApiError::Rejected { status: 422, ref detail })
                if detail == "Media aspect ratio not supported for carousel item 2"
        );
    }

    #[tokio::test]
    async fn transport_failures_are_request_errors() {
        // Nothing listens on this port.
        let client = SocialClient::new("http://127.0.0.1:9".to_string(), None);
        let result = client.publish_single("https://cdn.example/a.png", "x").await;
        assert_matches!(result, Err(SocialApiError::Request(_)));
    }
}
