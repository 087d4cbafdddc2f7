use super::{RecordSource, SourceError};

/// Sensor document served over HTTP(S).
///
/// Uses the client's default timeouts; a failed fetch is never retried.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str, client: reqwest::Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> &'static str {
        "http"
    }

    async fn fetch_text(&self) -> Result<String, SourceError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status,
            });
        }

        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{fetch_records, load};
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    async fn spawn_server() -> SocketAddr {
        let app = Router::new()
            .route(
                "/10.json",
                get(|| async {
                    r#"{"data": [[7, "2024-05-02T12:00:00Z", 40.5], [7, "2024-05-01T12:00:00Z", 38]]}"#
                }),
            )
            .route("/gone.json", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken.json", get(|| async { "<html>" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn fetches_records_over_http() {
        let addr = spawn_server().await;
        let client = reqwest::Client::new();

        let records = fetch_records(&format!("http://{addr}/10.json"), &client)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field(1).unwrap(), "2024-05-01T12:00:00Z");
        assert_eq!(records[1].field(1).unwrap(), "2024-05-02T12:00:00Z");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let addr = spawn_server().await;
        let src = HttpSource::new(&format!("http://{addr}/gone.json"), reqwest::Client::new());

        let err = src.fetch_text().await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn failures_degrade_to_empty() {
        let addr = spawn_server().await;
        let client = reqwest::Client::new();

        assert!(load(&format!("http://{addr}/gone.json"), &client).await.is_empty());
        assert!(load(&format!("http://{addr}/broken.json"), &client).await.is_empty());
        // Nothing listens on port 9 on loopback.
        assert!(load("http://127.0.0.1:9/10.json", &client).await.is_empty());
    }
}
