//! Remote mirror for raw events.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use xtally_config::MirrorConfig;
use xtally_core::ConnectionEvent;

use crate::error::IngestError;

/// Destination for batched event exports.
#[async_trait]
pub trait Mirror: Send + Sync {
    /// Export one batch. The caller discards the batch whatever the outcome.
    async fn export(&self, events: &[ConnectionEvent]) -> Result<(), IngestError>;
}

#[derive(Serialize)]
struct ExportBody<'a> {
    records: &'a [ConnectionEvent],
}

/// Mirror that POSTs `{"records": [...]}` as JSON.
pub struct HttpMirror {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpMirror {
    /// Create a mirror with its own client and request timeout.
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, IngestError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url, token))
    }

    /// Create with a custom reqwest [`Client`].
    pub fn with_client(client: Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }

    /// Build from config. Returns `None` when no URL is configured.
    pub fn from_config(config: &MirrorConfig) -> Result<Option<Self>, IngestError> {
        let Some(ref url) = config.url else {
            return Ok(None);
        };
        Self::new(
            url.clone(),
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Mirror for HttpMirror {
    async fn export(&self, events: &[ConnectionEvent]) -> Result<(), IngestError> {
        let mut req = self.client.post(&self.url);
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let resp = req.json(&ExportBody { records: events }).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IngestError::MirrorRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

// Debug implementation (don't leak the token)
impl std::fmt::Debug for HttpMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMirror")
            .field("url", &self.url)
            .field("has_token", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    fn event(user: &str) -> ConnectionEvent {
        ConnectionEvent {
            user: user.into(),
            ip: "203.0.113.5".into(),
            target: "example.com:443".into(),
            inbound: "in1".into(),
            outbound: "out1".into(),
            request_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            server: "tokyo-1".into(),
        }
    }

    /// Accept one HTTP request, answer with `status`/`body`, and return the
    /// raw request text.
    async fn respond_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/insert", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let l = l.to_ascii_lowercase();
                            l.strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8(buf).unwrap()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn posts_records_with_bearer_token() {
        let (url, server) = respond_once("200 OK", "{}").await;
        let mirror = HttpMirror::new(url, Some("secret".into()), Duration::from_secs(5)).unwrap();

        mirror.export(&[event("alice"), event("bob")]).await.unwrap();

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /insert HTTP/1.1"));
        assert!(lower.contains("authorization: bearer secret"));
        assert!(lower.contains("content-type: application/json"));

        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        let records = json["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["user"], "alice");
        assert_eq!(records[0]["request_time"], "2024-01-01 10:00:00");
        assert_eq!(records[1]["user"], "bob");
    }

    #[tokio::test]
    async fn non_success_status_carries_body() {
        let (url, server) = respond_once("500 Internal Server Error", "d1 unavailable").await;
        let mirror = HttpMirror::new(url, None, Duration::from_secs(5)).unwrap();

        let err = mirror.export(&[event("alice")]).await.unwrap_err();
        match err {
            IngestError::MirrorRejected { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "d1 unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }

        let request = server.await.unwrap();
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mirror =
            HttpMirror::new(format!("http://{addr}/"), None, Duration::from_secs(5)).unwrap();
        let err = mirror.export(&[event("alice")]).await.unwrap_err();
        assert!(matches!(err, IngestError::Mirror(_)));
    }

    #[test]
    fn from_config_without_url_is_none() {
        let config = MirrorConfig::default();
        assert!(HttpMirror::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn debug_hides_token() {
        let mirror =
            HttpMirror::with_client(Client::new(), "https://example.com/", Some("secret".into()));
        let debug = format!("{mirror:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("has_token: true"));
    }
}
