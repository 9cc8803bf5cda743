//! gRPC client for the Xray stats service.

use std::time::Duration;

use async_trait::async_trait;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Endpoint;
use tracing::debug;
use xtally_config::XrayConfig;

use crate::aggregator::CounterSample;
use crate::error::StatsError;
use crate::proto::{QUERY_STATS_PATH, QueryStatsRequest, QueryStatsResponse};
use crate::source::StatsSource;

/// Counter name prefix shared by all per-user counters.
pub const USER_COUNTER_PATTERN: &str = "user>>>";

/// Client for `StatsService/QueryStats` over plaintext HTTP/2.
///
/// A fresh connection is made for every call; polls are minutes apart and
/// the API listener is usually local.
#[derive(Debug, Clone)]
pub struct StatsClient {
    endpoint: Endpoint,
    pattern: String,
}

impl StatsClient {
    /// Create a client for `uri` (e.g. `http://127.0.0.1:8080`).
    ///
    /// `timeout` bounds both connecting and the call itself.
    pub fn new(uri: impl Into<String>, timeout: Duration) -> Result<Self, StatsError> {
        let uri = uri.into();
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| StatsError::InvalidEndpoint(format!("{uri}: {e}")))?
            .connect_timeout(timeout)
            .timeout(timeout);
        Ok(Self {
            endpoint,
            pattern: USER_COUNTER_PATTERN.to_string(),
        })
    }

    /// Build from the `xray` config section.
    pub fn from_config(config: &XrayConfig) -> Result<Self, StatsError> {
        Self::new(
            config.endpoint(),
            Duration::from_secs(config.stats_timeout_secs),
        )
    }

    /// Override the server-side name filter. Empty queries every counter.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Target URI.
    pub fn uri(&self) -> String {
        self.endpoint.uri().to_string()
    }

    async fn query_stats(&self, reset: bool) -> Result<QueryStatsResponse, StatsError> {
        let channel = self.endpoint.connect().await?;
        let mut grpc = tonic::client::Grpc::new(channel);
        grpc.ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("service was not ready: {e}")))?;

        let request = QueryStatsRequest {
            pattern: self.pattern.clone(),
            reset,
            ..Default::default()
        };
        let codec: ProstCodec<QueryStatsRequest, QueryStatsResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static(QUERY_STATS_PATH);

        let response = grpc
            .unary(tonic::Request::new(request), path, codec)
            .await?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl StatsSource for StatsClient {
    async fn query_counters(&self, reset: bool) -> Result<Vec<CounterSample>, StatsError> {
        let response = self.query_stats(reset).await?;
        debug!(
            counters = response.stat.len(),
            reset = reset,
            "stats counters received"
        );
        Ok(response
            .stat
            .into_iter()
            .map(|s| CounterSample::new(s.name, s.value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_uri() {
        let result = StatsClient::new("http://exa mple:80", Duration::from_secs(1));
        assert!(matches!(result, Err(StatsError::InvalidEndpoint(_))));
    }

    #[test]
    fn builds_from_config() {
        let client = StatsClient::from_config(&XrayConfig::default()).unwrap();
        assert!(client.uri().starts_with("http://127.0.0.1:8080"));
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = StatsClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        assert!(client.query_counters(false).await.is_err());
    }
}
