use super::{IndexEndpoint, SearchIndex};
use crate::models::{AggregationQuery, AggregationResponse};
use async_trait::async_trait;
use common::{Error, Result};
use serde_json::Value;
use tracing::{debug, info};

/// Oldest search index major version whose aggregation DSL we emit.
pub const MIN_MAJOR_VERSION: u32 = 7;

pub struct ElasticsearchIndex {
    client: reqwest::Client,
    endpoint: IndexEndpoint,
}

impl ElasticsearchIndex {
    /// Connects to the index at `url`, checking the server version and
    /// that the index exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let endpoint = IndexEndpoint::parse(url)?;
        let client = reqwest::Client::builder().build()?;

        let response = client
            .get(endpoint.base.clone())
            .send()
            .await
            .map_err(|e| {
                Error::Connection(format!("cannot reach search index at {}: {}", endpoint.base, e))
            })?;
        if !response.status().is_success() {
            return Err(Error::Connection(format!(
                "search index at {} answered {}",
                endpoint.base,
                response.status()
            )));
        }

        let info: Value = serde_json::from_str(&response.text().await?)?;
        let version = major_version(&info)?;
        if version < MIN_MAJOR_VERSION {
            return Err(Error::Connection(format!(
                "search index version {} is not supported, need {} or newer",
                version, MIN_MAJOR_VERSION
            )));
        }

        let index_url = endpoint.index_url()?;
        let status = client
            .head(index_url.clone())
            .send()
            .await
            .map_err(|e| Error::Connection(format!("cannot reach index {}: {}", index_url, e)))?
            .status();
        if !status.is_success() {
            return Err(Error::Connection(format!(
                "index '{}' is not available ({})",
                endpoint.index, status
            )));
        }

        info!(
            base = %endpoint.base,
            index = %endpoint.index,
            version,
            "Connected to search index"
        );

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn search(&self, query: &AggregationQuery) -> Result<AggregationResponse> {
        let body = serde_json::to_vec(query)?;
        debug!(index = %self.endpoint.index, query = %String::from_utf8_lossy(&body), "Sending search");

        let response = self
            .client
            .post(self.endpoint.search_url()?)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::UpstreamQuery(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::UpstreamQuery(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::UpstreamQuery(format!("{}: {}", status, text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::UpstreamQuery(format!("undecodable search response ({}): {}", e, text))
        })
    }

    fn index_name(&self) -> &str {
        &self.endpoint.index
    }
}

/// Reads the major version from the server info document.
pub fn major_version(info: &Value) -> Result<u32> {
    let number = info
        .pointer("/version/number")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Connection("search index did not report a version".to_string()))?;

    number
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
        .ok_or_else(|| Error::Connection(format!("unrecognised search index version '{}'", number)))
}
