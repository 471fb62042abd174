pub mod elasticsearch;

pub use elasticsearch::ElasticsearchIndex;

use crate::models::{AggregationQuery, AggregationResponse};
use async_trait::async_trait;
use common::{Error, Result};
use url::Url;

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Runs an aggregation query and returns the raw response.
    async fn search(&self, query: &AggregationQuery) -> Result<AggregationResponse>;
    fn index_name(&self) -> &str;
}

/// Location of a search index, parsed from `scheme://host[:port]/.../index-name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEndpoint {
    pub base: Url,
    pub index: String,
}

impl IndexEndpoint {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Configuration(format!(
                "unsupported search index scheme '{}' in {}",
                url.scheme(),
                raw
            )));
        }
        if url.host_str().is_none() {
            return Err(Error::Configuration(format!("no host in search index URL {}", raw)));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let (index, prefix) = match segments.split_last() {
            Some((index, prefix)) => (index.to_string(), prefix),
            None => {
                return Err(Error::Configuration(format!(
                    "no index name in search index URL {}",
                    raw
                )));
            }
        };

        let mut base = url.clone();
        base.set_query(None);
        base.set_fragment(None);
        let mut path = String::from("/");
        for segment in prefix {
            path.push_str(segment);
            path.push('/');
        }
        base.set_path(&path);

        Ok(Self { base, index })
    }

    pub fn index_url(&self) -> Result<Url> {
        Ok(self.base.join(&self.index)?)
    }

    pub fn search_url(&self) -> Result<Url> {
        Ok(self.base.join(&format!("{}/_search", self.index))?)
    }
}
