use crate::processor::{MetricsProcessor, ProcessDescription};
use crate::storage::{ElasticsearchIndex, SearchIndex};
use common::Result;
use common::config::Settings;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub struct MetricsService {
    processor: MetricsProcessor,
}

impl MetricsService {
    /// Connects to the configured search index. Fails if the index is
    /// unreachable or too old, so no request is served unconfigured.
    pub async fn new(settings: &Settings) -> Result<Self> {
        let index = ElasticsearchIndex::connect(&settings.search.url).await?;
        info!(index = index.index_name(), "Metrics service ready");

        Ok(Self::with_index(Arc::new(index)))
    }

    pub fn with_index(index: Arc<dyn SearchIndex>) -> Self {
        Self {
            processor: MetricsProcessor::new(index),
        }
    }

    pub fn description(&self) -> ProcessDescription {
        self.processor.description()
    }

    pub async fn execute(&self, inputs: &Map<String, Value>) -> Result<Value> {
        self.processor.execute(inputs).await
    }
}
