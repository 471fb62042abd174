mod builder;
mod compose;
mod description;
mod registry;

pub use builder::{contributor_query, dataset_query};
pub use compose::{FilterStack, compose, decompose};
pub use description::{PROCESS_ID, ProcessDescription};
pub use registry::FilterRegistry;

use crate::models::{
    AggregationQuery, AggregationResponse, Domain, FilterDimension, MetricRequest, Timescale,
};
use crate::storage::SearchIndex;
use common::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Answers metrics requests against the data registry search index.
pub struct MetricsProcessor {
    index: Arc<dyn SearchIndex>,
    registry: Arc<FilterRegistry>,
}

impl MetricsProcessor {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self {
            index,
            registry: FilterRegistry::global(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<FilterRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn description(&self) -> ProcessDescription {
        ProcessDescription::metrics()
    }

    /// Builds the filtered query for `request` along with the layers
    /// needed to unwrap its response.
    pub fn plan(&self, request: &MetricRequest) -> Result<(AggregationQuery, FilterStack)> {
        let permitted = request.domain.permitted_filters();
        if let Some(dimension) = request.filters.keys().find(|d| !permitted.contains(*d)) {
            return Err(Error::InvalidArgument(format!(
                "filter '{}' is not permitted for domain '{}'",
                dimension, request.domain
            )));
        }

        let mut query = match request.domain {
            Domain::Dataset => dataset_query(request.timescale),
            Domain::Contributor => contributor_query(request.timescale),
        };

        // Innermost first, so the first permitted filter ends up outermost.
        let mut stack = FilterStack::new();
        for dimension in permitted.iter().rev() {
            if let Some(value) = request.filters.get(dimension) {
                query = stack.push(&query, *dimension, value, &self.registry)?;
            }
        }

        Ok((query, stack))
    }

    pub async fn run(&self, request: &MetricRequest) -> Result<AggregationResponse> {
        let (query, stack) = self.plan(request)?;
        debug!(
            domain = %request.domain,
            timescale = %request.timescale,
            filters = ?stack.applied(),
            "Composed metrics query"
        );

        let response = self.index.search(&query).await?;
        let response = stack.unwind(response)?;

        info!(
            domain = %request.domain,
            timescale = %request.timescale,
            index = self.index.index_name(),
            "Served metrics request"
        );
        Ok(response)
    }

    pub async fn metrics_dataset(
        &self,
        timescale: Timescale,
        filters: &BTreeMap<FilterDimension, String>,
    ) -> Result<AggregationResponse> {
        self.run(&request_for(Domain::Dataset, timescale, filters)?).await
    }

    pub async fn metrics_contributor(
        &self,
        timescale: Timescale,
        filters: &BTreeMap<FilterDimension, String>,
    ) -> Result<AggregationResponse> {
        self.run(&request_for(Domain::Contributor, timescale, filters)?).await
    }

    /// Entry point for the hosting framework: raw inputs in, decomposed
    /// response out.
    pub async fn execute(&self, inputs: &Map<String, Value>) -> Result<Value> {
        let request = MetricRequest::from_inputs(inputs)?;
        let response = self.run(&request).await?;

        Ok(serde_json::to_value(response)?)
    }
}

impl fmt::Debug for MetricsProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<MetricsProcessor> {}", PROCESS_ID)
    }
}

fn request_for(
    domain: Domain,
    timescale: Timescale,
    filters: &BTreeMap<FilterDimension, String>,
) -> Result<MetricRequest> {
    filters
        .iter()
        .try_fold(MetricRequest::new(domain, timescale), |request, (dimension, value)| {
            request.with_filter(*dimension, value.as_str())
        })
}
