use super::registry::FilterRegistry;
use crate::models::{
    Aggregation, AggregationKind, AggregationQuery, AggregationResponse, Aggregations,
    FilterDimension,
};
use common::{Error, Result};
use serde_json::Value;

/// Wraps the whole aggregation tree of `query` in a filter layer named
/// after `dimension`. The input query is left untouched.
pub fn compose(
    query: &AggregationQuery,
    dimension: FilterDimension,
    value: &str,
    registry: &FilterRegistry,
) -> Result<AggregationQuery> {
    let field = registry.field(dimension)?;

    let layer = Aggregation {
        kind: AggregationKind::term_filter(field, value),
        aggregations: query.aggregations.clone(),
    };

    let mut aggregations = Aggregations::new();
    aggregations.insert(dimension.as_str().to_string(), layer);

    Ok(AggregationQuery {
        size: query.size,
        aggregations,
    })
}

/// Strips the filter layer named after `dimension` from the top of the
/// response aggregations.
pub fn decompose(
    response: &AggregationResponse,
    dimension: FilterDimension,
) -> Result<AggregationResponse> {
    let layer = match response.aggregations.get(dimension.as_str()) {
        Some(Value::Object(layer)) => layer,
        Some(_) => {
            return Err(Error::MalformedResponse(format!(
                "aggregation '{}' is not an object",
                dimension
            )));
        }
        None => {
            return Err(Error::MalformedResponse(format!(
                "response has no '{}' aggregation at its top level",
                dimension
            )));
        }
    };

    // The filter bucket's own count is not part of the wrapped subtree.
    let aggregations = layer
        .iter()
        .filter(|(key, _)| key.as_str() != "doc_count" && key.as_str() != "meta")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(AggregationResponse {
        aggregations,
        metadata: response.metadata.clone(),
    })
}

/// Filter layers applied to a query, in application order.
///
/// Unwinding a response walks the layers back in reverse, so every
/// composed layer is removed exactly once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterStack {
    applied: Vec<FilterDimension>,
}

impl FilterStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        query: &AggregationQuery,
        dimension: FilterDimension,
        value: &str,
        registry: &FilterRegistry,
    ) -> Result<AggregationQuery> {
        if self.applied.contains(&dimension) {
            return Err(Error::InvalidArgument(format!(
                "filter '{}' applied more than once",
                dimension
            )));
        }

        let composed = compose(query, dimension, value, registry)?;
        self.applied.push(dimension);
        Ok(composed)
    }

    /// Applied dimensions, innermost first.
    pub fn applied(&self) -> &[FilterDimension] {
        &self.applied
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn unwind(&self, response: AggregationResponse) -> Result<AggregationResponse> {
        self.applied
            .iter()
            .rev()
            .try_fold(response, |response, dimension| decompose(&response, *dimension))
    }
}
