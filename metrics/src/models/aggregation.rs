use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Named child aggregations of a query or bucketing node.
pub type Aggregations = BTreeMap<String, Aggregation>;

/// A search request that returns no hits, only aggregation buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationQuery {
    pub size: u32,
    pub aggregations: Aggregations,
}

impl AggregationQuery {
    pub fn new(aggregations: Aggregations) -> Self {
        Self {
            size: 0,
            aggregations,
        }
    }
}

/// One level of an aggregation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(flatten)]
    pub kind: AggregationKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregations: Aggregations,
}

impl Aggregation {
    pub fn new(kind: AggregationKind) -> Self {
        Self {
            kind,
            aggregations: Aggregations::new(),
        }
    }

    pub fn with_child(mut self, name: impl Into<String>, child: Aggregation) -> Self {
        self.aggregations.insert(name.into(), child);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    /// `{"filter": {"term": {field: value}}}`
    Filter { term: BTreeMap<String, String> },
    Terms { field: String, size: u32 },
    DateHistogram {
        field: String,
        calendar_interval: String,
        format: String,
    },
    Sum { field: String },
}

impl AggregationKind {
    pub fn term_filter(field: impl Into<String>, value: impl Into<String>) -> Self {
        let mut term = BTreeMap::new();
        term.insert(field.into(), value.into());
        AggregationKind::Filter { term }
    }
}

/// Search index response; only `aggregations` is interpreted, the rest is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregationResponse {
    #[serde(default)]
    pub aggregations: Map<String, Value>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}
