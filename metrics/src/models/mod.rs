mod aggregation;
mod request;

pub use aggregation::{Aggregation, AggregationKind, AggregationQuery, AggregationResponse, Aggregations};
pub use request::{Domain, FilterDimension, MetricRequest, Timescale};
