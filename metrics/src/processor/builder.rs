use crate::models::{Aggregation, AggregationKind, AggregationQuery, Aggregations, Timescale};

pub const CONTENT_CATEGORY_FIELD: &str = "properties.content_category";
pub const CONTENT_LEVEL_FIELD: &str = "properties.content_level";
pub const AGENCY_FIELD: &str = "properties.data_generation_agency";
pub const COUNTRY_FIELD: &str = "properties.platform_country";
pub const STATION_FIELD: &str = "properties.platform_id";
pub const INSTRUMENT_FIELD: &str = "properties.instrument_name";
pub const TIMESTAMP_FIELD: &str = "properties.timestamp_date";
pub const OBSERVATIONS_FIELD: &str = "properties.number_of_observations";

/// Upper bound on buckets returned by each terms aggregation.
pub const MAX_TERMS_BUCKETS: u32 = 10_000;

fn terms(field: &str) -> Aggregation {
    Aggregation::new(AggregationKind::Terms {
        field: field.to_string(),
        size: MAX_TERMS_BUCKETS,
    })
}

/// Date histogram for `timescale` with the observation count summed per bucket.
fn time_buckets(timescale: Timescale) -> Aggregation {
    Aggregation::new(AggregationKind::DateHistogram {
        field: TIMESTAMP_FIELD.to_string(),
        calendar_interval: timescale.calendar_interval().to_string(),
        format: timescale.date_format().to_string(),
    })
    .with_child(
        "total_obs",
        Aggregation::new(AggregationKind::Sum {
            field: OBSERVATIONS_FIELD.to_string(),
        }),
    )
}

fn grouped(outer: Aggregation, inner_name: &str, inner: Aggregation, timescale: Timescale) -> AggregationQuery {
    let inner = inner.with_child(timescale.bucket_name(), time_buckets(timescale));
    let outer = outer.with_child(inner_name, inner);

    AggregationQuery::new(Aggregations::from([("total_files".to_string(), outer)]))
}

/// File and observation counts per content category and level.
pub fn dataset_query(timescale: Timescale) -> AggregationQuery {
    grouped(
        terms(CONTENT_CATEGORY_FIELD),
        "levels",
        terms(CONTENT_LEVEL_FIELD),
        timescale,
    )
}

/// File and observation counts per contributing agency and country.
pub fn contributor_query(timescale: Timescale) -> AggregationQuery {
    grouped(terms(AGENCY_FIELD), "countries", terms(COUNTRY_FIELD), timescale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dataset_query_yearly() {
        let query = serde_json::to_value(dataset_query(Timescale::Year)).unwrap();

        assert_eq!(query["size"], json!(0));
        let total_files = &query["aggregations"]["total_files"];
        assert_eq!(total_files["terms"]["field"], json!(CONTENT_CATEGORY_FIELD));

        let levels = &total_files["aggregations"]["levels"];
        assert_eq!(levels["terms"]["field"], json!(CONTENT_LEVEL_FIELD));

        let yearly = &levels["aggregations"]["yearly"];
        assert_eq!(yearly["date_histogram"]["format"], json!("yyyy"));
        assert_eq!(yearly["date_histogram"]["calendar_interval"], json!("1y"));
        assert_eq!(
            yearly["aggregations"]["total_obs"]["sum"]["field"],
            json!(OBSERVATIONS_FIELD)
        );
    }

    #[test]
    fn test_dataset_query_monthly() {
        let query = serde_json::to_value(dataset_query(Timescale::Month)).unwrap();
        let monthly = &query["aggregations"]["total_files"]["aggregations"]["levels"]
            ["aggregations"]["monthly"];

        assert_eq!(monthly["date_histogram"]["format"], json!("yyyy-MM"));
        assert_eq!(monthly["date_histogram"]["calendar_interval"], json!("1M"));
    }

    #[test]
    fn test_contributor_query_groups_by_agency() {
        let query = serde_json::to_value(contributor_query(Timescale::Year)).unwrap();
        let total_files = &query["aggregations"]["total_files"];
        assert_eq!(total_files["terms"]["field"], json!(AGENCY_FIELD));

        let countries = &total_files["aggregations"]["countries"];
        assert_eq!(countries["terms"]["field"], json!(COUNTRY_FIELD));
        assert_eq!(countries["terms"]["size"], json!(MAX_TERMS_BUCKETS));
        assert!(countries["aggregations"]["yearly"]["aggregations"]["total_obs"].is_object());
    }
}
