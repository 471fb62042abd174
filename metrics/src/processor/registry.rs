use super::builder::{CONTENT_CATEGORY_FIELD, COUNTRY_FIELD, INSTRUMENT_FIELD, STATION_FIELD};
use crate::models::FilterDimension;
use common::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

static DEFAULT_REGISTRY: Lazy<Arc<FilterRegistry>> = Lazy::new(|| {
    Arc::new(FilterRegistry::new([
        (FilterDimension::Dataset, CONTENT_CATEGORY_FIELD),
        (FilterDimension::Country, COUNTRY_FIELD),
        (FilterDimension::Station, STATION_FIELD),
        (FilterDimension::Network, INSTRUMENT_FIELD),
    ]))
});

/// Read-only mapping from filter dimension to the document field it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRegistry {
    fields: BTreeMap<FilterDimension, String>,
}

impl FilterRegistry {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FilterDimension, S)>,
        S: Into<String>,
    {
        Self {
            fields: entries
                .into_iter()
                .map(|(dimension, field)| (dimension, field.into()))
                .collect(),
        }
    }

    /// Shared registry for the data registry's document schema.
    pub fn global() -> Arc<FilterRegistry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    pub fn field(&self, dimension: FilterDimension) -> Result<&str> {
        self.fields
            .get(&dimension)
            .map(String::as_str)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "no document field registered for filter dimension '{}'",
                    dimension
                ))
            })
    }
}
