use common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Statistic family served by a metrics request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Dataset,
    Contributor,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Dataset, Domain::Contributor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Dataset => "dataset",
            Domain::Contributor => "contributor",
        }
    }

    /// Filters accepted by this domain, outermost layer first.
    pub fn permitted_filters(&self) -> &'static [FilterDimension] {
        match self {
            Domain::Dataset => &[
                FilterDimension::Country,
                FilterDimension::Station,
                FilterDimension::Network,
            ],
            Domain::Contributor => &[
                FilterDimension::Dataset,
                FilterDimension::Station,
                FilterDimension::Network,
            ],
        }
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dataset" => Ok(Domain::Dataset),
            "contributor" => Ok(Domain::Contributor),
            other => Err(Error::InvalidArgument(format!(
                "unsupported domain '{}', expected one of: dataset, contributor",
                other
            ))),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timescale {
    Year,
    Month,
}

impl Timescale {
    pub const ALL: [Timescale; 2] = [Timescale::Year, Timescale::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timescale::Year => "year",
            Timescale::Month => "month",
        }
    }

    pub fn calendar_interval(&self) -> &'static str {
        match self {
            Timescale::Year => "1y",
            Timescale::Month => "1M",
        }
    }

    pub fn date_format(&self) -> &'static str {
        match self {
            Timescale::Year => "yyyy",
            Timescale::Month => "yyyy-MM",
        }
    }

    /// Name of the date histogram aggregation in base queries.
    pub fn bucket_name(&self) -> &'static str {
        match self {
            Timescale::Year => "yearly",
            Timescale::Month => "monthly",
        }
    }
}

impl FromStr for Timescale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "year" => Ok(Timescale::Year),
            "month" => Ok(Timescale::Month),
            other => Err(Error::InvalidArgument(format!(
                "unsupported timescale '{}', expected one of: year, month",
                other
            ))),
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Dataset,
    Country,
    Station,
    Network,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Dataset,
        FilterDimension::Country,
        FilterDimension::Station,
        FilterDimension::Network,
    ];

    /// Input key, and the name of the filter aggregation it produces.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Dataset => "dataset",
            FilterDimension::Country => "country",
            FilterDimension::Station => "station",
            FilterDimension::Network => "network",
        }
    }
}

impl FromStr for FilterDimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FilterDimension::ALL
            .into_iter()
            .find(|dimension| dimension.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown filter dimension '{}'", s)))
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated metrics request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRequest {
    pub domain: Domain,
    pub timescale: Timescale,
    pub filters: BTreeMap<FilterDimension, String>,
}

impl MetricRequest {
    pub fn new(domain: Domain, timescale: Timescale) -> Self {
        Self {
            domain,
            timescale,
            filters: BTreeMap::new(),
        }
    }

    /// Adds a filter, rejecting dimensions the domain groups by.
    pub fn with_filter(mut self, dimension: FilterDimension, value: impl Into<String>) -> Result<Self> {
        if !self.domain.permitted_filters().contains(&dimension) {
            return Err(Error::InvalidArgument(format!(
                "filter '{}' is not permitted for domain '{}'",
                dimension, self.domain
            )));
        }

        let value = value.into();
        if !value.is_empty() {
            self.filters.insert(dimension, value);
        }
        Ok(self)
    }

    /// Builds a request from the raw process inputs.
    pub fn from_inputs(inputs: &Map<String, Value>) -> Result<Self> {
        let domain: Domain = required_input(inputs, "domain")?.parse()?;
        let timescale: Timescale = required_input(inputs, "timescale")?.parse()?;

        let mut request = MetricRequest::new(domain, timescale);
        for (key, value) in inputs {
            if key == "domain" || key == "timescale" {
                continue;
            }

            let dimension: FilterDimension = key
                .parse()
                .map_err(|_| Error::InvalidArgument(format!("unknown input '{}'", key)))?;

            match value {
                Value::Null => {}
                Value::String(text) => request = request.with_filter(dimension, text.as_str())?,
                other => {
                    return Err(Error::InvalidArgument(format!(
                        "input '{}' must be a string, got {}",
                        key, other
                    )));
                }
            }
        }

        Ok(request)
    }
}

fn required_input<'a>(inputs: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match inputs.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(Error::InvalidArgument(format!(
            "input '{}' must be a string, got {}",
            key, other
        ))),
        None => Err(Error::InvalidArgument(format!("missing required input '{}'", key))),
    }
}
