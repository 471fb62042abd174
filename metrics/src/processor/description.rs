use crate::models::{Domain, FilterDimension, Timescale};
use serde::Serialize;
use serde_json::{Value, json};

pub const PROCESS_ID: &str = "woudc-data-registry-metrics";

/// Process metadata advertised to the hosting framework.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessDescription {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: Vec<String>,
    pub links: Vec<Value>,
    pub inputs: Vec<ProcessInput>,
    pub outputs: Vec<ProcessOutput>,
    pub example: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInput {
    pub id: &'static str,
    pub title: &'static str,
    pub literal_data_domain: LiteralDataDomain,
    pub min_occurs: u32,
    pub max_occurs: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralDataDomain {
    pub data_type: &'static str,
    pub value_definition: ValueDefinition,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDefinition {
    pub any_value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutput {
    pub id: &'static str,
    pub title: &'static str,
    pub output: Value,
}

fn choice(id: &'static str, title: &'static str, options: Vec<&'static str>) -> ProcessInput {
    ProcessInput {
        id,
        title,
        literal_data_domain: LiteralDataDomain {
            data_type: "string",
            value_definition: ValueDefinition {
                any_value: false,
                options: Some(options),
            },
        },
        min_occurs: 1,
        max_occurs: 1,
    }
}

fn filter(dimension: FilterDimension) -> ProcessInput {
    let title = match dimension {
        FilterDimension::Dataset => "Dataset Filter",
        FilterDimension::Country => "Country Filter",
        FilterDimension::Station => "Station Filter",
        FilterDimension::Network => "Instrument Filter",
    };

    ProcessInput {
        id: dimension.as_str(),
        title,
        literal_data_domain: LiteralDataDomain {
            data_type: "string",
            value_definition: ValueDefinition {
                any_value: true,
                options: None,
            },
        },
        min_occurs: 0,
        max_occurs: 1,
    }
}

impl ProcessDescription {
    pub fn metrics() -> Self {
        let mut inputs = vec![
            choice(
                "domain",
                "Metric Domain",
                Domain::ALL.iter().map(Domain::as_str).collect(),
            ),
            choice(
                "timescale",
                "Time Scale",
                Timescale::ALL.iter().map(Timescale::as_str).collect(),
            ),
        ];
        inputs.extend(FilterDimension::ALL.into_iter().map(filter));

        Self {
            id: PROCESS_ID,
            title: "WOUDC Data Registry Metrics Provider",
            description: "An extension of the WOUDC Data Registry search index, providing an API \
                          for metrics queries that assess file submission and/or usage statistics.",
            keywords: Vec::new(),
            links: Vec::new(),
            inputs,
            outputs: vec![ProcessOutput {
                id: "woudc-data-registry-metrics-response",
                title: "WOUDC Data Registry Metrics Output",
                output: json!({ "formats": [{ "mimeType": "application/json" }] }),
            }],
            example: json!({
                "inputs": [
                    { "id": "domain", "type": "text/plain", "value": "dataset" },
                    { "id": "timescale", "type": "text/plain", "value": "year" },
                    { "id": "network", "type": "text/plain", "value": "Brewer" },
                    { "id": "country", "type": "text/plain", "value": "CAN" }
                ]
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_inputs() {
        let description = serde_json::to_value(ProcessDescription::metrics()).unwrap();

        assert_eq!(description["id"], json!(PROCESS_ID));
        let inputs = description["inputs"].as_array().unwrap();
        let ids: Vec<&str> = inputs.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(
            ids,
            vec!["domain", "timescale", "dataset", "country", "station", "network"]
        );

        assert_eq!(
            inputs[0]["literalDataDomain"]["valueDefinition"]["options"],
            json!(["dataset", "contributor"])
        );
        assert_eq!(inputs[1]["minOccurs"], json!(1));
        assert_eq!(inputs[5]["title"], json!("Instrument Filter"));
        assert_eq!(inputs[5]["minOccurs"], json!(0));
        assert!(inputs[5]["literalDataDomain"]["valueDefinition"]
            .get("options")
            .is_none());
    }
}
