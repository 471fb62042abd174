use axum::{
    routing::{get, post},
    Router,
    extract::{State, Path},
    Json
};
use std::sync::Arc;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::processor::{PROCESS_ID, ProcessDescription};
use crate::services::{AppError, MetricsService};
use super::models::{ApiResponse, ExecuteRequest};

pub async fn list_processes(
    State(service): State<Arc<MetricsService>>,
) -> Json<ApiResponse<Vec<ProcessDescription>>> {
    Json(ApiResponse::ok(vec![service.description()]))
}

pub async fn describe_process(
    Path(process_id): Path<String>,
    State(service): State<Arc<MetricsService>>,
) -> Result<Json<ApiResponse<ProcessDescription>>, AppError> {
    if process_id != PROCESS_ID {
        return Err(AppError::UnknownProcess(process_id));
    }

    Ok(Json(ApiResponse::ok(service.description())))
}

pub async fn execute_process(
    Path(process_id): Path<String>,
    State(service): State<Arc<MetricsService>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    if process_id != PROCESS_ID {
        return Err(AppError::UnknownProcess(process_id));
    }

    let result = service.execute(&request.inputs).await?;
    Ok(Json(ApiResponse::ok(result)))
}

// Define all API routes
pub fn routes(service: Arc<MetricsService>) -> Router {
    Router::new()
        .route("/processes", get(list_processes))
        .route("/processes/{process_id}", get(describe_process))
        .route("/processes/{process_id}/execution", post(execute_process))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregationQuery, AggregationResponse};
    use crate::storage::SearchIndex;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    struct StaticIndex;

    #[async_trait]
    impl SearchIndex for StaticIndex {
        async fn search(&self, query: &AggregationQuery) -> common::Result<AggregationResponse> {
            let mut aggregations = serde_json::Map::new();
            for name in query.aggregations.keys() {
                aggregations.insert(name.clone(), json!({ "doc_count": 1, "total_files": { "buckets": [] } }));
            }
            Ok(AggregationResponse {
                aggregations,
                metadata: Default::default(),
            })
        }

        fn index_name(&self) -> &str {
            "static"
        }
    }

    fn app() -> Router {
        routes(Arc::new(MetricsService::with_index(Arc::new(StaticIndex))))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_describe_process() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/processes/woudc-data-registry-metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["id"], json!(PROCESS_ID));
    }

    #[tokio::test]
    async fn test_execute_process() {
        let payload = json!({
            "inputs": { "domain": "dataset", "timescale": "month", "station": "077" }
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/processes/woudc-data-registry-metrics/execution")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["data"]["aggregations"],
            json!({ "total_files": { "buckets": [] } })
        );
    }

    #[tokio::test]
    async fn test_execute_invalid_input_is_bad_request() {
        let payload = json!({ "inputs": { "domain": "usage", "timescale": "year" } });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/processes/woudc-data-registry-metrics/execution")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("usage"));
    }

    #[tokio::test]
    async fn test_unknown_process_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/processes/hello-world/execution")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"inputs": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Unknown process 'hello-world'"));
        assert!(body.get("data").is_none());
    }
}
