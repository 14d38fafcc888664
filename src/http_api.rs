// HTTP surface: GET /flights -> 200 { flights } | 500 { message }

use crate::aggregator::{AggregateError, FlightSearch};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AggregateError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(search: Arc<dyn FlightSearch>) -> Router {
    Router::new()
        .route("/flights", get(get_flights))
        .with_state(search)
}

async fn get_flights(State(search): State<Arc<dyn FlightSearch>>) -> Response {
    match search.get_flights().await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{AggregateResult, FlightRecord, Slice};
    use crate::identifier::SynthesisError;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{Map, Value};
    use tower::ServiceExt;

    struct FixedSearch(Result<AggregateResult, AggregateError>);

    #[async_trait]
    impl FlightSearch for FixedSearch {
        async fn get_flights(&self) -> Result<AggregateResult, AggregateError> {
            self.0.clone()
        }
    }

    async fn get(search: FixedSearch, uri: &str) -> (StatusCode, Value) {
        let response = router(Arc::new(search))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_success_returns_flights() {
        let mut outbound = Slice::new("144", "2019-08-08T04:30:00.000Z");
        outbound.id = Some("1441565238600000".to_string());
        let mut inbound = Slice::new("8542", "2019-08-10T05:35:00.000Z");
        inbound.id = Some("85421565415300000".to_string());
        let result = AggregateResult {
            flights: vec![FlightRecord {
                slices: vec![outbound, inbound],
                extra: Map::new(),
            }],
        };

        let (status, body) = get(FixedSearch(Ok(result)), "/flights").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["flights"].as_array().unwrap().len(), 1);
        assert_eq!(body["flights"][0]["slices"][0]["id"], "1441565238600000");
    }

    #[tokio::test]
    async fn test_empty_success_is_still_ok() {
        let (status, body) = get(FixedSearch(Ok(AggregateResult::default())), "/flights").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "flights": [] }));
    }

    #[tokio::test]
    async fn test_sources_unavailable_is_500_with_message() {
        let (status, body) = get(
            FixedSearch(Err(AggregateError::SourcesUnavailable)),
            "/flights",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "message": "No flight sources available at the moment" })
        );
    }

    #[tokio::test]
    async fn test_invalid_flight_data_is_500() {
        let error = AggregateError::InvalidFlightData(SynthesisError::InvalidDeparture {
            flight_number: "144".to_string(),
            value: "soon".to_string(),
            reason: "input contains invalid characters".to_string(),
        });

        let (status, body) = get(FixedSearch(Err(error)), "/flights").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("144"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get(FixedSearch(Ok(AggregateResult::default())), "/hotels").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
