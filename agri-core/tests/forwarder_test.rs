//! Prediction forwarding against a mock ML service.

use agri_core::{
    AppState, ForwardError, PredictionProvider, PredictionResponse, router,
    error::START_HINT,
    provider::http::HttpPredictionProvider,
};
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn sample_payload() -> Value {
    json!({
        "cropType": "wheat",
        "area": "10",
        "soilPh": "6.5",
        "soilMoisture": "40",
        "nitrogen": "80",
        "phosphorus": "40",
        "potassium": "40",
        "temperature": "30.2",
        "rainfall": "700",
        "humidity": "65",
        "season": "rabi"
    })
}

fn provider(base_url: &str) -> HttpPredictionProvider {
    HttpPredictionProvider::new(base_url, Duration::from_secs(5)).unwrap()
}

/// A URL nothing is listening on.
async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn success_body_is_returned_unchanged() {
    let server = MockServer::start().await;
    let prediction = json!({
        "predictedYield": 3.75,
        "confidence": 82,
        "recommendations": ["Apply nitrogen in two splits"],
        "riskFactors": ["Low rainfall"]
    });

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(sample_payload()))
        .respond_with(ResponseTemplate::new(200).set_body_json(&prediction))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server.uri())
        .predict(&sample_payload())
        .await
        .unwrap();

    assert_eq!(result, prediction);

    let typed: PredictionResponse = serde_json::from_value(result).unwrap();
    assert_eq!(typed.risk_factors, vec!["Low rainfall".to_string()]);
}

#[tokio::test]
async fn upstream_error_keeps_status_and_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Invalid season. Must be one of: ['kharif', 'rabi', 'zaid']"
        })))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .predict(&sample_payload())
        .await
        .unwrap_err();

    match err {
        ForwardError::Upstream { status, detail } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(detail.starts_with("Invalid season"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_non_json_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .predict(&sample_payload())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ForwardError::Upstream { status, ref detail }
            if status == StatusCode::BAD_GATEWAY && detail == "ML service error"
    ));
}

#[tokio::test]
async fn success_with_non_json_body_is_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .predict(&sample_payload())
        .await
        .unwrap_err();

    assert!(matches!(err, ForwardError::Unexpected(_)));
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let url = dead_url().await;
    let err = provider(&url).predict(&sample_payload()).await.unwrap_err();

    match err {
        ForwardError::Unavailable { url: reported, .. } => assert_eq!(reported, url),
        other => panic!("expected unavailable, got {other:?}"),
    }
}

fn slow_server_mock() -> Mock {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    slow_server_mock().mount(&server).await;

    let impatient = HttpPredictionProvider::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = impatient.predict(&sample_payload()).await.unwrap_err();

    match err {
        ForwardError::TimedOut { url, timeout, .. } => {
            assert_eq!(url, server.uri());
            assert_eq!(timeout, Duration::from_millis(200));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn predict_route_reports_timeout_without_start_hint() {
    let server = MockServer::start().await;
    slow_server_mock().mount(&server).await;

    let impatient = HttpPredictionProvider::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let app = router(AppState::new(Arc::new(impatient)));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(sample_payload().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert!(body["error"].as_str().unwrap().contains("did not respond"));
    assert!(body.get("detail").is_none());
}

/// Replies once with `502` and a body shorter than its `Content-Length`, then hangs up.
async fn truncated_error_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }

        socket
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.flush().await.unwrap();
    });

    format!("http://{addr}")
}

fn request_complete(request: &[u8]) -> bool {
    let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    request.len() >= end + 4 + length
}

#[tokio::test]
async fn unreadable_error_body_keeps_upstream_status() {
    let url = truncated_error_server().await;
    let err = provider(&url).predict(&sample_payload()).await.unwrap_err();

    match err {
        ForwardError::Upstream { status, detail } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(detail, "ML service error");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn predict_route_returns_503_with_start_hint_when_service_is_down() {
    let url = dead_url().await;
    let app = router(AppState::new(Arc::new(provider(&url))));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(sample_payload().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Prediction service is not available"));
    assert!(error.contains(&url));
    assert_eq!(body["detail"], START_HINT);
}

#[tokio::test]
async fn predict_route_passes_upstream_status_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"detail": "ML model not loaded. Please train the model first."})),
        )
        .mount(&server)
        .await;

    let app = router(AppState::new(Arc::new(provider(&server.uri()))));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(sample_payload().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({"error": "ML model not loaded. Please train the model first."})
    );
}

#[tokio::test]
async fn health_reports_model_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "model_loaded": false})),
        )
        .mount(&server)
        .await;

    let health = provider(&server.uri()).health().await;

    assert!(health.reachable);
    assert_eq!(health.model_loaded, Some(false));
    assert_eq!(health.url, server.uri());
}

#[tokio::test]
async fn health_of_dead_service_is_unreachable() {
    let health = provider(&dead_url().await).health().await;

    assert!(!health.reachable);
    assert!(health.model_loaded.is_none());
}
