use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use payment_gateway::{app, AppState, MessagesOptions, ServiceConfig, VirtualGatewayOptions};
use std::net::SocketAddr;
use tower::ServiceExt;

fn router() -> Router {
    let config = ServiceConfig {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        public_base_url: "http://localhost:8086".into(),
        virtual_gateway: VirtualGatewayOptions::default(),
        virtual_accounts: vec!["default".into()],
        messages: MessagesOptions::default(),
    };
    app(AppState::from_config(&config).unwrap())
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn error_code(resp: &axum::response::Response) -> &str {
    resp.headers().get("X-Error-Code").and_then(|v| v.to_str().ok()).unwrap_or("")
}

#[tokio::test]
async fn verify_without_tracking_number_400() {
    let req = Request::builder().uri("/payments/verify?Result=true").body(Body::empty()).unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&resp), "invalid_tracking_number");
}

#[tokio::test]
async fn verify_unknown_payment_404() {
    let req = Request::builder().uri("/payments/verify?trackingNumber=77&Result=true").body(Body::empty()).unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(&resp), "payment_not_found");
}

#[tokio::test]
async fn duplicate_tracking_number_409() {
    let app = router();
    let body = serde_json::json!({"trackingNumber": 1, "amount": "10"});
    let resp = app.clone().oneshot(json_post("/payments", body.clone())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.clone().oneshot(json_post("/payments", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(&resp), "duplicate_tracking_number");
}

#[tokio::test]
async fn unknown_gateway_400() {
    let body = serde_json::json!({"trackingNumber": 2, "amount": "10", "gateway": "Stripe"});
    let resp = router().oneshot(json_post("/payments", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&resp), "unknown_gateway");
}

#[tokio::test]
async fn refund_before_verify_409() {
    let app = router();
    let body = serde_json::json!({"trackingNumber": 3, "amount": "10"});
    app.clone().oneshot(json_post("/payments", body)).await.unwrap();
    let resp = app.clone().oneshot(json_post("/payments/3/refund", serde_json::json!({}))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(&resp), "invalid_transition");
}

#[tokio::test]
async fn refund_unknown_payment_404() {
    let resp = router().oneshot(json_post("/payments/99/refund", serde_json::json!({}))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(&resp), "payment_not_found");
}

#[tokio::test]
async fn second_verify_409() {
    let app = router();
    let body = serde_json::json!({"trackingNumber": 4, "amount": "10"});
    app.clone().oneshot(json_post("/payments", body)).await.unwrap();
    let verify = |flag: &str| {
        Request::builder()
            .uri(format!("/payments/verify?trackingNumber=4&Result={flag}"))
            .body(Body::empty())
            .unwrap()
    };
    let resp = app.clone().oneshot(verify("true")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // A cancel after success reports the state the payment is already in.
    let resp = app.clone().oneshot(verify("false")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(&resp), "already_verified");
    let bytes = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["message"], "payment 4 is already succeeded");
}

#[tokio::test]
async fn non_numeric_amount_is_rejected() {
    let body = serde_json::json!({"trackingNumber": 8, "amount": "12a"});
    let resp = router().oneshot(json_post("/payments", body)).await.unwrap();
    assert!(resp.status().is_client_error(), "{}", resp.status());
}

#[tokio::test]
async fn extreme_exponent_amount_is_rejected_quickly() {
    let started = std::time::Instant::now();
    for amount in ["1e20000000", "1e-2000000000", "1e2000000000"] {
        let body = serde_json::json!({"trackingNumber": 9, "amount": amount});
        let resp = router().oneshot(json_post("/payments", body)).await.unwrap();
        assert!(resp.status().is_client_error(), "{amount}: {}", resp.status());
    }
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}

#[tokio::test]
async fn amount_beyond_whole_units_400() {
    let body = serde_json::json!({"trackingNumber": 10, "amount": "1e30"});
    let resp = router().oneshot(json_post("/payments", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&resp), "amount_out_of_range");
}

#[tokio::test]
async fn provider_page_rejects_missing_command() {
    let req = Request::builder().uri("/virtual-gateway?trackingNumber=1").body(Body::empty()).unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&resp), "missing_command_type");
}
