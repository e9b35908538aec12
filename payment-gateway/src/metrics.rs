use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    requests: IntCounterVec,
    verifications: IntCounterVec,
    refunds: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new("payment_gateway_requests_total", "Payment requests grouped by gateway and result"),
            &["gateway", "result"],
        )?;
        let verifications = IntCounterVec::new(
            Opts::new(
                "payment_gateway_verifications_total",
                "Callback verifications grouped by gateway and status",
            ),
            &["gateway", "status"],
        )?;
        let refunds = IntCounterVec::new(
            Opts::new("payment_gateway_refunds_total", "Refunds grouped by gateway and result"),
            &["gateway", "result"],
        )?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(verifications.clone()))?;
        registry.register(Box::new(refunds.clone()))?;
        Ok(Self { registry, requests, verifications, refunds })
    }

    pub fn record_request(&self, gateway: &str, succeeded: bool) {
        self.requests.with_label_values(&[gateway, outcome(succeeded)]).inc();
    }

    pub fn record_verification(&self, gateway: &str, status: &str) {
        self.verifications.with_label_values(&[gateway, status]).inc();
    }

    pub fn record_refund(&self, gateway: &str, succeeded: bool) {
        self.refunds.with_label_values(&[gateway, outcome(succeeded)]).inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}

fn outcome(succeeded: bool) -> &'static str {
    if succeeded { "succeeded" } else { "failed" }
}
