//! Gateway abstraction (Request / Verify / Refund) plus the virtual test gateway and a
//! small axum service hosting it.

pub mod account;
pub mod callback;
pub mod config;
pub mod gateway;
pub mod invoice;
pub mod metrics;
pub mod payment_handlers;
pub mod registry;
pub mod results;
pub mod state;
pub mod transporter;
pub mod virtual_gateway;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub use crate::account::{AccountProvider, GatewayAccount, GatewayAccountCollection, InMemoryAccountProvider};
pub use crate::callback::{CallbackParams, RequestContext};
pub use crate::config::{MessagesOptions, ServiceConfig, VirtualGatewayOptions};
pub use crate::gateway::{Gateway, GatewayError, GatewayResult};
pub use crate::invoice::{Invoice, InvoiceBuilder, InvoiceError, Payment};
pub use crate::metrics::GatewayMetrics;
pub use crate::registry::GatewayRegistry;
pub use crate::results::{
    PaymentResult, PaymentVerifyResult, RefundResult, RequestOutcome, RequestResult, VerifyResult, VerifyStatus,
};
pub use crate::state::{PaymentLedger, PaymentState};
pub use crate::transporter::GatewayTransporter;
pub use crate::virtual_gateway::{VirtualGateway, VirtualGatewayAccount, VirtualGatewayDeps};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GatewayRegistry>,
    pub ledger: PaymentLedger,
    pub metrics: Arc<GatewayMetrics>,
    pub public_base_url: Arc<str>,
    /// Used when the inbound request carries no usable scheme/host.
    pub default_context: RequestContext,
    pub default_gateway: Arc<str>,
    pub gateway_path: Arc<str>,
}

impl AppState {
    /// Wires the virtual gateway from configuration.
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let accounts = InMemoryAccountProvider::new(
            config.virtual_accounts.iter().map(VirtualGatewayAccount::new),
        );
        let deps = VirtualGatewayDeps {
            options: Arc::new(config.virtual_gateway.clone()),
            messages: Arc::new(config.messages.clone()),
            accounts: Arc::new(accounts),
        };
        let mut registry = GatewayRegistry::new();
        VirtualGateway::register(&mut registry, deps)?;

        let base = url::Url::parse(&config.public_base_url)?;
        let host = match (base.host_str(), base.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => anyhow::bail!("PUBLIC_BASE_URL has no host"),
        };

        Ok(Self {
            registry: Arc::new(registry),
            ledger: PaymentLedger::new(),
            metrics: Arc::new(GatewayMetrics::new()?),
            public_base_url: Arc::from(config.public_base_url.as_str()),
            default_context: RequestContext::new(base.scheme(), host),
            default_gateway: Arc::from(virtual_gateway::NAME),
            gateway_path: Arc::from(config.virtual_gateway.gateway_path.as_str()),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let gateway_path = state.gateway_path.to_string();
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(payment_handlers::metrics))
        .route("/payments", post(payment_handlers::request_payment))
        .route(
            "/payments/verify",
            get(payment_handlers::verify_payment).post(payment_handlers::verify_payment),
        )
        .route("/payments/:tracking_number/refund", post(payment_handlers::refund_payment))
        .route(
            &gateway_path,
            get(virtual_gateway::page::provider_page).post(virtual_gateway::page::provider_page),
        )
        .with_state(state)
}
