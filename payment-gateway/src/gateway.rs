use async_trait::async_trait;
use common_money::Money;
use thiserror::Error;

use crate::callback::{CallbackParams, RequestContext};
use crate::invoice::{Invoice, Payment};
use crate::results::{RefundResult, RequestResult, VerifyResult};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Faults a gateway cannot express as a result value.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to load accounts for gateway '{gateway}': {source}")]
    AccountProvider {
        gateway: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("amount of payment {tracking_number} cannot be expressed in whole currency units")]
    AmountOutOfRange { tracking_number: i64 },
    #[error("gateway '{0}' is not registered")]
    UnknownGateway(String),
    #[error("gateway '{0}' is already registered")]
    DuplicateGateway(String),
}

/// Request / Verify / Refund against one external provider.
///
/// Implementations hold only injected configuration, so a single instance can serve
/// concurrent payments. Dropping a returned future abandons the call.
#[async_trait]
pub trait Gateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Builds the transport that carries `invoice` to the provider. Nothing is sent.
    async fn request(&self, invoice: &Invoice, ctx: &RequestContext) -> GatewayResult<RequestResult>;

    /// Interprets the parameters the provider sent back for `payment`.
    async fn verify(&self, payment: &Payment, params: &CallbackParams) -> GatewayResult<VerifyResult>;

    async fn refund(&self, payment: &Payment, amount: &Money) -> GatewayResult<RefundResult>;
}
