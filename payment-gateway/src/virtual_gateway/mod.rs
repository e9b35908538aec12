//! Test gateway whose "provider" is a page served by the host application itself.
//!
//! The checkout posts `CommandType=request` plus the invoice fields to the configured
//! gateway path; the page there lets the user pay or cancel and posts `Result` and
//! `TransactionCode` back to the invoice's callback url.

pub mod page;

use std::sync::Arc;

use async_trait::async_trait;
use common_money::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::account::{AccountProvider, GatewayAccount};
use crate::callback::{CallbackParams, RequestContext};
use crate::config::{MessagesOptions, VirtualGatewayOptions};
use crate::gateway::{Gateway, GatewayError, GatewayResult};
use crate::invoice::{Invoice, Payment};
use crate::registry::GatewayRegistry;
use crate::results::{RefundResult, RequestResult, VerifyResult};
use crate::transporter::GatewayTransporter;

pub const NAME: &str = "ParbadVirtual";

pub const FIELD_COMMAND_TYPE: &str = "CommandType";
pub const FIELD_TRACKING_NUMBER: &str = "trackingNumber";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_REDIRECT_URL: &str = "redirectUrl";
pub const COMMAND_REQUEST: &str = "request";

pub const PARAM_RESULT: &str = "Result";
pub const PARAM_TRANSACTION_CODE: &str = "TransactionCode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualGatewayAccount {
    pub name: String,
}

impl VirtualGatewayAccount {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl GatewayAccount for VirtualGatewayAccount {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Everything the virtual gateway is constructed from.
#[derive(Clone)]
pub struct VirtualGatewayDeps {
    pub options: Arc<VirtualGatewayOptions>,
    pub messages: Arc<MessagesOptions>,
    pub accounts: Arc<dyn AccountProvider<VirtualGatewayAccount>>,
}

pub struct VirtualGateway {
    options: Arc<VirtualGatewayOptions>,
    messages: Arc<MessagesOptions>,
    accounts: Arc<dyn AccountProvider<VirtualGatewayAccount>>,
}

impl VirtualGateway {
    pub fn new(deps: VirtualGatewayDeps) -> Self {
        Self { options: deps.options, messages: deps.messages, accounts: deps.accounts }
    }

    /// Adds the virtual gateway to `registry` under [`NAME`].
    pub fn register(registry: &mut GatewayRegistry, deps: VirtualGatewayDeps) -> GatewayResult<()> {
        registry.register(NAME, move || Arc::new(VirtualGateway::new(deps.clone())) as Arc<dyn Gateway>)
    }

    async fn account(&self, name: &str) -> GatewayResult<Option<VirtualGatewayAccount>> {
        let accounts = self
            .accounts
            .load_accounts()
            .await
            .map_err(|source| GatewayError::AccountProvider { gateway: NAME, source })?;
        Ok(accounts.get_or_default(name).cloned())
    }
}

#[async_trait]
impl Gateway for VirtualGateway {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn request(&self, invoice: &Invoice, ctx: &RequestContext) -> GatewayResult<RequestResult> {
        let account = self.account(invoice.account_name()).await?;
        if account.is_none() {
            warn!(
                tracking_number = invoice.tracking_number(),
                account = invoice.account_name(),
                "virtual gateway account not found"
            );
        }

        let amount = invoice
            .amount()
            .to_minor_units()
            .ok_or(GatewayError::AmountOutOfRange { tracking_number: invoice.tracking_number() })?;

        let url = format!("{}{}", ctx.base_url(), self.options.gateway_path);
        let transporter = GatewayTransporter::post(
            url,
            [
                (FIELD_COMMAND_TYPE, COMMAND_REQUEST.to_string()),
                (FIELD_TRACKING_NUMBER, invoice.tracking_number().to_string()),
                (FIELD_AMOUNT, amount.to_string()),
                (FIELD_REDIRECT_URL, invoice.callback_url().to_string()),
            ],
        );
        debug!(tracking_number = invoice.tracking_number(), target = transporter.url(), "built virtual gateway transport");

        Ok(RequestResult::succeed(NAME, transporter, account.map(|a| a.name)))
    }

    async fn verify(&self, payment: &Payment, params: &CallbackParams) -> GatewayResult<VerifyResult> {
        let Some(result) = params.get(PARAM_RESULT) else {
            warn!(tracking_number = payment.tracking_number, "callback without Result parameter");
            return Ok(VerifyResult::invalid_data(self.messages.invalid_data_received_from_gateway.clone()));
        };
        let transaction_code = params.get(PARAM_TRANSACTION_CODE).map(str::to_string);

        let verified = if result.eq_ignore_ascii_case("true") {
            VerifyResult::succeed(transaction_code, self.messages.payment_succeed.clone())
        } else {
            VerifyResult::failed(transaction_code, self.messages.payment_failed.clone())
        };
        info!(
            tracking_number = payment.tracking_number,
            status = ?verified.status,
            transaction_code = verified.transaction_code.as_deref().unwrap_or("-"),
            "virtual gateway verify"
        );
        Ok(verified)
    }

    async fn refund(&self, payment: &Payment, amount: &Money) -> GatewayResult<RefundResult> {
        info!(tracking_number = payment.tracking_number, %amount, "virtual gateway refund");
        Ok(RefundResult::succeed())
    }
}
