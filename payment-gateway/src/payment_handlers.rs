use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    Json,
};
use common_http_errors::{ApiError, ApiResult};
use common_money::Money;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::callback::{CallbackParams, RequestContext};
use crate::gateway::GatewayError;
use crate::invoice::{Invoice, Payment};
use crate::results::{PaymentResult, RefundResult, VerifyResult, VerifyStatus};
use crate::state::{is_valid_transition, LedgerError, PaymentState};
use crate::virtual_gateway::FIELD_TRACKING_NUMBER;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub tracking_number: i64,
    pub amount: Money,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct RefundRequest {
    #[serde(default)]
    pub amount: Option<Money>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub tracking_number: i64,
    pub state: PaymentState,
    #[serde(flatten)]
    pub result: VerifyResult,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    pub tracking_number: i64,
    pub state: PaymentState,
    #[serde(flatten)]
    pub result: RefundResult,
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Duplicate(_) => ApiError::conflict("duplicate_tracking_number", err.to_string()),
            LedgerError::NotFound(_) => ApiError::not_found("payment_not_found"),
            LedgerError::InvalidTransition { .. } => ApiError::conflict("invalid_transition", err.to_string()),
        }
    }
}

/// Starts a checkout: asks the gateway for a transport and hands it to the browser.
pub async fn request_payment(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<Response> {
    let gateway_name = req.gateway.unwrap_or_else(|| state.default_gateway.to_string());
    let gateway = state.registry.create(&gateway_name).map_err(|err| ApiError::BadRequest {
        code: "unknown_gateway",
        trace_id: None,
        message: Some(err.to_string()),
    })?;

    if state.ledger.get(req.tracking_number).await.is_some() {
        return Err(LedgerError::Duplicate(req.tracking_number).into());
    }

    let callback_url = format!(
        "{}/payments/verify?{}={}",
        state.public_base_url, FIELD_TRACKING_NUMBER, req.tracking_number
    );
    let invoice = Invoice::builder()
        .tracking_number(req.tracking_number)
        .amount(req.amount)
        .callback_url(callback_url)
        .gateway(gateway.name())
        .account(req.account_name.unwrap_or_default())
        .build()
        .map_err(|err| ApiError::BadRequest {
            code: "invalid_invoice",
            trace_id: None,
            message: Some(err.to_string()),
        })?;

    let ctx = RequestContext::from_parts(&uri, &headers, &state.default_context);
    let result = gateway.request(&invoice, &ctx).await.map_err(|err| match err {
        GatewayError::AmountOutOfRange { .. } => ApiError::BadRequest {
            code: "amount_out_of_range",
            trace_id: None,
            message: Some(err.to_string()),
        },
        other => ApiError::internal(other, None),
    })?;
    state.metrics.record_request(gateway.name(), result.is_succeed());

    if let Some(message) = result.message() {
        warn!(tracking_number = invoice.tracking_number(), gateway = gateway.name(), reason = message, "payment request failed");
        return Err(ApiError::BadRequest {
            code: "request_failed",
            trace_id: None,
            message: Some(message.to_string()),
        });
    }

    let payment = Payment::from_invoice(&invoice, result.gateway_account_name.clone());
    state.ledger.insert_requested(payment).await?;
    info!(
        tracking_number = invoice.tracking_number(),
        gateway = gateway.name(),
        account = result.gateway_account_name.as_deref().unwrap_or("-"),
        "payment requested"
    );

    match result.into_transporter() {
        Some(transporter) => Ok(transporter.into_response()),
        None => Err(ApiError::internal("gateway returned no transporter", None)),
    }
}

/// Callback target the provider sends the user back to.
pub async fn verify_payment(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<VerifyResponse>> {
    let params = CallbackParams::from_request(&uri, &headers, &body);
    let tracking_number = params
        .get(FIELD_TRACKING_NUMBER)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::bad_request("invalid_tracking_number", None))?;
    let record = state
        .ledger
        .get(tracking_number)
        .await
        .ok_or(LedgerError::NotFound(tracking_number))?;
    if record.state != PaymentState::Requested {
        return Err(ApiError::conflict(
            "already_verified",
            format!("payment {tracking_number} is already {}", record.state.as_str()),
        ));
    }

    let gateway = state
        .registry
        .create(&record.payment.gateway_name)
        .map_err(|err| ApiError::internal(err, None))?;
    let result = gateway
        .verify(&record.payment, &params)
        .await
        .map_err(|err| ApiError::internal(err, None))?;
    let status = match result.status {
        VerifyStatus::Succeed => "succeed",
        VerifyStatus::Failed => "failed",
        VerifyStatus::InvalidData => "invalid_data",
    };
    state.metrics.record_verification(gateway.name(), status);

    let next = if result.is_succeed() { PaymentState::Succeeded } else { PaymentState::Failed };
    let updated = state
        .ledger
        .transition(tracking_number, next, result.transaction_code.clone())
        .await?;
    Ok(Json(VerifyResponse { tracking_number, state: updated.state, result }))
}

pub async fn refund_payment(
    State(state): State<AppState>,
    Path(tracking_number): Path<i64>,
    body: Option<Json<RefundRequest>>,
) -> ApiResult<Json<RefundResponse>> {
    let record = state
        .ledger
        .get(tracking_number)
        .await
        .ok_or(LedgerError::NotFound(tracking_number))?;
    if !is_valid_transition(record.state, PaymentState::Refunded) {
        return Err(LedgerError::InvalidTransition {
            tracking_number,
            from: record.state.as_str(),
            to: PaymentState::Refunded.as_str(),
        }
        .into());
    }

    let amount = body
        .and_then(|Json(req)| req.amount)
        .unwrap_or_else(|| record.payment.amount.clone());
    let gateway = state
        .registry
        .create(&record.payment.gateway_name)
        .map_err(|err| ApiError::internal(err, None))?;
    let result = gateway
        .refund(&record.payment, &amount)
        .await
        .map_err(|err| ApiError::internal(err, None))?;
    state.metrics.record_refund(gateway.name(), result.is_succeed());

    let current = if result.is_succeed() {
        state
            .ledger
            .transition(tracking_number, PaymentState::Refunded, None)
            .await?
            .state
    } else {
        record.state
    };
    Ok(Json(RefundResponse { tracking_number, state: current, result }))
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<Response> {
    state.metrics.render().map_err(|err| ApiError::internal(err, None))
}
