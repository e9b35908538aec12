use serde::Serialize;

use crate::transporter::GatewayTransporter;

/// Common view over the outcome of any gateway operation.
pub trait PaymentResult {
    fn is_succeed(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

/// Outcome of the Verify operation.
pub trait PaymentVerifyResult: PaymentResult {
    /// Transaction code reported by the gateway, if it sent one.
    fn transaction_code(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RequestOutcome {
    Succeeded { transporter: GatewayTransporter },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult {
    pub gateway_name: String,
    /// `None` when the invoice named an account the provider does not know.
    pub gateway_account_name: Option<String>,
    pub outcome: RequestOutcome,
}

impl RequestResult {
    pub fn succeed(
        gateway_name: impl Into<String>,
        transporter: GatewayTransporter,
        gateway_account_name: Option<String>,
    ) -> Self {
        Self {
            gateway_name: gateway_name.into(),
            gateway_account_name,
            outcome: RequestOutcome::Succeeded { transporter },
        }
    }

    pub fn failed(
        gateway_name: impl Into<String>,
        message: impl Into<String>,
        gateway_account_name: Option<String>,
    ) -> Self {
        Self {
            gateway_name: gateway_name.into(),
            gateway_account_name,
            outcome: RequestOutcome::Failed { message: message.into() },
        }
    }

    pub fn transporter(&self) -> Option<&GatewayTransporter> {
        match &self.outcome {
            RequestOutcome::Succeeded { transporter } => Some(transporter),
            RequestOutcome::Failed { .. } => None,
        }
    }

    pub fn into_transporter(self) -> Option<GatewayTransporter> {
        match self.outcome {
            RequestOutcome::Succeeded { transporter } => Some(transporter),
            RequestOutcome::Failed { .. } => None,
        }
    }
}

impl PaymentResult for RequestResult {
    fn is_succeed(&self) -> bool {
        matches!(self.outcome, RequestOutcome::Succeeded { .. })
    }

    fn message(&self) -> Option<&str> {
        match &self.outcome {
            RequestOutcome::Failed { message } => Some(message.as_str()),
            RequestOutcome::Succeeded { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    Succeed,
    Failed,
    /// The callback lacked the data needed to decide.
    InvalidData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    /// Mirrors `status == Succeed`; only the constructors below set it.
    is_succeed: bool,
    pub status: VerifyStatus,
    pub transaction_code: Option<String>,
    pub message: String,
}

impl VerifyResult {
    fn new(status: VerifyStatus, transaction_code: Option<String>, message: String) -> Self {
        Self { is_succeed: status == VerifyStatus::Succeed, status, transaction_code, message }
    }

    pub fn succeed(transaction_code: Option<String>, message: impl Into<String>) -> Self {
        Self::new(VerifyStatus::Succeed, transaction_code, message.into())
    }

    pub fn failed(transaction_code: Option<String>, message: impl Into<String>) -> Self {
        Self::new(VerifyStatus::Failed, transaction_code, message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(VerifyStatus::InvalidData, None, message.into())
    }
}

impl PaymentResult for VerifyResult {
    fn is_succeed(&self) -> bool {
        self.is_succeed
    }

    fn message(&self) -> Option<&str> {
        Some(self.message.as_str())
    }
}

impl PaymentVerifyResult for VerifyResult {
    fn transaction_code(&self) -> Option<&str> {
        self.transaction_code.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResult {
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RefundResult {
    pub fn succeed() -> Self {
        Self { succeeded: true, message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { succeeded: false, message: Some(message.into()) }
    }
}

impl PaymentResult for RefundResult {
    fn is_succeed(&self) -> bool {
        self.succeeded
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
