use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::invoice::Payment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Created,
    Requested,
    Succeeded,
    Failed,
    Refunded,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Created => "created",
            PaymentState::Requested => "requested",
            PaymentState::Succeeded => "succeeded",
            PaymentState::Failed => "failed",
            PaymentState::Refunded => "refunded",
        }
    }
}

/// Valid transitions:
/// created -> requested
/// requested -> succeeded | failed
/// succeeded -> refunded
/// failed and refunded are terminal.
pub fn is_valid_transition(from: PaymentState, to: PaymentState) -> bool {
    match from {
        PaymentState::Created => matches!(to, PaymentState::Requested),
        PaymentState::Requested => matches!(to, PaymentState::Succeeded | PaymentState::Failed),
        PaymentState::Succeeded => matches!(to, PaymentState::Refunded),
        PaymentState::Failed | PaymentState::Refunded => false,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("payment {0} already exists")]
    Duplicate(i64),
    #[error("payment {0} not found")]
    NotFound(i64),
    #[error("payment {tracking_number} cannot move from {from} to {to}")]
    InvalidTransition { tracking_number: i64, from: &'static str, to: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub payment: Payment,
    pub state: PaymentState,
    pub transaction_code: Option<String>,
}

/// Process-local record of the payments the service has requested.
#[derive(Clone, Default)]
pub struct PaymentLedger {
    inner: Arc<RwLock<HashMap<i64, PaymentRecord>>>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a payment that has just been handed to its gateway.
    pub async fn insert_requested(&self, payment: Payment) -> Result<PaymentRecord, LedgerError> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(&payment.tracking_number) {
            return Err(LedgerError::Duplicate(payment.tracking_number));
        }
        debug_assert!(is_valid_transition(PaymentState::Created, PaymentState::Requested));
        let record = PaymentRecord { payment, state: PaymentState::Requested, transaction_code: None };
        guard.insert(record.payment.tracking_number, record.clone());
        Ok(record)
    }

    pub async fn get(&self, tracking_number: i64) -> Option<PaymentRecord> {
        self.inner.read().await.get(&tracking_number).cloned()
    }

    /// Moves a payment to `to`; `transaction_code` replaces the stored one when given.
    pub async fn transition(
        &self,
        tracking_number: i64,
        to: PaymentState,
        transaction_code: Option<String>,
    ) -> Result<PaymentRecord, LedgerError> {
        let mut guard = self.inner.write().await;
        let record = guard
            .get_mut(&tracking_number)
            .ok_or(LedgerError::NotFound(tracking_number))?;
        if !is_valid_transition(record.state, to) {
            return Err(LedgerError::InvalidTransition {
                tracking_number,
                from: record.state.as_str(),
                to: to.as_str(),
            });
        }
        record.state = to;
        if transaction_code.is_some() {
            record.transaction_code = transaction_code;
        }
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_money::Money;

    fn payment(n: i64) -> Payment {
        Payment {
            tracking_number: n,
            amount: Money::from(100i64),
            gateway_name: "ParbadVirtual".into(),
            gateway_account_name: Some("main".into()),
        }
    }

    #[test]
    fn lifecycle_edges() {
        use PaymentState::*;
        let all = [Created, Requested, Succeeded, Failed, Refunded];
        let allowed = [(Created, Requested), (Requested, Succeeded), (Requested, Failed), (Succeeded, Refunded)];
        for from in all {
            for to in all {
                assert_eq!(
                    is_valid_transition(from, to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from.as_str(),
                    to.as_str()
                );
            }
        }
    }

    #[tokio::test]
    async fn ledger_walks_the_lifecycle() {
        let ledger = PaymentLedger::new();
        ledger.insert_requested(payment(1)).await.unwrap();
        assert_eq!(ledger.insert_requested(payment(1)).await, Err(LedgerError::Duplicate(1)));

        let rec = ledger.transition(1, PaymentState::Succeeded, Some("tx".into())).await.unwrap();
        assert_eq!(rec.transaction_code.as_deref(), Some("tx"));
        let rec = ledger.transition(1, PaymentState::Refunded, None).await.unwrap();
        assert_eq!(rec.state, PaymentState::Refunded);
        assert_eq!(rec.transaction_code.as_deref(), Some("tx"));

        let err = ledger.transition(1, PaymentState::Refunded, None).await.unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidTransition { tracking_number: 1, from: "refunded", to: "refunded" }
        );
        assert_eq!(ledger.transition(9, PaymentState::Failed, None).await, Err(LedgerError::NotFound(9)));
    }
}
