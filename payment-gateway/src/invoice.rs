use common_money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    #[error("tracking number is required")]
    MissingTrackingNumber,
    #[error("amount is required")]
    MissingAmount,
    #[error("callback url is required")]
    MissingCallbackUrl,
    #[error("callback url '{0}' is not an absolute url")]
    InvalidCallbackUrl(String),
    #[error("gateway name is required")]
    MissingGateway,
}

/// Description of a payment to be requested from a gateway.
///
/// Built once by the caller through [`InvoiceBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    tracking_number: i64,
    amount: Money,
    callback_url: String,
    gateway_name: String,
    account_name: String,
}

impl Invoice {
    pub fn builder() -> InvoiceBuilder {
        InvoiceBuilder::default()
    }

    pub fn tracking_number(&self) -> i64 {
        self.tracking_number
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn gateway_name(&self) -> &str {
        &self.gateway_name
    }

    /// Empty means "use the gateway's default account".
    pub fn account_name(&self) -> &str {
        &self.account_name
    }
}

#[derive(Debug, Default, Clone)]
pub struct InvoiceBuilder {
    tracking_number: Option<i64>,
    amount: Option<Money>,
    callback_url: Option<String>,
    gateway_name: Option<String>,
    account_name: Option<String>,
}

impl InvoiceBuilder {
    pub fn tracking_number(mut self, tracking_number: i64) -> Self {
        self.tracking_number = Some(tracking_number);
        self
    }

    pub fn amount(mut self, amount: impl Into<Money>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn gateway(mut self, name: impl Into<String>) -> Self {
        self.gateway_name = Some(name.into());
        self
    }

    pub fn account(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<Invoice, InvoiceError> {
        let tracking_number = self.tracking_number.ok_or(InvoiceError::MissingTrackingNumber)?;
        let amount = self.amount.ok_or(InvoiceError::MissingAmount)?;
        let callback_url = self
            .callback_url
            .filter(|u| !u.trim().is_empty())
            .ok_or(InvoiceError::MissingCallbackUrl)?;
        // The url is forwarded verbatim; parsing only checks that it is absolute.
        if url::Url::parse(&callback_url).is_err() {
            return Err(InvoiceError::InvalidCallbackUrl(callback_url));
        }
        let gateway_name = self
            .gateway_name
            .filter(|g| !g.trim().is_empty())
            .ok_or(InvoiceError::MissingGateway)?;
        Ok(Invoice {
            tracking_number,
            amount,
            callback_url,
            gateway_name,
            account_name: self.account_name.unwrap_or_default(),
        })
    }
}

/// A payment instance being verified or refunded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub tracking_number: i64,
    pub amount: Money,
    pub gateway_name: String,
    pub gateway_account_name: Option<String>,
}

impl Payment {
    pub fn from_invoice(invoice: &Invoice, gateway_account_name: Option<String>) -> Self {
        Self {
            tracking_number: invoice.tracking_number,
            amount: invoice.amount.clone(),
            gateway_name: invoice.gateway_name.clone(),
            gateway_account_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> InvoiceBuilder {
        Invoice::builder()
            .tracking_number(1001)
            .amount(50_000i64)
            .callback_url("https://shop.example/done")
            .gateway("ParbadVirtual")
    }

    #[test]
    fn builds_with_defaults() {
        let invoice = base().build().unwrap();
        assert_eq!(invoice.tracking_number(), 1001);
        assert_eq!(invoice.amount(), &Money::from(50_000i64));
        assert_eq!(invoice.callback_url(), "https://shop.example/done");
        assert_eq!(invoice.account_name(), "");
    }

    #[test]
    fn missing_fields_are_reported() {
        assert_eq!(Invoice::builder().build(), Err(InvoiceError::MissingTrackingNumber));
        assert_eq!(
            Invoice::builder().tracking_number(1).build(),
            Err(InvoiceError::MissingAmount)
        );
        assert_eq!(
            Invoice::builder().tracking_number(1).amount(10i64).callback_url("  ").build(),
            Err(InvoiceError::MissingCallbackUrl)
        );
        assert_eq!(
            base().gateway("").build(),
            Err(InvoiceError::MissingGateway)
        );
    }

    #[test]
    fn relative_callback_rejected() {
        let err = base().callback_url("/done").build().unwrap_err();
        assert_eq!(err, InvoiceError::InvalidCallbackUrl("/done".into()));
    }

    #[test]
    fn payment_copies_identity() {
        let invoice = base().account("main").build().unwrap();
        let payment = Payment::from_invoice(&invoice, Some("main".into()));
        assert_eq!(payment.tracking_number, 1001);
        assert_eq!(payment.gateway_name, "ParbadVirtual");
        assert_eq!(payment.gateway_account_name.as_deref(), Some("main"));
    }
}
