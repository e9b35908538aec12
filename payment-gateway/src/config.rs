use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};

/// Human readable texts put into verify results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessagesOptions {
    pub payment_succeed: String,
    pub payment_failed: String,
    pub invalid_data_received_from_gateway: String,
}

impl Default for MessagesOptions {
    fn default() -> Self {
        Self {
            payment_succeed: "Payment is succeed.".to_string(),
            payment_failed: "Payment failed.".to_string(),
            invalid_data_received_from_gateway: "Invalid data is received from the gateway.".to_string(),
        }
    }
}

impl MessagesOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            payment_succeed: env::var("MESSAGE_PAYMENT_SUCCEED").unwrap_or(defaults.payment_succeed),
            payment_failed: env::var("MESSAGE_PAYMENT_FAILED").unwrap_or(defaults.payment_failed),
            invalid_data_received_from_gateway: env::var("MESSAGE_INVALID_DATA")
                .unwrap_or(defaults.invalid_data_received_from_gateway),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualGatewayOptions {
    /// Path (on the host serving the checkout) where the virtual provider page lives.
    pub gateway_path: String,
}

impl Default for VirtualGatewayOptions {
    fn default() -> Self {
        Self { gateway_path: "/virtual-gateway".to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    /// Base url the browser uses to reach this service; callback urls hang off it.
    pub public_base_url: String,
    pub virtual_gateway: VirtualGatewayOptions,
    pub virtual_accounts: Vec<String>,
    pub messages: MessagesOptions,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8086".to_string())
            .parse()
            .context("PORT must be a valid port number")?;
        let ip: IpAddr = host.parse().with_context(|| format!("HOST '{host}' is not an IP address"))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));
        url::Url::parse(&public_base_url)
            .with_context(|| format!("PUBLIC_BASE_URL '{public_base_url}' is not an absolute url"))?;

        let gateway_path = env::var("VIRTUAL_GATEWAY_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|| VirtualGatewayOptions::default().gateway_path);

        let virtual_accounts = parse_account_list(
            &env::var("VIRTUAL_GATEWAY_ACCOUNTS").unwrap_or_else(|_| "default".to_string()),
        );
        if virtual_accounts.is_empty() {
            anyhow::bail!("VIRTUAL_GATEWAY_ACCOUNTS must name at least one account");
        }

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            virtual_gateway: VirtualGatewayOptions { gateway_path },
            virtual_accounts,
            messages: MessagesOptions::from_env(),
        })
    }
}

pub(crate) fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

pub(crate) fn parse_account_list(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
