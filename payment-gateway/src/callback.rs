use std::collections::HashMap;

use axum::http::{header, HeaderMap, Uri};
use serde::{Deserialize, Serialize};

/// The parts of the inbound request a gateway needs to build absolute urls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub scheme: String,
    /// Host with optional port, e.g. `pay.example` or `localhost:8086`.
    pub host: String,
}

impl RequestContext {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self { scheme: scheme.into(), host: host.into() }
    }

    /// Derives scheme and host from the request line and headers, falling back to `default`.
    ///
    /// `X-Forwarded-Proto` / `X-Forwarded-Host` win over `Host` so the service works behind a proxy.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap, default: &RequestContext) -> Self {
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let scheme = header_str("x-forwarded-proto")
            .or_else(|| uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| default.scheme.clone());
        let host = header_str("x-forwarded-host")
            .or_else(|| header_str(header::HOST.as_str()))
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| default.host.clone());
        Self { scheme, host }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

/// Parameters the provider sent back on the callback request.
///
/// Keys match ASCII case-insensitively; the query string is consulted before the form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    query: HashMap<String, String>,
    form: HashMap<String, String>,
}

impl CallbackParams {
    pub fn new(
        query: impl IntoIterator<Item = (String, String)>,
        form: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self { query: lowercase_keys(query), form: lowercase_keys(form) }
    }

    pub fn from_query<K, V>(query: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(query.into_iter().map(|(k, v)| (k.into(), v.into())), std::iter::empty())
    }

    pub fn from_form<K, V>(form: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(std::iter::empty(), form.into_iter().map(|(k, v)| (k.into(), v.into())))
    }

    /// Collects the query string and, for url-encoded bodies, the form fields of a request.
    pub fn from_request(uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        let query = uri
            .query()
            .map(|q| parse_urlencoded(q.as_bytes()))
            .unwrap_or_default();
        let is_form = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        let form = if is_form { parse_urlencoded(body) } else { Vec::new() };
        Self::new(query, form)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let key = name.to_ascii_lowercase();
        self.query
            .get(&key)
            .or_else(|| self.form.get(&key))
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

fn parse_urlencoded(raw: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw).into_owned().collect()
}

fn lowercase_keys(pairs: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (k, v) in pairs {
        // First occurrence wins, mirroring how repeated query keys are usually read.
        map.entry(k.to_ascii_lowercase()).or_insert(v);
    }
    map
}
