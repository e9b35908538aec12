use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use html_escape::encode_double_quoted_attribute;
use serde::Serialize;

/// Instruction for carrying a payment to the provider. Built by a gateway, dispatched by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum GatewayTransporter {
    Post { url: String, form: Vec<(String, String)> },
    Redirect { url: String },
}

impl GatewayTransporter {
    pub fn post<K, V>(url: impl Into<String>, form: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Post {
            url: url.into(),
            form: form.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        Self::Redirect { url: url.into() }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Post { url, .. } | Self::Redirect { url } => url,
        }
    }

    /// Value of a form field; always `None` for redirects.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Post { form, .. } => form.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()),
            Self::Redirect { .. } => None,
        }
    }
}

impl IntoResponse for GatewayTransporter {
    fn into_response(self) -> Response {
        match self {
            Self::Post { url, form } => Html(auto_post_page(&url, &form)).into_response(),
            Self::Redirect { url } => match HeaderValue::from_str(&url) {
                Ok(location) => {
                    let mut resp = StatusCode::SEE_OTHER.into_response();
                    resp.headers_mut().insert(header::LOCATION, location);
                    resp
                }
                Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "invalid redirect target").into_response(),
            },
        }
    }
}

/// Renders a page whose form posts itself to `url` as soon as it loads.
pub fn auto_post_page(url: &str, form: &[(String, String)]) -> String {
    let mut inputs = String::new();
    for (name, value) in form {
        inputs.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\" />\n",
            encode_double_quoted_attribute(name),
            encode_double_quoted_attribute(value)
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Redirecting to the payment gateway</title></head>\n\
         <body onload=\"document.forms[0].submit()\">\n\
         <form method=\"post\" action=\"{}\">\n{}<noscript><button type=\"submit\">Continue</button></noscript>\n</form>\n\
         </body>\n</html>\n",
        encode_double_quoted_attribute(url),
        inputs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn attribute_values_are_escaped() {
        let html = auto_post_page(
            "https://p.example/gw?a=1&b=\"2\"",
            &[("note".into(), r#""><script>"#.into())],
        );
        assert!(html.contains("action=\"https://p.example/gw?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("value=\"&quot;"));
        assert!(html.contains("&lt;script"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn field_lookup() {
        let t = GatewayTransporter::post("https://p.example/gw", [("amount", "10")]);
        assert_eq!(t.field("amount"), Some("10"));
        assert_eq!(t.field("missing"), None);
        assert_eq!(GatewayTransporter::redirect("https://p.example").field("amount"), None);
    }

    #[tokio::test]
    async fn post_renders_auto_submit_form() {
        let t = GatewayTransporter::post("https://p.example/gw", [("redirectUrl", "https://s.example/?a=1&b=2")]);
        let resp = t.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), 1024 * 16).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("action=\"https://p.example/gw\""));
        assert!(html.contains("name=\"redirectUrl\" value=\"https://s.example/?a=1&amp;b=2\""));
        assert!(html.contains("document.forms[0].submit()"));
    }

    #[test]
    fn redirect_sets_location() {
        let resp = GatewayTransporter::redirect("https://p.example/pay").into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "https://p.example/pay");
    }
}
