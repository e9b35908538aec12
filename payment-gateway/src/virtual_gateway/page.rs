use axum::body::Bytes;
use axum::http::{HeaderMap, Uri};
use axum::response::Html;
use html_escape::encode_double_quoted_attribute;
use common_http_errors::{ApiError, ApiResult};
use tracing::info;
use uuid::Uuid;

use super::{
    COMMAND_REQUEST, FIELD_AMOUNT, FIELD_COMMAND_TYPE, FIELD_REDIRECT_URL, FIELD_TRACKING_NUMBER,
    PARAM_RESULT, PARAM_TRANSACTION_CODE,
};
use crate::callback::CallbackParams;

/// A payment the virtual provider was asked to collect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCommand {
    pub tracking_number: i64,
    pub amount: i64,
    pub redirect_url: String,
}

impl ProviderCommand {
    pub fn parse(params: &CallbackParams) -> ApiResult<Self> {
        let command = params
            .get(FIELD_COMMAND_TYPE)
            .ok_or_else(|| ApiError::bad_request("missing_command_type", None))?;
        if !command.eq_ignore_ascii_case(COMMAND_REQUEST) {
            return Err(ApiError::BadRequest {
                code: "unsupported_command_type",
                trace_id: None,
                message: Some(command.to_string()),
            });
        }
        let tracking_number = params
            .get(FIELD_TRACKING_NUMBER)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| ApiError::bad_request("invalid_tracking_number", None))?;
        let amount = params
            .get(FIELD_AMOUNT)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| ApiError::bad_request("invalid_amount", None))?;
        let redirect_url = params
            .get(FIELD_REDIRECT_URL)
            .filter(|u| url::Url::parse(u).is_ok())
            .ok_or_else(|| ApiError::bad_request("invalid_redirect_url", None))?
            .to_string();
        Ok(Self { tracking_number, amount, redirect_url })
    }
}

/// The provider side of the virtual gateway: a page offering to pay or cancel.
pub async fn provider_page(uri: Uri, headers: HeaderMap, body: Bytes) -> ApiResult<Html<String>> {
    let params = CallbackParams::from_request(&uri, &headers, &body);
    let command = ProviderCommand::parse(&params)?;
    let transaction_code = Uuid::new_v4().simple().to_string();
    info!(
        tracking_number = command.tracking_number,
        amount = command.amount,
        "virtual provider page served"
    );
    Ok(Html(render(&command, &transaction_code)))
}

fn render(command: &ProviderCommand, transaction_code: &str) -> String {
    let action = encode_double_quoted_attribute(&command.redirect_url);
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Virtual payment gateway</title></head>\n<body>\n\
         <h1>Virtual payment gateway</h1>\n\
         <p>Tracking number: {tracking}</p>\n<p>Amount: {amount}</p>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"hidden\" name=\"{tracking_field}\" value=\"{tracking}\" />\n\
         <input type=\"hidden\" name=\"{result}\" value=\"true\" />\n\
         <input type=\"hidden\" name=\"{code_field}\" value=\"{code}\" />\n\
         <button type=\"submit\">Pay</button>\n</form>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"hidden\" name=\"{tracking_field}\" value=\"{tracking}\" />\n\
         <input type=\"hidden\" name=\"{result}\" value=\"false\" />\n\
         <button type=\"submit\">Cancel</button>\n</form>\n\
         </body>\n</html>\n",
        tracking = command.tracking_number,
        amount = command.amount,
        action = action,
        tracking_field = FIELD_TRACKING_NUMBER,
        result = PARAM_RESULT,
        code_field = PARAM_TRANSACTION_CODE,
        code = encode_double_quoted_attribute(transaction_code),
    )
}
