use std::time::Duration;

use isahc::{AsyncBody, Response, http::StatusCode, prelude::AsyncReadResponseExt};
use serde_json::Value;

use crate::Error;

use super::request::LookupRequest;

#[derive(Clone)]
pub(crate) struct HttpClient {
    inner: isahc::HttpClient,
}

impl HttpClient {
    pub fn new() -> Result<Self, Error> {
        let inner = isahc::HttpClient::builder().build()?;
        Ok(Self { inner })
    }

    pub fn from_isahc(inner: isahc::HttpClient) -> Self {
        Self { inner }
    }

    /// Sends `request` and parses the JSON body, giving up after the
    /// request's timeout. Dropping the exchange future aborts the transfer.
    pub async fn get_json(&self, request: &LookupRequest) -> Result<Value, Error> {
        let timeout = request.timeout();
        let http_request = request.build()?;
        let exchange = async {
            let response = self.inner.send_async(http_request).await?;
            read_json(response).await
        };

        match tokio::time::timeout(Duration::from_millis(timeout), exchange).await {
            Ok(result) => result,
            Err(_) => {
                warn!("request aborted after {}ms", timeout);
                Err(Error::Timeout(timeout))
            }
        }
    }
}

async fn read_json(mut response: Response<AsyncBody>) -> Result<Value, Error> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = error_message(status, &body);
        error!("code: {status}, msg: {message}");
        return Err(Error::api(status, message));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Picks the `message` field of a JSON error body, falling back to the
/// status line when the body is not JSON or is `null`.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) | Err(_) => format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        ),
        Ok(json) => match json.get("message") {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            Some(message) if is_truthy(message) => message.to_string(),
            _ => format!("HTTP {}", status.as_u16()),
        },
    }
}

// null, false, 0 and "" do not count as a message.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        let msg = error_message(StatusCode::UNAUTHORIZED, r#"{"message":"bad key"}"#);
        assert_eq!(msg, "bad key");
    }

    #[test]
    fn json_without_message_uses_status_code() {
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#),
            "HTTP 403"
        );
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, r#"{"message":""}"#),
            "HTTP 403"
        );
    }

    #[test]
    fn falsy_message_uses_status_code() {
        for body in [
            r#"{"message":0}"#,
            r#"{"message":0.0}"#,
            r#"{"message":false}"#,
            r#"{"message":null}"#,
            r#""plain string""#,
        ] {
            assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "HTTP 401", "{body}");
        }
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, r#"{"message":42}"#),
            "42"
        );
    }

    #[test]
    fn null_body_uses_status_line() {
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, "null"),
            "HTTP 401: Unauthorized"
        );
    }

    #[test]
    fn non_json_body_uses_status_line() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>upstream</html>"),
            "HTTP 502: Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "HTTP 500: Internal Server Error"
        );
    }
}
