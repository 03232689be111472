//! Shared response handling for Bot API calls.
//!
//! Every Bot API method answers with the same envelope:
//! `{"ok": bool, "result": T, "description": str, "parameters": {"retry_after": n}}`.
//! Centralizing the envelope and status checks (429 → [`TelegramError::RateLimited`],
//! non-success or `ok: false` → [`TelegramError::Api`]) keeps the method
//! wrappers focused on request construction.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::TelegramError;

/// Back-off used when a 429 carries no hint at all.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

/// Turn a Bot API response into its `result`.
///
/// The retry hint is taken from `parameters.retry_after` in the body, then the
/// `Retry-After` header, then [`DEFAULT_RETRY_AFTER_SECS`].
pub async fn into_result<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, TelegramError> {
    let status = resp.status();
    let header_retry = parse_retry_after(&resp);
    let body = resp.text().await?;
    let envelope = serde_json::from_str::<Envelope<T>>(&body).ok();

    if status.as_u16() == 429 {
        let retry_after_secs = envelope
            .as_ref()
            .and_then(|e| e.parameters.as_ref())
            .and_then(|p| p.retry_after)
            .or(header_retry)
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(TelegramError::RateLimited { retry_after_secs });
    }

    let Some(envelope) = envelope else {
        if status.is_success() {
            return Err(TelegramError::Parse(format!(
                "unexpected response body: {}",
                truncate(&body, 200)
            )));
        }
        return Err(TelegramError::Api {
            status: status.as_u16(),
            description: truncate(&body, 200),
        });
    };

    if !status.is_success() || !envelope.ok {
        return Err(TelegramError::Api {
            status: status.as_u16(),
            description: envelope
                .description
                .unwrap_or_else(|| String::from("ok=false")),
        });
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::Parse("response missing 'result'".into()))
}

/// Parse the `Retry-After` header as seconds.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn ok_envelope_yields_result() {
        let resp = mock_response(200, r#"{"ok":true,"result":{"message_id":7}}"#);
        let value: serde_json::Value = into_result(resp).await.unwrap();
        assert_eq!(value["message_id"], 7);
    }

    #[tokio::test]
    async fn rate_limit_reads_body_parameters() {
        let resp = mock_response(
            429,
            r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 3","parameters":{"retry_after":3}}"#,
        );
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        assert!(matches!(
            err,
            TelegramError::RateLimited {
                retry_after_secs: 3
            }
        ));
    }

    #[tokio::test]
    async fn rate_limit_falls_back_to_header() {
        let resp = mock_response_with_retry_after(429, "12", "");
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        assert_eq!(err.retry_after_secs(), Some(12));
    }

    #[tokio::test]
    async fn rate_limit_default() {
        let resp = mock_response_with_retry_after(429, "soon", "not json");
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        assert_eq!(err.retry_after_secs(), Some(DEFAULT_RETRY_AFTER_SECS));
    }

    #[tokio::test]
    async fn api_error_carries_description() {
        let resp = mock_response(
            400,
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        );
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        match err {
            TelegramError::Api {
                status,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn ok_false_with_200_is_api_error() {
        let resp = mock_response(200, r#"{"ok":false,"description":"nope"}"#);
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        assert!(matches!(err, TelegramError::Api { status: 200, .. }));
    }

    #[tokio::test]
    async fn html_error_page_is_api_error() {
        let resp = mock_response(502, "<html>Bad Gateway</html>");
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        assert!(matches!(err, TelegramError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn garbage_200_is_parse_error() {
        let resp = mock_response(200, "definitely not json");
        let err = into_result::<serde_json::Value>(resp).await.unwrap_err();
        assert!(matches!(err, TelegramError::Parse(_)));
    }
}
