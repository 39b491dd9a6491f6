//! Shared HTTP response checks.
//!
//! Maps 429 (with `Retry-After` parsing) and other non-success statuses onto
//! [`DiagnosisError`] so the client stays focused on request construction.

use crate::error::DiagnosisError;

/// Return the response unchanged on success, otherwise the matching error.
/// A missing or unparseable `Retry-After` falls back to 60 s.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, DiagnosisError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(DiagnosisError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(DiagnosisError::Api {
            status: resp.status().as_u16(),
            message: error_message(resp.text().await.unwrap_or_default()),
        });
    }
    Ok(resp)
}

/// Prefer the `error.message` field of an OpenAI-style error body.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
        .unwrap_or(body)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn rate_limited_defaults_to_sixty_seconds() {
        let err = check_response(mock_response(429, "")).await.unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::RateLimited {
                retry_after_secs: 60
            }
        ));
    }

    #[tokio::test]
    async fn rate_limited_reads_header() {
        let resp = reqwest::Response::from(
            ::http::Response::builder()
                .status(429)
                .header("Retry-After", "15")
                .body("")
                .unwrap(),
        );
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::RateLimited {
                retry_after_secs: 15
            }
        ));
    }

    #[tokio::test]
    async fn openai_error_body_is_unwrapped() {
        let resp = mock_response(401, r#"{"error": {"message": "Incorrect API key provided"}}"#);
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::Api { status: 401, ref message } if message == "Incorrect API key provided"
        ));
    }

    #[tokio::test]
    async fn plain_error_body_is_kept() {
        let err = check_response(mock_response(500, "boom")).await.unwrap_err();
        assert!(matches!(err, DiagnosisError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }
}
