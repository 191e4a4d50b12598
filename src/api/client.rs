//! HTTP client for the auth endpoints
//!
//! Both endpoints take a JSON body `{"email": ...}`. Non-2xx responses are
//! decoded as JSON where possible and classified into a [`Rejection`].

use super::{ApiError, AuthApi, CorrelationValue, Rejection};
use crate::config::IntakeConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const DUPLICATE_CHECK_PATH: &str = "/api/auth/duplicate/email";
const DISPATCH_CODE_PATH: &str = "/api/auth/email";

#[derive(Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

/// `reqwest`-backed [`AuthApi`]
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &IntakeConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_email(&self, path: &str, email: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "posting email");

        let response = self
            .http
            .post(&url)
            .json(&EmailRequest { email })
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if status.is_success() {
            Ok(body)
        } else {
            let rejection = Rejection::classify(&body);
            tracing::debug!(status = status.as_u16(), %rejection, "request rejected");
            Err(ApiError::Rejected {
                status: status.as_u16(),
                rejection,
            })
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn check_duplicate_email(&self, email: &str) -> Result<(), ApiError> {
        self.post_email(DUPLICATE_CHECK_PATH, email).await.map(|_| ())
    }

    async fn dispatch_code(&self, email: &str) -> Result<CorrelationValue, ApiError> {
        let body = self.post_email(DISPATCH_CODE_PATH, email).await?;
        CorrelationValue::from_dispatch_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpAuthApi {
        let config = IntakeConfig {
            api_base_url: format!("{}/", server.uri()),
            ..Default::default()
        };
        HttpAuthApi::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        assert_eq!(client.base_url(), server.uri());
    }

    #[tokio::test]
    async fn test_duplicate_check_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DUPLICATE_CHECK_PATH))
            .and(body_json(json!({"email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.check_duplicate_email("a@b.com").await, Ok(()));
    }

    #[tokio::test]
    async fn test_duplicate_check_rejects_duplicate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DUPLICATE_CHECK_PATH))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({"statusCode": 409, "message": "Duplicate Email"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.check_duplicate_email("taken@b.com").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 409,
                rejection: Rejection::DuplicateEmail
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_check_rejects_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DUPLICATE_CHECK_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "statusCode": 400,
                "message": ["email must be an email"],
                "error": "Bad Request"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.check_duplicate_email("bad").await.unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::MalformedEmail));
    }

    #[tokio::test]
    async fn test_non_json_failure_is_unrecognized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DUPLICATE_CHECK_PATH))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.check_duplicate_email("a@b.com").await.unwrap_err();
        assert!(matches!(
            err.rejection(),
            Some(Rejection::Unrecognized(body)) if body.contains("Bad Gateway")
        ));
    }

    #[tokio::test]
    async fn test_dispatch_code_returns_correlation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DISPATCH_CODE_PATH))
            .and(body_json(json!({"email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 731904})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let value = client.dispatch_code("a@b.com").await.unwrap();
        assert_eq!(value, CorrelationValue::new("731904"));
    }

    #[tokio::test]
    async fn test_dispatch_code_without_number_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DISPATCH_CODE_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.dispatch_code("a@b.com").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = IntakeConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        let client = HttpAuthApi::new(&config).unwrap();
        let err = client.check_duplicate_email("a@b.com").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
