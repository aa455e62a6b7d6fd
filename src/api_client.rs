use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde_json::{json, Value};

use crate::errors::AppError;

/// Seam between operation handlers and the upstream bookkeeping API. Every
/// outbound call goes through one of these four verbs; there is no
/// unauthenticated code path.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, AppError>;
    async fn post(&self, path: &str, body: Value) -> Result<Value, AppError>;
    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, AppError>;
    async fn delete(&self, path: &str) -> Result<Value, AppError>;
}

pub struct HttpApiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::unexpected(format!("failed to build http client: {err}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AppError::transport(transport_message(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure_for_status(status));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(json!({}));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::unexpected(format!("invalid upstream response body: {err}")))
    }
}

#[async_trait]
impl ApiTransport for HttpApiClient {
    async fn get(&self, path: &str) -> Result<Value, AppError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, AppError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, AppError> {
        self.send(Method::PATCH, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Value, AppError> {
        self.send(Method::DELETE, path, None).await
    }
}

/// Non-2xx keeps only status and reason phrase; the failure body is dropped.
fn failure_for_status(status: StatusCode) -> AppError {
    AppError::api(
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown"),
    )
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "upstream request timed out".to_string()
    } else if err.is_connect() {
        format!("failed to connect to upstream api: {err}")
    } else {
        format!("upstream request failed: {err}")
    }
}

#[cfg(test)]
pub mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Stand-in for the upstream API: records every call and replays canned
    /// outcomes in order, defaulting to an empty-object success.
    #[derive(Default)]
    pub struct RecordingApi {
        calls: Mutex<Vec<RecordedCall>>,
        outcomes: Mutex<VecDeque<Result<Value, AppError>>>,
    }

    impl RecordingApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn returning(value: Value) -> Self {
            let api = Self::default();
            api.push(Ok(value));
            api
        }

        pub fn failing(error: AppError) -> Self {
            let api = Self::default();
            api.push(Err(error));
            api
        }

        pub fn push(&self, outcome: Result<Value, AppError>) {
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .push_back(outcome);
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(
            &self,
            method: &'static str,
            path: &str,
            body: Option<Value>,
        ) -> Result<Value, AppError> {
            self.calls.lock().expect("calls lock").push(RecordedCall {
                method,
                path: path.to_string(),
                body,
            });
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .unwrap_or(Ok(json!({})))
        }
    }

    #[async_trait]
    impl ApiTransport for RecordingApi {
        async fn get(&self, path: &str) -> Result<Value, AppError> {
            self.record("GET", path, None)
        }

        async fn post(&self, path: &str, body: Value) -> Result<Value, AppError> {
            self.record("POST", path, Some(body))
        }

        async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, AppError> {
            self.record("PATCH", path, body)
        }

        async fn delete(&self, path: &str) -> Result<Value, AppError> {
            self.record("DELETE", path, None)
        }
    }
}
