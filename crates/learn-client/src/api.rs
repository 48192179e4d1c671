//! Typed REST client for the LMS backend.

use learn_module::{Module, StudentProgress};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;

/// Client-side failures.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response carried no payload")]
    EmptyPayload,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::ser::Error),
}

/// Response envelope used by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning a declared failure into an error.
    fn into_data(self, status: StatusCode) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: self
                    .error
                    .or(self.message)
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }
        self.data.ok_or(ClientError::EmptyPayload)
    }
}

/// Thin wrapper over the backend's learning-module endpoints.
pub struct LmsClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl LmsClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.into_data(status)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Fetch a module definition.
    pub async fn fetch_module(&self, module_id: &str) -> Result<Module, ClientError> {
        self.get(&format!("/learning-modules/{module_id}")).await
    }

    /// Fetch a student's progress snapshot; `None` when the backend has
    /// none yet.
    pub async fn fetch_progress(
        &self,
        module_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentProgress>, ClientError> {
        let path = format!("/learning-modules/{module_id}/progress/{student_id}");
        let response = self
            .authorize(self.client.get(self.url(&path)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::unwrap_envelope(response).await.map(Some)
    }

    /// Push a progress snapshot. The response payload is ignored.
    pub async fn push_progress(&self, progress: &StudentProgress) -> Result<(), ClientError> {
        let path = format!(
            "/learning-modules/{}/progress/{}",
            progress.module_id, progress.student_id
        );
        let response = self
            .authorize(self.client.put(self.url(&path)).json(progress))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_payload() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": true, "data": 42}"#).unwrap();
        assert_eq!(envelope.into_data(StatusCode::OK).unwrap(), 42);
    }

    #[test]
    fn test_envelope_surfaces_declared_failure() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": false, "error": "nope"}"#).unwrap();
        let err = envelope.into_data(StatusCode::OK).unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_success_without_data_is_empty_payload() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            envelope.into_data(StatusCode::OK),
            Err(ClientError::EmptyPayload)
        ));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = ClientConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..ClientConfig::default()
        };
        let client = LmsClient::new(&config).unwrap();
        assert_eq!(
            client.url("/learning-modules/m1"),
            "http://localhost:8080/api/learning-modules/m1"
        );
    }

    #[test]
    fn test_progress_snapshot_wire_shape() {
        let progress = StudentProgress::new("m1", "s1");
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["moduleId"], "m1");
        assert_eq!(json["studentId"], "s1");
        assert_eq!(json["currentSection"], 0);
        assert!(json["quizScores"].is_object());
        assert!(json["lastAccessed"].is_string());
    }
}
