use crate::config::ClientConfig;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use shared::wire::{
    server_error_message, PREDICT_PATH, TRAINING_INFO_PATH, UPLOAD_FIELD, UPLOAD_PATH,
};
use shared::{ClientError, PredictRequest, PredictResponse, TrainingInfo};
use std::time::Duration;

/// Thin client for the prediction backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn predict(&self, text: &str) -> Result<PredictResponse, ClientError> {
        log::info!("Requesting prediction for {} characters", text.chars().count());
        let request = self.http.post(self.url(PREDICT_PATH)).json(&PredictRequest {
            text: text.to_string(),
        });
        decode(send(request).await?).await
    }

    pub async fn upload(
        &self,
        file_name: String,
        contents: Vec<u8>,
    ) -> Result<PredictResponse, ClientError> {
        log::info!("Uploading {} ({} bytes)", file_name, contents.len());
        let form = Form::new().part(UPLOAD_FIELD, Part::bytes(contents).file_name(file_name));
        let request = self.http.post(self.url(UPLOAD_PATH)).multipart(form);
        decode(send(request).await?).await
    }

    pub async fn training_info(&self) -> Result<TrainingInfo, ClientError> {
        let request = self.http.get(self.url(TRAINING_INFO_PATH));
        decode(send(request).await?).await
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
    request.send().await.map_err(|e| {
        log::error!("Request failed: {}", e);
        ClientError::Network(format!("Network error: {}", e))
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("Network error: {}", e)))?;

    if status.is_success() {
        serde_json::from_str(&body)
            .map_err(|e| ClientError::MalformedResult(format!("Failed to parse response: {}", e)))
    } else {
        Err(ClientError::Network(server_error_message(status.as_u16(), &body)))
    }
}
