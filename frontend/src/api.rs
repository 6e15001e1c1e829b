use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::wire::{
    server_error_message, PREDICT_PATH, TRAINING_INFO_PATH, UPLOAD_FIELD, UPLOAD_PATH,
};
use shared::{ClientError, PredictRequest, PredictResponse, TrainingInfo};

/// Backend origin baked in at build time; empty means same origin.
const API_BASE: &str = match option_env!("TEXTCLF_API_URL") {
    Some(url) => url,
    None => "",
};

fn url(path: &str) -> String {
    format!("{}{}", API_BASE.trim_end_matches('/'), path)
}

fn build_error(e: impl std::fmt::Display) -> ClientError {
    ClientError::Network(format!("Failed to build request: {}", e))
}

pub async fn predict(text: String) -> Result<PredictResponse, ClientError> {
    log::info!("Requesting prediction for {} characters", text.chars().count());
    let request = Request::post(&url(PREDICT_PATH))
        .json(&PredictRequest { text })
        .map_err(build_error)?;
    decode(send(request).await?).await
}

pub async fn upload(file: GlooFile) -> Result<PredictResponse, ClientError> {
    log::info!("Uploading {} ({} bytes)", file.name(), file.size());
    let form_data = web_sys::FormData::new().map_err(|e| build_error(format!("{:?}", e)))?;
    form_data
        .append_with_blob_and_filename(UPLOAD_FIELD, file.as_ref(), &file.name())
        .map_err(|e| build_error(format!("{:?}", e)))?;

    let request = Request::post(&url(UPLOAD_PATH))
        .body(form_data)
        .map_err(build_error)?;
    decode(send(request).await?).await
}

pub async fn training_info() -> Result<TrainingInfo, ClientError> {
    let request = Request::get(&url(TRAINING_INFO_PATH))
        .build()
        .map_err(build_error)?;
    decode(send(request).await?).await
}

async fn send(request: Request) -> Result<Response, ClientError> {
    request.send().await.map_err(|e| {
        log::error!("Request failed: {}", e);
        ClientError::Network(format!("Network error: {}", e))
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("Network error: {}", e)))?;

    if response.ok() {
        serde_json::from_str(&body)
            .map_err(|e| ClientError::MalformedResult(format!("Failed to parse response: {}", e)))
    } else {
        Err(ClientError::Network(server_error_message(status, &body)))
    }
}
