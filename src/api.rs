use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use web_sys::RequestCredentials;

use crate::ads::model::AdEnvelope;

const AD_ENDPOINT: &str = "/api/get-ad";
const CONVERT_TEXT_ENDPOINT: &str = "/api/convert-text";
const UPLOAD_DOCX_ENDPOINT: &str = "/api/upload-docx";
const DOWNLOAD_ENDPOINT: &str = "/api/download";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("http {status}: {message}")]
    Status { status: u16, message: String },
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TextConversion {
    pub original: String,
    pub converted: String,
    pub direction: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct DocxReply {
    #[serde(default)]
    success: bool,
    file_id: Option<String>,
    filename: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocxConversion {
    pub file_id: String,
    pub filename: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub fn download_url(base_url: &str, file_id: &str) -> String {
    format!(
        "{}/{}",
        endpoint(base_url, DOWNLOAD_ENDPOINT),
        urlencoding::encode(file_id)
    )
}

/// Pulls a readable message out of an error response body, which the backend
/// sends as `{"error": "..."}` most of the time.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| body.trim().to_string())
}

async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        message: error_message(&body),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

pub async fn fetch_current_ad(base_url: &str) -> Result<AdEnvelope, ApiError> {
    let response = Request::get(&endpoint(base_url, AD_ENDPOINT))
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    decode(ensure_ok(response).await?).await
}

pub async fn convert_text(base_url: &str, text: &str) -> Result<TextConversion, ApiError> {
    let body = format!("text={}", urlencoding::encode(text));
    let response = Request::post(&endpoint(base_url, CONVERT_TEXT_ENDPOINT))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .credentials(RequestCredentials::Include)
        .body(body)
        .map_err(|err| ApiError::Transport(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    decode(ensure_ok(response).await?).await
}

pub async fn upload_docx(
    base_url: &str,
    filename: &str,
    bytes: &[u8],
    direction: &str,
) -> Result<DocxConversion, ApiError> {
    let blob = bytes_to_blob(bytes, DOCX_CONTENT_TYPE)?;
    let form = web_sys::FormData::new()
        .map_err(|_| ApiError::Transport("form data unavailable".to_string()))?;
    form.append_with_blob_and_filename("file", &blob, filename)
        .map_err(|_| ApiError::Transport("failed to attach file".to_string()))?;
    form.append_with_str("direction", direction)
        .map_err(|_| ApiError::Transport("failed to attach direction".to_string()))?;

    let response = Request::post(&endpoint(base_url, UPLOAD_DOCX_ENDPOINT))
        .credentials(RequestCredentials::Include)
        .body(form)
        .map_err(|err| ApiError::Transport(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    let reply: DocxReply = decode(ensure_ok(response).await?).await?;
    docx_outcome(reply)
}

fn docx_outcome(reply: DocxReply) -> Result<DocxConversion, ApiError> {
    if !reply.success {
        return Err(ApiError::Rejected(
            reply
                .error
                .unwrap_or_else(|| "Konvertatsiya xatosi".to_string()),
        ));
    }
    let file_id = reply
        .file_id
        .ok_or_else(|| ApiError::Decode("missing file_id".to_string()))?;
    Ok(DocxConversion {
        filename: reply
            .filename
            .unwrap_or_else(|| format!("latinify_converted_{file_id}.docx")),
        message: reply.message.unwrap_or_default(),
        file_id,
    })
}

fn bytes_to_blob(bytes: &[u8], content_type: &str) -> Result<web_sys::Blob, ApiError> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(content_type);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|_| ApiError::Transport("failed to create blob".to_string()))
}
