//! Multipart request construction and response interpretation.

use std::sync::Arc;

use crate::error::{AppError, UploadError};
use crate::models::queued::QueuedFile;
use crate::models::upload::{
    FormField, MultipartRequest, ResponsePayload, TransportResponse, UploadOptions,
};

/// Build the request body: every `data` entry, then each valid file under
/// `field_name`. Invalid entries are never sent.
pub fn build_request(
    options: &UploadOptions,
    files: &[Arc<QueuedFile>],
) -> crate::error::Result<MultipartRequest> {
    let url = options
        .url
        .clone()
        .ok_or_else(|| AppError::Config("upload url is not configured".into()))?;

    let mut fields = Vec::with_capacity(options.data.len() + files.len());
    for (name, value) in &options.data {
        fields.push(FormField::Text {
            name: name.clone(),
            value: value.clone(),
        });
    }
    for qf in files.iter().filter(|qf| qf.is_valid()) {
        fields.push(FormField::File {
            name: options.field_name.clone(),
            file: qf.file().clone(),
        });
    }

    Ok(MultipartRequest {
        method: options.method.clone(),
        url,
        headers: options.headers.clone(),
        fields,
    })
}

/// 2xx bodies become the payload; anything else is an `UploadError`.
pub fn interpret_response(
    response: TransportResponse,
) -> std::result::Result<ResponsePayload, UploadError> {
    if response.is_success() {
        return Ok(parse_payload(&response.body));
    }
    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(payload) => Err(UploadError::Rejected {
            status: response.status,
            payload,
        }),
        Err(_) => Err(UploadError::Opaque {
            status: response.status,
            text: response.body,
        }),
    }
}

fn parse_payload(body: &str) -> ResponsePayload {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}
