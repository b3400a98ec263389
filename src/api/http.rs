//! ReqwestTransport — `UploadTransport` over a real HTTP client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};

use super::UploadTransport;
use crate::error::AppError;
use crate::models::upload::{FormField, MultipartRequest, TransportResponse};

const USER_AGENT: &str = concat!("multi-uploader/", env!("CARGO_PKG_VERSION"));
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ReqwestTransport {
    /// No request timeout is set; the client's defaults apply.
    pub fn new() -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Relative upload urls (such as `/upload/`) are joined onto `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> crate::error::Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid base url '{}': {}", base_url, e)))?;
        self.base_url = Some(url);
        Ok(self)
    }

    pub(crate) fn resolve_url(&self, url: &str) -> crate::error::Result<Url> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }
        let base = self.base_url.as_ref().ok_or_else(|| {
            AppError::Config(format!("Relative upload url '{}' without base url", url))
        })?;
        base.join(url)
            .map_err(|e| AppError::Config(format!("Invalid upload url '{}': {}", url, e)))
    }

    pub(crate) fn build_headers(
        headers: &std::collections::BTreeMap<String, String>,
    ) -> crate::error::Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::Config(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::Config(format!("Invalid header value for '{}': {}", name, e)))?;
            map.append(name, value);
        }
        Ok(map)
    }

    pub(crate) fn build_form(fields: Vec<FormField>) -> crate::error::Result<Form> {
        let mut form = Form::new();
        for field in fields {
            form = match field {
                FormField::Text { name, value } => form.text(name, value),
                FormField::File { name, file } => {
                    let mime = if file.mime_type().is_empty() {
                        FALLBACK_CONTENT_TYPE
                    } else {
                        file.mime_type()
                    };
                    let part = Part::bytes(file.bytes().to_vec())
                        .file_name(file.name().to_string())
                        .mime_str(mime)
                        .map_err(|e| AppError::Internal(format!("MIME parse error: {}", e)))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

impl UploadTransport for ReqwestTransport {
    async fn send(&self, request: MultipartRequest) -> crate::error::Result<TransportResponse> {
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes()).map_err(|e| {
            AppError::Config(format!("Invalid HTTP method '{}': {}", request.method, e))
        })?;
        let url = self.resolve_url(&request.url)?;
        let headers = Self::build_headers(&request.headers)?;
        let form = Self::build_form(request.fields)?;

        log::debug!("Sending {} upload request to {}", method, url);
        let resp = self
            .client
            .request(method, url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(TransportResponse { status, body })
    }
}
