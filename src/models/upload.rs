//! Upload request models.

use std::collections::BTreeMap;

use super::file::RawFile;
use super::settings::DEFAULT_FIELD_NAME;

/// Parsed body of a successful upload response.
pub type ResponsePayload = serde_json::Value;

/// Construction-time upload options.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    pub url: Option<String>,
    pub field_name: String,
    pub headers: BTreeMap<String, String>,
    /// Extra text fields sent before the files, in insertion order.
    pub data: Vec<(String, String)>,
    pub method: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            url: None,
            field_name: DEFAULT_FIELD_NAME.to_string(),
            headers: BTreeMap::new(),
            data: Vec::new(),
            method: "POST".to_string(),
        }
    }
}

impl UploadOptions {
    /// Apply per-call overrides. A key present in `overrides` replaces the
    /// whole value, maps are not merged entry by entry.
    pub fn merged(&self, overrides: UploadOverrides) -> UploadOptions {
        UploadOptions {
            url: overrides.url.or_else(|| self.url.clone()),
            field_name: overrides
                .field_name
                .unwrap_or_else(|| self.field_name.clone()),
            headers: overrides.headers.unwrap_or_else(|| self.headers.clone()),
            data: overrides.data.unwrap_or_else(|| self.data.clone()),
            method: overrides.method.unwrap_or_else(|| self.method.clone()),
        }
    }
}

/// Per-call overrides for `FileQueueManager::upload`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadOverrides {
    pub url: Option<String>,
    pub field_name: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub data: Option<Vec<(String, String)>>,
    pub method: Option<String>,
}

impl UploadOverrides {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(
            headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn data<K, V>(mut self, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.data = Some(data.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, file: RawFile },
}

impl FormField {
    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// A fully resolved upload request, ready for a transport.
#[derive(Debug, Clone)]
pub struct MultipartRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// In body order.
    pub fields: Vec<FormField>,
}

impl MultipartRequest {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            FormField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn files(&self, name: &str) -> Vec<&RawFile> {
        self.fields
            .iter()
            .filter_map(|f| match f {
                FormField::File { name: n, file } if n == name => Some(file),
                _ => None,
            })
            .collect()
    }
}

/// Status and body as received from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
