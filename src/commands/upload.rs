//! Host-side handler for submitting the queue.

use crate::api::UploadTransport;
use crate::models::upload::{ResponsePayload, UploadOverrides};
use crate::widget::SharedQueue;

pub const DEFAULT_UPLOAD_URL: &str = "/upload/";

/// Page state owning the upload target and the errors shown after a submit.
pub struct HostController<T> {
    pub url: String,
    pub title: String,
    errors: Vec<String>,
    uploader: Option<SharedQueue<T>>,
}

impl<T> Default for HostController<T> {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPLOAD_URL.to_string(),
            title: String::new(),
            errors: Vec::new(),
            uploader: None,
        }
    }
}

impl<T: UploadTransport + 'static> HostController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the widget once it has mounted its manager.
    pub fn uploader_init(&mut self, uploader: SharedQueue<T>) {
        self.uploader = Some(uploader);
    }

    pub fn is_ready(&self) -> bool {
        self.uploader.is_some()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Upload the queue with `title` as an extra form field.
    pub async fn submit(&mut self) -> Option<ResponsePayload> {
        self.errors.clear();
        let pending = match &self.uploader {
            Some(uploader) => uploader.borrow().upload(
                UploadOverrides::default()
                    .url(self.url.clone())
                    .data([("title", self.title.clone())]),
            ),
            None => {
                self.errors.push("Uploader is not initialized".to_string());
                return None;
            }
        };

        match pending.await {
            Ok(payload) => {
                log::info!("Upload finished: {}", payload);
                Some(payload)
            }
            Err(e) => {
                log::error!("Upload to {} failed: {}", self.url, e);
                self.errors.push(e.message().unwrap_or_else(|| e.to_string()));
                None
            }
        }
    }
}
