//! Queue entry model.

use std::sync::OnceLock;

use serde::Serialize;

use super::file::RawFile;

/// A selected file together with its validation outcome and thumbnail.
///
/// Entries are shared as `Arc<QueuedFile>`; the handle's identity is the
/// entry's identity. Only the thumbnail is written after creation, and only
/// once.
#[derive(Debug)]
pub struct QueuedFile {
    id: String,
    file: RawFile,
    valid: bool,
    error: Option<String>,
    thumbnail: OnceLock<String>,
}

impl QueuedFile {
    pub fn valid(file: RawFile) -> Self {
        Self::new(file, true, None)
    }

    pub fn invalid(file: RawFile, error: impl Into<String>) -> Self {
        Self::new(file, false, Some(error.into()))
    }

    fn new(file: RawFile, valid: bool, error: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            file,
            valid,
            error,
            thumbnail: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file(&self) -> &RawFile {
        &self.file
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Thumbnail data URL, once generated.
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.get().map(String::as_str)
    }

    /// Returns false if a thumbnail was already attached.
    pub fn set_thumbnail(&self, data_url: String) -> bool {
        self.thumbnail.set(data_url).is_ok()
    }

    /// Same file name and byte size.
    pub fn is_same_file(&self, other: &RawFile) -> bool {
        self.file.name() == other.name() && self.file.size() == other.size()
    }

    pub fn view(&self) -> QueueEntryView {
        QueueEntryView {
            id: self.id.clone(),
            name: self.file.name().to_string(),
            size: self.file.size(),
            mime_type: self.file.mime_type().to_string(),
            valid: self.valid,
            error: self.error.clone(),
            thumbnail: self.thumbnail().map(str::to_string),
        }
    }
}

/// Render view of a queue entry sent to the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryView {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub valid: bool,
    pub error: Option<String>,
    pub thumbnail: Option<String>,
}
