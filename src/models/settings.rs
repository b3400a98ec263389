use serde::{Deserialize, Serialize};

pub const DEFAULT_FIELD_NAME: &str = "Files[]";

/// Widget configuration. Every key is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploaderSettings {
    /// Multipart field name used for every file.
    #[serde(alias = "name")]
    pub field_name: String,
    /// Comma-separated MIME patterns, `*` is a wildcard.
    pub accepted_types: String,
    /// Human-readable size such as "3MB". `None` disables the check.
    pub max_file_size: Option<String>,
    /// `None` disables the check.
    pub max_files: Option<usize>,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub add_label: String,
    pub msg_wrong_file_type: String,
    /// Supports `{fileSize}` and `{maxFileSize}`.
    pub msg_max_file_size: String,
    /// Supports `{count}` and `{maxFiles}`.
    pub msg_file_counter: String,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_FIELD_NAME.to_string(),
            accepted_types: "*/*,*".to_string(),
            max_file_size: Some("3MB".to_string()),
            max_files: Some(20),
            thumb_width: 300,
            thumb_height: 169,
            add_label: "Click here to add files".to_string(),
            msg_wrong_file_type: "Wrong file type".to_string(),
            msg_max_file_size: "File is too big ({fileSize}). Max file size is {maxFileSize}."
                .to_string(),
            msg_file_counter: "Selected {count} / {maxFiles} files".to_string(),
        }
    }
}
