//! Multiple file upload queue: validation, image thumbnails and a single
//! multipart upload of every accepted file.

pub mod api;
pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod widget;

pub use api::http::ReqwestTransport;
pub use api::UploadTransport;
pub use commands::upload::HostController;
pub use error::{AppError, UploadError};
pub use models::file::RawFile;
pub use models::queued::{QueueEntryView, QueuedFile};
pub use models::settings::UploaderSettings;
pub use models::upload::{ResponsePayload, UploadOptions, UploadOverrides};
pub use services::events::{QueueEvent, QueueEventKind};
pub use services::queue::FileQueueManager;
pub use services::thumbnail::ThumbnailGenerator;
pub use services::validation::{FileValidator, ValidationPolicy, ValidationResult};
pub use widget::{DropZoneState, FilePicker, SharedQueue, UploaderWidget};
