//! UploaderWidget — drop zone and file-picker glue around a `FileQueueManager`.
//!
//! The widget keeps a render copy of the queue in sync through queue events,
//! schedules thumbnails for added images and hands the manager to its host
//! once, at mount time, so the host can start the upload later.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::api::UploadTransport;
use crate::commands::files::resolve_dropped_paths;
use crate::models::file::RawFile;
use crate::models::queued::{QueueEntryView, QueuedFile};
use crate::models::settings::UploaderSettings;
use crate::models::upload::UploadOptions;
use crate::services::events::{listener, QueueEvent, QueueEventKind};
use crate::services::queue::FileQueueManager;
use crate::services::thumbnail::ThumbnailGenerator;
use crate::services::validation::ValidationPolicy;

/// The manager as shared between the widget and its host.
pub type SharedQueue<T> = Rc<RefCell<FileQueueManager<T>>>;

/// Native multi-file selection dialog.
pub trait FilePicker {
    /// Blocks until the user confirms; empty when cancelled.
    fn pick_files(&self, accept: &str, multiple: bool) -> Vec<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropZoneState {
    #[default]
    Idle,
    Hover,
    Dropped,
}

pub struct UploaderWidget<T, P> {
    settings: UploaderSettings,
    uploader: SharedQueue<T>,
    queue: Rc<RefCell<Vec<Arc<QueuedFile>>>>,
    thumbnails: Rc<RefCell<Vec<JoinHandle<()>>>>,
    picker: P,
    drop_zone: DropZoneState,
}

impl<T, P> UploaderWidget<T, P>
where
    T: UploadTransport + 'static,
    P: FilePicker,
{
    /// Build a manager from `settings` (field name and validation rules) and
    /// mount it.
    pub fn build(
        settings: UploaderSettings,
        transport: T,
        picker: P,
        on_init: impl FnOnce(SharedQueue<T>),
    ) -> crate::error::Result<Self> {
        let policy = ValidationPolicy::from_settings(&settings)?;
        let options = UploadOptions {
            field_name: settings.field_name.clone(),
            ..UploadOptions::default()
        };
        let manager = FileQueueManager::new(transport, options).with_validator(policy);
        Ok(Self::mount(settings, manager, picker, on_init))
    }

    /// Wire a pre-built manager into the widget and pass it to `on_init`.
    pub fn mount(
        settings: UploaderSettings,
        mut manager: FileQueueManager<T>,
        picker: P,
        on_init: impl FnOnce(SharedQueue<T>),
    ) -> Self {
        let queue: Rc<RefCell<Vec<Arc<QueuedFile>>>> = Rc::new(RefCell::new(Vec::new()));
        let thumbnails: Rc<RefCell<Vec<JoinHandle<()>>>> = Rc::new(RefCell::new(Vec::new()));
        let generator = ThumbnailGenerator::new(settings.thumb_width, settings.thumb_height);

        {
            let queue = queue.clone();
            let thumbnails = thumbnails.clone();
            manager.on(
                QueueEventKind::FileAdded,
                listener(move |event| {
                    if let QueueEvent::FileAdded(qf) = event {
                        queue.borrow_mut().push(qf.clone());
                        if let Some(handle) = generator.attach(qf.clone()) {
                            let mut pending = thumbnails.borrow_mut();
                            pending.retain(|h| !h.is_finished());
                            pending.push(handle);
                        }
                    }
                }),
            );
        }
        {
            let queue = queue.clone();
            manager.on(
                QueueEventKind::FileRemoved,
                listener(move |event| {
                    if let QueueEvent::FileRemoved(qf) = event {
                        queue.borrow_mut().retain(|e| !Arc::ptr_eq(e, qf));
                    }
                }),
            );
        }

        let uploader = Rc::new(RefCell::new(manager));
        on_init(uploader.clone());

        Self {
            settings,
            uploader,
            queue,
            thumbnails,
            picker,
            drop_zone: DropZoneState::default(),
        }
    }

    pub fn uploader(&self) -> SharedQueue<T> {
        self.uploader.clone()
    }

    pub fn settings(&self) -> &UploaderSettings {
        &self.settings
    }

    pub fn queue(&self) -> Vec<Arc<QueuedFile>> {
        self.queue.borrow().clone()
    }

    pub fn view(&self) -> Vec<QueueEntryView> {
        self.queue.borrow().iter().map(|qf| qf.view()).collect()
    }

    /// File counter text, e.g. "Selected 2 / 20 files".
    pub fn counter(&self) -> String {
        let count = self.uploader.borrow().valid_count();
        let max_files = self
            .settings
            .max_files
            .map_or_else(|| "∞".to_string(), |m| m.to_string());
        self.settings
            .msg_file_counter
            .replace("{count}", &count.to_string())
            .replace("{maxFiles}", &max_files)
    }

    pub fn input_name(&self) -> &str {
        &self.settings.field_name
    }

    pub fn input_accept(&self) -> &str {
        &self.settings.accepted_types
    }

    pub fn add_label(&self) -> &str {
        &self.settings.add_label
    }

    pub fn drop_zone(&self) -> DropZoneState {
        self.drop_zone
    }

    /// Open the picker and queue whatever the user selects.
    pub async fn add(&self) -> crate::error::Result<bool> {
        let paths = self
            .picker
            .pick_files(&self.settings.accepted_types, true);
        if paths.is_empty() {
            return Ok(false);
        }
        let files = resolve_dropped_paths(paths).await?;
        Ok(self.uploader.borrow().add_files(files))
    }

    pub fn remove(&self, entry: &Arc<QueuedFile>) -> bool {
        self.uploader.borrow().remove_file(entry)
    }

    pub fn remove_by_id(&self, id: &str) -> bool {
        self.uploader.borrow().remove_by_id(id)
    }

    pub fn drag_over(&mut self) {
        self.drop_zone = DropZoneState::Hover;
    }

    pub fn drag_leave(&mut self) {
        self.drop_zone = DropZoneState::Idle;
    }

    pub fn drop_files(&mut self, files: Vec<RawFile>) -> bool {
        self.drop_zone = DropZoneState::Dropped;
        self.uploader.borrow().add_files(files)
    }

    pub async fn drop_paths(&mut self, paths: Vec<PathBuf>) -> crate::error::Result<bool> {
        self.drop_zone = DropZoneState::Dropped;
        let files = resolve_dropped_paths(paths).await?;
        Ok(self.uploader.borrow().add_files(files))
    }

    /// Wait for every scheduled thumbnail to finish.
    pub async fn thumbnails_settled(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = self.thumbnails.borrow_mut().drain(..).collect();
            if pending.is_empty() {
                break;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    log::warn!("Thumbnail task failed: {}", e);
                }
            }
        }
    }
}
