//! FileQueueManager — owns the queue of selected files and uploads the valid
//! ones in a single multipart request.
//!
//! Queue mutation goes through `&self`. The queue borrow is released before
//! listeners run, so a listener may read the manager through a shared handle.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use crate::api::UploadTransport;
use crate::error::UploadError;
use crate::models::file::RawFile;
use crate::models::queued::QueuedFile;
use crate::models::upload::{ResponsePayload, UploadOptions, UploadOverrides};
use crate::services::events::{EventEmitter, Listener, QueueEvent, QueueEventKind};
use crate::services::upload::{build_request, interpret_response};
use crate::services::validation::{AcceptAll, FileValidator, ValidationResult};

pub struct FileQueueManager<T> {
    options: UploadOptions,
    validator: Box<dyn FileValidator>,
    files: RefCell<Vec<Arc<QueuedFile>>>,
    events: EventEmitter,
    transport: Arc<T>,
}

impl<T: UploadTransport + 'static> FileQueueManager<T> {
    /// A manager that accepts every file, duplicates and oversized files
    /// included, until a validator such as `ValidationPolicy` is set.
    pub fn new(transport: T, options: UploadOptions) -> Self {
        Self {
            options,
            validator: Box::new(AcceptAll),
            files: RefCell::new(Vec::new()),
            events: EventEmitter::new(),
            transport: Arc::new(transport),
        }
    }

    pub fn with_validator(mut self, validator: impl FileValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Validate and queue candidates. Returns whether anything was appended.
    ///
    /// Valid and reported-invalid candidates are both appended and announced
    /// with `fileadded`; silently rejected ones are dropped. One `fileschanged`
    /// follows if the queue grew.
    pub fn add_files(&self, candidates: impl IntoIterator<Item = RawFile>) -> bool {
        let mut added = 0usize;
        for candidate in candidates {
            let verdict = self.validator.validate(&candidate, &self.files.borrow());
            let qf = match verdict {
                ValidationResult::Accept => QueuedFile::valid(candidate),
                ValidationResult::RejectSilent => continue,
                ValidationResult::RejectWithReason(message) => {
                    log::debug!("Queued '{}' as invalid: {}", candidate.name(), message);
                    QueuedFile::invalid(candidate, message)
                }
            };
            let qf = Arc::new(qf);
            self.files.borrow_mut().push(qf.clone());
            added += 1;
            self.events.emit(&QueueEvent::FileAdded(qf));
        }

        if added == 0 {
            return false;
        }
        self.events.emit(&QueueEvent::FilesChanged(self.all_files()));
        true
    }

    /// Remove an entry by identity.
    pub fn remove_file(&self, entry: &Arc<QueuedFile>) -> bool {
        let removed = self.take_where(|qf| Arc::ptr_eq(qf, entry));
        self.announce_removal(removed)
    }

    pub fn remove_by_id(&self, id: &str) -> bool {
        let removed = self.take_where(|qf| qf.id() == id);
        self.announce_removal(removed)
    }

    fn take_where(&self, pred: impl Fn(&Arc<QueuedFile>) -> bool) -> Option<Arc<QueuedFile>> {
        let mut files = self.files.borrow_mut();
        let pos = files.iter().position(pred)?;
        Some(files.remove(pos))
    }

    fn announce_removal(&self, removed: Option<Arc<QueuedFile>>) -> bool {
        let Some(removed) = removed else {
            return false;
        };
        self.events.emit(&QueueEvent::FileRemoved(removed));
        self.events.emit(&QueueEvent::FilesChanged(self.all_files()));
        true
    }

    pub fn all_files(&self) -> Vec<Arc<QueuedFile>> {
        self.files.borrow().clone()
    }

    pub fn valid_files(&self) -> Vec<Arc<QueuedFile>> {
        self.files
            .borrow()
            .iter()
            .filter(|qf| qf.is_valid())
            .cloned()
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.files.borrow().iter().filter(|qf| qf.is_valid()).count()
    }

    pub fn on(&mut self, kind: QueueEventKind, listener: Listener) {
        self.events.on(kind, listener);
    }

    pub fn off(&mut self, kind: QueueEventKind, listener: &Listener) -> bool {
        self.events.off(kind, listener)
    }

    /// Upload every valid file in one request.
    ///
    /// The request is assembled when this is called, so the returned future
    /// does not borrow the manager and later queue changes do not affect it.
    pub fn upload(
        &self,
        overrides: UploadOverrides,
    ) -> impl Future<Output = std::result::Result<ResponsePayload, UploadError>> + 'static {
        let options = self.options.merged(overrides);
        let request = build_request(&options, &self.files.borrow());
        let transport = self.transport.clone();

        async move {
            let request = request?;
            log::debug!(
                "Uploading {} field(s) to {}",
                request.fields.len(),
                request.url
            );
            let response = transport.send(request).await?;
            let result = interpret_response(response);
            if let Err(e) = &result {
                log::warn!("Upload failed: {}", e);
            }
            result
        }
    }
}
