//! Candidate validation.
//!
//! Checks run in a fixed order and the first failing one decides:
//! count limit, duplicate, MIME type, size.

use std::sync::Arc;

use regex::Regex;

use crate::error::AppError;
use crate::models::file::RawFile;
use crate::models::queued::QueuedFile;
use crate::models::settings::UploaderSettings;
use crate::services::size::{format_bytes, parse_size};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accept,
    /// Skip the candidate without telling the user.
    RejectSilent,
    /// Queue the candidate as invalid with this message.
    RejectWithReason(String),
}

/// Decides whether a candidate joins the queue. `queue` is the current queue,
/// including entries added earlier in the same `add_files` call.
pub trait FileValidator {
    fn validate(&self, candidate: &RawFile, queue: &[Arc<QueuedFile>]) -> ValidationResult;
}

impl<F> FileValidator for F
where
    F: Fn(&RawFile, &[Arc<QueuedFile>]) -> ValidationResult,
{
    fn validate(&self, candidate: &RawFile, queue: &[Arc<QueuedFile>]) -> ValidationResult {
        self(candidate, queue)
    }
}

pub struct AcceptAll;

impl FileValidator for AcceptAll {
    fn validate(&self, _candidate: &RawFile, _queue: &[Arc<QueuedFile>]) -> ValidationResult {
        ValidationResult::Accept
    }
}

/// One accepted-type pattern; `*` matches any run of characters.
#[derive(Debug, Clone)]
pub struct TypePattern {
    source: String,
    regex: Regex,
}

impl TypePattern {
    pub fn new(pattern: &str) -> crate::error::Result<Self> {
        let translated = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&translated)
            .map_err(|e| AppError::Config(format!("Invalid type pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Unanchored: the pattern may match anywhere in the MIME type.
    pub fn matches(&self, mime_type: &str) -> bool {
        self.regex.is_match(mime_type)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Parse a comma-separated accepted-types list. Blank entries are ignored.
pub fn parse_type_patterns(list: &str) -> crate::error::Result<Vec<TypePattern>> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(TypePattern::new)
        .collect()
}

#[derive(Debug, Clone)]
struct SizeLimit {
    bytes: u64,
    display: String,
}

/// The widget's validation rules, built from `UploaderSettings`.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    max_files: Option<usize>,
    accepted_types: Vec<TypePattern>,
    max_file_size: Option<SizeLimit>,
    msg_wrong_file_type: String,
    msg_max_file_size: String,
}

impl ValidationPolicy {
    pub fn from_settings(settings: &UploaderSettings) -> crate::error::Result<Self> {
        let max_file_size = match &settings.max_file_size {
            Some(display) => Some(SizeLimit {
                bytes: parse_size(display)?,
                display: display.clone(),
            }),
            None => None,
        };
        Ok(Self {
            max_files: settings.max_files,
            accepted_types: parse_type_patterns(&settings.accepted_types)?,
            max_file_size,
            msg_wrong_file_type: settings.msg_wrong_file_type.clone(),
            msg_max_file_size: settings.msg_max_file_size.clone(),
        })
    }

    fn over_count(&self, queue: &[Arc<QueuedFile>]) -> bool {
        match self.max_files {
            Some(max) => queue.iter().filter(|qf| qf.is_valid()).count() >= max,
            None => false,
        }
    }

    fn type_accepted(&self, candidate: &RawFile) -> bool {
        self.accepted_types
            .iter()
            .any(|p| p.matches(candidate.mime_type()))
    }

    fn size_error(&self, candidate: &RawFile) -> Option<String> {
        let limit = self.max_file_size.as_ref()?;
        if candidate.size() <= limit.bytes {
            return None;
        }
        Some(
            self.msg_max_file_size
                .replace("{fileSize}", &format_bytes(candidate.size()))
                .replace("{maxFileSize}", &limit.display),
        )
    }
}

impl FileValidator for ValidationPolicy {
    fn validate(&self, candidate: &RawFile, queue: &[Arc<QueuedFile>]) -> ValidationResult {
        if self.over_count(queue) {
            log::debug!("Skipping '{}': file limit reached", candidate.name());
            return ValidationResult::RejectSilent;
        }
        if queue.iter().any(|qf| qf.is_same_file(candidate)) {
            log::debug!("Skipping '{}': already queued", candidate.name());
            return ValidationResult::RejectSilent;
        }
        if !self.type_accepted(candidate) {
            return ValidationResult::RejectWithReason(self.msg_wrong_file_type.clone());
        }
        if let Some(message) = self.size_error(candidate) {
            return ValidationResult::RejectWithReason(message);
        }
        ValidationResult::Accept
    }
}
