//! HTTP transport abstraction.
//!
//! `UploadTransport` is the sole interface through which the uploader talks to
//! a server. The queue manager builds a `MultipartRequest` and hands it over;
//! it never constructs HTTP requests itself. `ReqwestTransport` is the
//! production implementation, tests substitute their own.

use crate::error::AppError;
use crate::models::upload::{MultipartRequest, TransportResponse};

/// Sends one multipart request and reports the raw response.
///
/// Implementations return `Ok` for any response that arrived, whatever its
/// status; interpreting the status is left to the caller. `Err` means no
/// response was received.
pub trait UploadTransport {
    fn send(
        &self,
        request: MultipartRequest,
    ) -> impl std::future::Future<Output = std::result::Result<TransportResponse, AppError>>;
}

pub mod http;
