//! Cancellation utilities
//!
//! Provides a first-class cancellation handle for in-flight submissions.

use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation of a submission.
///
/// Clone the handle, attach one copy to a request via
/// [`HttpRequest::cancel`](crate::request::HttpRequest::cancel), and call
/// [`cancel`](CancelHandle::cancel) on the other to abort the in-flight
/// call. The submission then returns [`HttpError::Cancelled`](crate::error::HttpError::Cancelled).
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Any submission bound to this handle aborts as
    /// soon as possible; dropping the aborted call closes the underlying
    /// HTTP connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
