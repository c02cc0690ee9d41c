//! Three-arm completion callback for asynchronous calls.

use crate::error::OneApiError;

/// Receives the outcome of a call started with a `*_with_callback` method.
///
/// Exactly one arm is invoked, exactly once, on a worker thread. Each arm
/// consumes the callback. Arms left unimplemented do nothing.
pub trait Callback<T>: Send + Sized + 'static {
    /// The server answered with a 2xx status and a decodable body.
    fn on_success(self, _status: u16, _data: T) {}

    /// The server answered with a non-2xx status.
    fn on_failure(self, _status: u16) {}

    /// The call failed without a usable server response.
    fn on_error(self, _error: OneApiError) {}
}

/// Routes a call result to the matching arm.
pub(crate) fn dispatch<T, C: Callback<T>>(result: Result<(u16, T), OneApiError>, callback: C) {
    match result {
        Ok((status, data)) => callback.on_success(status, data),
        Err(OneApiError::Api { status }) => callback.on_failure(status),
        Err(error) => callback.on_error(error),
    }
}
