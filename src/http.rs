//! Helpers shared by the HTTP adapters.

use std::time::Duration;

use reqwest::RequestBuilder;

/// Applies the request timeout where the HTTP backend supports one.
///
/// The browser fetch backend has no per-request timeout.
pub(crate) fn with_timeout(request: RequestBuilder, timeout: Duration) -> RequestBuilder {
    #[cfg(not(target_arch = "wasm32"))]
    {
        request.timeout(timeout)
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = timeout;
        request
    }
}
