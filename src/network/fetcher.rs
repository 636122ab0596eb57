//! Address fetching trait and error types.

use thiserror::Error;

use super::LinkSnapshot;

/// Error type for address fetching operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// Watchers degrade a failed fetch to an empty address set rather
/// than letting the error reach arbitration.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Permission denied to access network information.
    #[error("Permission denied: {context}")]
    PermissionDenied {
        /// Additional context about what permission was denied.
        context: String,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for enumerating the current link addresses.
///
/// # Design
///
/// - Implementations return every active link; filtering (loopback
///   exclusion) is done by the caller via
///   [`observed_addresses`](super::observed_addresses)
/// - The result is a fresh enumeration on every call; no caching
/// - Enables dependency injection for testing with mock
///   implementations
pub trait AddressFetcher: Send + Sync {
    /// Fetches the current state of all active links.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the platform refuses or fails to
    /// enumerate link addresses.
    fn fetch(&self) -> Result<Vec<LinkSnapshot>, FetchError>;
}

// Shared handles fetch through the same enumeration.
impl<T: AddressFetcher + ?Sized> AddressFetcher for std::sync::Arc<T> {
    fn fetch(&self) -> Result<Vec<LinkSnapshot>, FetchError> {
        self.as_ref().fetch()
    }
}
