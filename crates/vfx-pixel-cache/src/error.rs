//! Error types for the tiered pixel cache.
//!
//! Mirrors [`vfx_core::Error`] in shape: one [`thiserror`]-derived enum,
//! small `Error::xxx(...)` constructors for variants raised from more than
//! one call site, and `#[from] std::io::Error` for the I/O catch-all.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the pixel cache.
///
/// Grouped the way spec section 7 groups them: resource exhaustion, I/O,
/// geometry, remote transport, authorization, and fatal conditions.
#[derive(Debug, Error)]
pub enum Error {
    /// The resource governor denied an `area`/`memory`/`map`/`disk` reservation.
    #[error("cache resources exhausted acquiring {resource} for `{path}`")]
    CacheResourcesExhausted {
        /// Which resource was denied (area, memory, map, disk, file, thread, time).
        resource: &'static str,
        /// The cache's filename/label at the time of the failure.
        path: String,
    },

    /// Every tier's allocator failed after falling through memory, map, and disk.
    #[error("failed to allocate {requested} bytes for pixel cache: {reason}")]
    PixelCacheAllocationFailed {
        /// Bytes requested.
        requested: u64,
        /// Underlying reason.
        reason: String,
    },

    /// A nexus or tier allocation failed mid-operation (not at open time).
    #[error("memory allocation failed: {0}")]
    MemoryAllocationFailed(String),

    /// The backing store could not be opened.
    #[error("unable to open pixel cache `{path}`: {source}")]
    UnableToOpenPixelCache {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A positional read against the tier failed.
    #[error("unable to read pixel cache `{path}`: {source}")]
    UnableToReadPixelCache {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A positional write against the tier failed.
    #[error("unable to write pixel cache `{path}`: {source}")]
    UnableToWritePixelCache {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Extending a disk-backed tier to the requested length failed.
    #[error("unable to extend pixel cache `{path}` to {length} bytes: {source}")]
    UnableToExtendCache {
        /// Path being extended.
        path: PathBuf,
        /// Target length in bytes.
        length: u64,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `clone_pixels` failed partway through copying planes across tiers.
    #[error("unable to clone pixel cache: {0}")]
    UnableToCloneCache(String),

    /// The descriptor has no backing (tier is `Undefined`) or has zero extent.
    #[error("no pixels defined in cache for `{path}`")]
    NoPixelsDefinedInCache {
        /// Descriptor label.
        path: String,
    },

    /// A caller asked for a direct pointer into the backing but the nexus is synthetic.
    #[error("pixels are not authentic for region {region}")]
    PixelsAreNotAuthentic {
        /// The region that was requested.
        region: String,
    },

    /// No free nexus slot could be acquired (thread id out of range, or allocation failed).
    #[error("unable to get cache nexus for thread {thread_id}")]
    UnableToGetCacheNexus {
        /// The thread id that could not be serviced.
        thread_id: usize,
    },

    /// Handshake, DNS, or transport failure in the remote cache.
    #[error("distributed pixel cache error: {0}")]
    DistributedPixelCache(String),

    /// The policy engine denied the operation (e.g. remote mode without a shared secret).
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The configured wall-clock time ceiling was exceeded. Fatal: callers should abort.
    #[error("time limit exceeded: cache has been open for {elapsed_secs}s (limit {limit_secs}s)")]
    TimeLimitExceeded {
        /// Elapsed wall time.
        elapsed_secs: u64,
        /// Configured ceiling.
        limit_secs: u64,
    },

    /// I/O error without a more specific variant (temp file creation, mmap, socket ops).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a [`Error::CacheResourcesExhausted`].
    pub fn resources_exhausted(resource: &'static str, path: impl Into<String>) -> Self {
        Self::CacheResourcesExhausted {
            resource,
            path: path.into(),
        }
    }

    /// Creates a [`Error::PixelCacheAllocationFailed`].
    pub fn allocation_failed(requested: u64, reason: impl Into<String>) -> Self {
        Self::PixelCacheAllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors that indicate the process should terminate.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TimeLimitExceeded { .. })
    }

    /// Returns `true` if this is a resource-exhaustion error.
    #[inline]
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Self::CacheResourcesExhausted { .. }
                | Self::PixelCacheAllocationFailed { .. }
                | Self::MemoryAllocationFailed(_)
        )
    }

    /// Returns `true` if this is an I/O error (including the specific tier variants).
    #[inline]
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::UnableToOpenPixelCache { .. }
                | Self::UnableToReadPixelCache { .. }
                | Self::UnableToWritePixelCache { .. }
                | Self::UnableToExtendCache { .. }
                | Self::UnableToCloneCache(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_predicate() {
        let err = Error::resources_exhausted("memory", "frame.dpx");
        assert!(err.is_resource_error());
        assert!(!err.is_io_error());
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(err.is_io_error());
    }

    #[test]
    fn time_limit_is_fatal() {
        let err = Error::TimeLimitExceeded {
            elapsed_secs: 120,
            limit_secs: 60,
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn clone_failure_is_classified_as_io() {
        let err = Error::UnableToCloneCache("disk read failed".to_string());
        assert!(err.is_io_error());
        assert!(!err.is_resource_error());
    }

    #[test]
    fn pixels_are_not_authentic_is_neither_io_nor_resource() {
        let err = Error::PixelsAreNotAuthentic {
            region: "Region { x: 0, y: 0, width: 4, height: 4 }".to_string(),
        };
        assert!(!err.is_io_error());
        assert!(!err.is_resource_error());
        assert!(!err.is_fatal());
    }
}
