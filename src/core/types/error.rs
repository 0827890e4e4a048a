//! Custom error types for Overlay-Bridge

use thiserror::Error;

/// Main error type for memory and session operations
///
/// Short reads and short writes are not errors: they are reported as byte
/// counts or booleans. Only faults that invalidate the handle or the attach
/// attempt itself show up here.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Ambiguous process name {name}: {count} instances running")]
    AmbiguousProcess { name: String, count: usize },

    #[error("Process {pid} has no main window")]
    NoWindow { pid: u32 },

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Process {0} no longer exists")]
    ProcessGone(u32),

    #[error("Target process {0} has exited")]
    TargetGone(u32),

    #[error("Partial transfer at {address}: expected {expected} bytes, got {actual}")]
    PartialTransfer {
        address: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Overlay backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Already attached to process {0}")]
    AlreadyAttached(u32),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] windows::core::Error),

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a partial transfer error for a typed read or write
    pub fn partial_transfer(address: impl std::fmt::Display, expected: usize, actual: usize) -> Self {
        MemoryError::PartialTransfer {
            address: address.to_string(),
            expected,
            actual,
        }
    }

    /// Creates the error returned on platforms without a native implementation
    pub fn unsupported(what: impl Into<String>) -> Self {
        MemoryError::UnsupportedPlatform(what.into())
    }

    /// Whether the session must be torn down and re-attached after this error
    pub fn is_handle_fault(&self) -> bool {
        matches!(
            self,
            MemoryError::AccessDenied { .. } | MemoryError::TargetGone(_) | MemoryError::ProcessGone(_)
        )
    }

    /// Whether the error happened while attaching and can only be fixed by
    /// changing the environment
    pub fn is_attach_failure(&self) -> bool {
        matches!(
            self,
            MemoryError::ProcessNotFound(_)
                | MemoryError::AmbiguousProcess { .. }
                | MemoryError::NoWindow { .. }
        )
    }
}
