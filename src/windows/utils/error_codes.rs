//! Windows error code handling utilities

use crate::core::types::MemoryError;
use std::fmt;
use winapi::um::errhandlingapi::GetLastError;

/// Common Windows error codes seen by process memory calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    AccessDenied,
    InvalidHandle,
    InvalidParameter,
    PartialCopy,
    InvalidAddress,
    NoAccess,
    Unknown(u32),
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ErrorCode::Success,
            5 => ErrorCode::AccessDenied,
            6 => ErrorCode::InvalidHandle,
            87 => ErrorCode::InvalidParameter,
            299 => ErrorCode::PartialCopy,
            487 => ErrorCode::InvalidAddress,
            998 => ErrorCode::NoAccess,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl ErrorCode {
    /// Get the last Windows error
    pub fn last_error() -> Self {
        unsafe { ErrorCode::from(GetLastError()) }
    }

    /// Map an NTSTATUS from the native API onto the Win32 codes above
    pub fn from_nt_status(status: i32) -> Self {
        match status as u32 {
            0x0000_0000 => ErrorCode::Success,
            0xC000_0022 => ErrorCode::AccessDenied,
            0xC000_0008 => ErrorCode::InvalidHandle,
            0xC000_000D => ErrorCode::InvalidParameter,
            0x8000_000D => ErrorCode::PartialCopy,
            0xC000_0005 => ErrorCode::NoAccess,
            other => ErrorCode::Unknown(other),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Success => write!(f, "Success"),
            ErrorCode::AccessDenied => write!(f, "Access denied"),
            ErrorCode::InvalidHandle => write!(f, "Invalid handle"),
            ErrorCode::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorCode::PartialCopy => write!(f, "Partial copy"),
            ErrorCode::InvalidAddress => write!(f, "Invalid address"),
            ErrorCode::NoAccess => write!(f, "Invalid access to memory location"),
            ErrorCode::Unknown(code) => write!(f, "Unknown error: 0x{:X}", code),
        }
    }
}

/// Outcome of a single cross-process transfer call
///
/// `transferred` is whatever the OS reported, even when the call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTransfer {
    pub transferred: usize,
    pub error: Option<ErrorCode>,
}

impl RawTransfer {
    pub fn complete(transferred: usize) -> Self {
        RawTransfer {
            transferred,
            error: None,
        }
    }

    pub fn failed(transferred: usize, code: ErrorCode) -> Self {
        RawTransfer {
            transferred,
            error: Some(code),
        }
    }
}

/// Get last Windows error as MemoryError
pub fn last_error_as_memory_error(context: impl Into<String>) -> MemoryError {
    MemoryError::WindowsApi(format!("{}: {}", context.into(), ErrorCode::last_error()))
}
