//! Windows API layer for process memory and overlay plumbing
//!
//! All unsafe FFI calls are contained within this module. Higher layers see
//! byte counts, region descriptors and classified error codes only.

pub mod bindings;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use types::MemoryBasicInfo;
pub use utils::{ErrorCode, RawTransfer};

// Re-export key bindings
pub use bindings::{kernel32, ntdll};
