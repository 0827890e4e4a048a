//! Windows utility functions

pub mod error_codes;
pub mod string_conv;

// Re-export commonly used utilities
pub use error_codes::{last_error_as_memory_error, ErrorCode, RawTransfer};
pub use string_conv::{path_to_wide, string_to_wide, wide_to_string};
