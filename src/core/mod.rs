//! Core module containing fundamental types for Overlay-Bridge
//!
//! This module provides the foundational building blocks used throughout
//! the crate, including address handling, math aggregates read from the
//! target process, memory region information, and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, Matrix4x4, MemoryError, MemoryResult, ProcessInfo, RegionInfo, RegionState, Vector3,
    WindowHandle,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(not(target_pointer_width = "64"))]
compile_error!("Overlay-Bridge requires 64-bit architecture");
