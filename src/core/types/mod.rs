//! Core type definitions for Overlay-Bridge
//!
//! Address wrappers, the numeric aggregates exchanged with the target
//! process, region descriptors, process/window identities, and error types.

mod address;
mod error;
mod math;
mod process_info;
mod region;

// Re-export all public types
pub use address::Address;
pub use error::{MemoryError, MemoryResult};
pub use math::{Matrix4x4, Vector3};
pub use process_info::{ProcessInfo, WindowHandle};
pub use region::{RegionInfo, RegionState};

pub type ProcessId = u32;
