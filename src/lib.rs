//! Overlay-Bridge: attach to a running Windows process, read and write its
//! memory, project world positions to screen space, and draw through an
//! external overlay backend once per frame.

pub mod config;
pub mod core;
pub mod memory;
pub mod overlay;
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use core::types::{
    Address, Matrix4x4, MemoryError, MemoryResult, ProcessId, ProcessInfo, RegionInfo,
    RegionState, Vector3, WindowHandle,
};

pub use memory::{MemoryAccessor, ProcessMemory, ReadOutcome, WriteStrategy};
pub use overlay::{
    BridgeOptions, BridgeState, Color, DrawCommand, FrameBridge, OverlayBackend, OverlayFlags,
    Painter, Projector,
};
pub use process::{ProcessLocator, SystemLocator};
