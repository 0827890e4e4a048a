//! Overlay side of the bridge
//!
//! This module provides:
//! - [`Projector`] for world-to-screen conversion
//! - [`OverlayFlags`] and [`BridgeOptions`] for backend and local options
//! - [`DrawCommand`], [`Color`] and [`Painter`] for issuing draw requests
//! - the [`OverlayBackend`] trait with a recording and a native implementation
//! - [`FrameBridge`], which ties a target process to the backend's frames

pub mod backend;
pub mod bridge;
pub mod draw;
#[cfg(windows)]
pub mod native;
pub mod options;
pub mod projector;

pub use backend::{FrameHandler, OverlayBackend, RecordingOverlay};
pub use bridge::{AttachedTarget, BridgeState, FrameBridge, FrameCallback};
pub use draw::{Color, DrawCommand, Painter, DEFAULT_FONT_SIZE};
#[cfg(windows)]
pub use native::{NativeOverlay, NATIVE_LIBRARY};
pub use options::{BridgeOptions, OverlayFlags};
pub use projector::{Projector, MIN_CLIP_W};
