//! Rendering backend abstraction
//!
//! The backend owns the overlay window and the render thread. It calls the
//! registered frame handler once per frame with the overlay size and
//! rasterizes whatever draw commands arrive during that call.

use super::draw::DrawCommand;
use super::options::OverlayFlags;
use crate::core::types::{MemoryResult, WindowHandle};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Per-frame entry point, called with `(width, height)`
pub type FrameHandler = Arc<dyn Fn(i32, i32) + Send + Sync>;

/// Trait for overlay renderers
pub trait OverlayBackend: Send + Sync {
    /// Apply capability flags; the mask is forwarded without interpretation
    fn set_option(&self, flags: OverlayFlags);

    /// Start driving `handler` for an overlay over `window`
    fn register_frame_callback(&self, window: WindowHandle, handler: FrameHandler)
        -> MemoryResult<()>;

    /// Stop calling the registered handler
    fn unregister_frame_callback(&self);

    /// Queue a primitive for the current frame
    fn draw(&self, command: &DrawCommand);

    /// Get the backend name for diagnostics
    fn name(&self) -> &'static str;
}

#[derive(Default)]
struct Recorded {
    options: Vec<OverlayFlags>,
    window: Option<WindowHandle>,
    handler: Option<FrameHandler>,
    commands: Vec<DrawCommand>,
    registrations: usize,
}

/// Backend that keeps everything it is given
///
/// Frames only happen when [`RecordingOverlay::fire_frame`] is called, which
/// makes it suitable for tests, benches and headless dry runs. Clones share
/// state.
#[derive(Clone, Default)]
pub struct RecordingOverlay {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every option mask received, oldest first
    pub fn options_sent(&self) -> Vec<OverlayFlags> {
        self.lock().options.clone()
    }

    /// Window of the current registration
    pub fn window(&self) -> Option<WindowHandle> {
        self.lock().window
    }

    pub fn is_registered(&self) -> bool {
        self.lock().handler.is_some()
    }

    /// Number of registrations since creation
    pub fn registrations(&self) -> usize {
        self.lock().registrations
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.lock().commands.clone()
    }

    /// Drain the draw commands collected so far
    pub fn take_commands(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.lock().commands)
    }

    /// Run one frame; false if nothing is registered
    pub fn fire_frame(&self, width: i32, height: i32) -> bool {
        // released before the call so the handler can draw
        let handler = self.lock().handler.clone();
        match handler {
            Some(handler) => {
                handler(width, height);
                true
            }
            None => false,
        }
    }
}

impl OverlayBackend for RecordingOverlay {
    fn set_option(&self, flags: OverlayFlags) {
        self.lock().options.push(flags);
    }

    fn register_frame_callback(
        &self,
        window: WindowHandle,
        handler: FrameHandler,
    ) -> MemoryResult<()> {
        let mut recorded = self.lock();
        recorded.window = Some(window);
        recorded.handler = Some(handler);
        recorded.registrations += 1;
        Ok(())
    }

    fn unregister_frame_callback(&self) {
        let mut recorded = self.lock();
        recorded.window = None;
        recorded.handler = None;
    }

    fn draw(&self, command: &DrawCommand) {
        self.lock().commands.push(command.clone());
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

impl fmt::Debug for RecordingOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recorded = self.lock();
        f.debug_struct("RecordingOverlay")
            .field("window", &recorded.window)
            .field("registered", &recorded.handler.is_some())
            .field("commands", &recorded.commands.len())
            .finish()
    }
}
