//! Per-frame bridge between the overlay backend and user logic
//!
//! [`FrameBridge::attach`] resolves the target process and its main window,
//! opens the process, and registers a frame handler with the backend. On
//! every frame the handler updates the session's projector viewport and then
//! calls the user callback with the memory accessor and the projector.

use super::backend::{FrameHandler, OverlayBackend};
use super::draw::Painter;
use super::options::{BridgeOptions, OverlayFlags};
use super::projector::Projector;
use crate::core::types::{MemoryError, MemoryResult, ProcessInfo, WindowHandle};
use crate::memory::{MemoryAccessor, WriteStrategy};
use crate::process::ProcessLocator;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// User logic run once per frame
pub type FrameCallback = Box<dyn FnMut(&MemoryAccessor, &mut Projector, i32, i32) + Send>;

/// Lifecycle of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    Attaching,
    Attached,
    Detached,
}

/// Process and window an attached bridge is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedTarget {
    pub process: ProcessInfo,
    pub window: WindowHandle,
}

/// Everything one frame needs; lives exactly as long as an attach
struct FrameSession {
    memory: MemoryAccessor,
    projector: Projector,
    callback: FrameCallback,
}

impl FrameSession {
    fn on_frame(&mut self, width: i32, height: i32) {
        self.projector.set_viewport(width, height);
        (self.callback)(&self.memory, &mut self.projector, width, height);
    }
}

type SharedSession = Arc<Mutex<FrameSession>>;

fn lock_session(session: &SharedSession) -> MutexGuard<'_, FrameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Attaches to a target and drives user logic from backend frames
pub struct FrameBridge {
    backend: Arc<dyn OverlayBackend>,
    locator: Box<dyn ProcessLocator>,
    options: BridgeOptions,
    state: BridgeState,
    target: Option<AttachedTarget>,
    session: Option<SharedSession>,
}

impl FrameBridge {
    pub fn new(backend: Arc<dyn OverlayBackend>, locator: impl ProcessLocator + 'static) -> Self {
        FrameBridge {
            backend,
            locator: Box::new(locator),
            options: BridgeOptions::default(),
            state: BridgeState::Idle,
            target: None,
            session: None,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn target(&self) -> Option<&AttachedTarget> {
        self.target.as_ref()
    }

    pub fn options(&self) -> BridgeOptions {
        self.options
    }

    /// Draw handle bound to this bridge's backend
    pub fn painter(&self) -> Painter {
        Painter::new(Arc::clone(&self.backend))
    }

    /// Apply a full option set
    ///
    /// The overlay flags are forwarded to the backend only when they differ
    /// from the mask last sent, so a call that only toggles `fast_write`
    /// leaves the backend untouched. `fast_write` never leaves the bridge:
    /// it picks the write primitive for the next attach and for later
    /// writes of a live session.
    pub fn set_options(&mut self, options: BridgeOptions) {
        self.set_fast_write(options.fast_write);
        if options.overlay != self.options.overlay {
            self.set_overlay_flags(options.overlay);
        }
    }

    pub fn set_fast_write(&mut self, fast_write: bool) {
        self.options.fast_write = fast_write;
        if let Some(session) = &self.session {
            lock_session(session)
                .memory
                .set_strategy(WriteStrategy::from_fast_write(fast_write));
        }
        debug!("Fast write {}", if fast_write { "enabled" } else { "disabled" });
    }

    pub fn set_overlay_flags(&mut self, flags: OverlayFlags) {
        if self.state == BridgeState::Attached {
            warn!("Overlay options {} set after attach may not apply", flags);
        }
        self.options.overlay = flags;
        self.backend.set_option(flags);
    }

    /// Attach to the single running process named `process_name`
    ///
    /// On failure the bridge keeps its previous state.
    pub fn attach<F>(&mut self, process_name: &str, callback: F) -> MemoryResult<()>
    where
        F: FnMut(&MemoryAccessor, &mut Projector, i32, i32) + Send + 'static,
    {
        if let (BridgeState::Attached, Some(target)) = (self.state, &self.target) {
            return Err(MemoryError::AlreadyAttached(target.process.pid));
        }

        let previous = self.state;
        self.state = BridgeState::Attaching;

        match self.try_attach(process_name, Box::new(callback)) {
            Ok((target, session)) => {
                info!(
                    "Attached to {} (pid {}) on {}",
                    target.process.name, target.process.pid, target.window
                );
                self.target = Some(target);
                self.session = Some(session);
                self.state = BridgeState::Attached;
                Ok(())
            }
            Err(e) => {
                warn!("Attach to {} failed: {}", process_name, e);
                self.state = previous;
                Err(e)
            }
        }
    }

    fn try_attach(
        &self,
        process_name: &str,
        callback: FrameCallback,
    ) -> MemoryResult<(AttachedTarget, SharedSession)> {
        let mut matches = self.locator.find_processes(process_name)?;
        let process = match matches.len() {
            0 => return Err(MemoryError::ProcessNotFound(process_name.to_string())),
            1 => matches.remove(0),
            count => {
                return Err(MemoryError::AmbiguousProcess {
                    name: process_name.to_string(),
                    count,
                })
            }
        };

        let window = self
            .locator
            .main_window(process.pid)?
            .ok_or(MemoryError::NoWindow { pid: process.pid })?;

        let memory = MemoryAccessor::new(
            self.locator.open_memory(process.pid)?,
            WriteStrategy::from_fast_write(self.options.fast_write),
        );

        let session = Arc::new(Mutex::new(FrameSession {
            memory,
            projector: Projector::new(),
            callback,
        }));

        let frame_session = Arc::clone(&session);
        let handler: FrameHandler =
            Arc::new(move |width: i32, height: i32| lock_session(&frame_session).on_frame(width, height));
        self.backend.register_frame_callback(window, handler)?;

        Ok((AttachedTarget { process, window }, session))
    }

    /// Stop receiving frames and release the process handle
    pub fn detach(&mut self) {
        if self.state != BridgeState::Attached {
            return;
        }

        self.backend.unregister_frame_callback();
        self.session = None;
        if let Some(target) = self.target.take() {
            info!("Detached from pid {}", target.process.pid);
        }
        self.state = BridgeState::Detached;
    }
}

impl Drop for FrameBridge {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for FrameBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBridge")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("target", &self.target)
            .field("options", &self.options)
            .finish()
    }
}
