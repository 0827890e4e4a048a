//! Overlay backend backed by the native Direct2D overlay DLL
//!
//! The DLL exposes a single global overlay: one setup call that starts its
//! render thread against a window, one option sink, and immediate-mode draw
//! calls that are only meaningful during a frame callback.

use super::backend::{FrameHandler, OverlayBackend};
use super::draw::DrawCommand;
use super::options::OverlayFlags;
use crate::core::types::{MemoryError, MemoryResult, WindowHandle};
use crate::windows::utils::{path_to_wide, string_to_wide};
use lazy_static::lazy_static;
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};
use winapi::shared::minwindef::HMODULE;
use winapi::um::libloaderapi::{GetProcAddress, LoadLibraryW};

/// File name the overlay DLL ships under
pub const NATIVE_LIBRARY: &str = "Charm_native.dll";

type FrameTrampoline = extern "C" fn(i32, i32);
type SetupFn = unsafe extern "C" fn(FrameTrampoline, *mut c_void);
type SetOptionFn = unsafe extern "C" fn(u32);
type DrawLineFn = unsafe extern "C" fn(f32, f32, f32, f32, f32, f32, f32, f32, f32);
// Win32 BOOL for `filled`
type DrawShapeFn = unsafe extern "C" fn(f32, f32, f32, f32, f32, f32, f32, f32, f32, i32);
type DrawCircleFn = unsafe extern "C" fn(f32, f32, f32, f32, f32, f32, f32, f32, i32);
type DrawStringFn = unsafe extern "C" fn(*const u16, f32, f32, f32, f32, f32, f32, f32);

lazy_static! {
    // The DLL calls back without a context pointer, so the handler for the
    // one live overlay sits here.
    static ref FRAME_HANDLER: Mutex<Option<FrameHandler>> = Mutex::new(None);
}

fn frame_slot() -> MutexGuard<'static, Option<FrameHandler>> {
    FRAME_HANDLER.lock().unwrap_or_else(PoisonError::into_inner)
}

extern "C" fn frame_trampoline(width: i32, height: i32) {
    let handler = frame_slot().clone();
    let Some(handler) = handler else {
        return;
    };

    // Unwinding across the C frame is undefined
    if panic::catch_unwind(AssertUnwindSafe(|| handler(width, height))).is_err() {
        error!("Frame callback panicked ({}x{})", width, height);
    }
}

/// Function table resolved from the overlay DLL
pub struct NativeOverlay {
    path: PathBuf,
    setup: SetupFn,
    set_option: SetOptionFn,
    draw_line: DrawLineFn,
    draw_box: DrawShapeFn,
    draw_circle: DrawCircleFn,
    draw_ellipse: DrawShapeFn,
    draw_string: DrawStringFn,
}

impl NativeOverlay {
    /// Load the overlay DLL and resolve its exports
    ///
    /// The module is never unloaded; its render thread may outlive any
    /// single attach session.
    pub fn load<P: AsRef<Path>>(dll_path: P) -> MemoryResult<Self> {
        let path = dll_path.as_ref();
        let wide_path = path_to_wide(path);

        let module = unsafe { LoadLibraryW(wide_path.as_ptr()) };
        if module.is_null() {
            return Err(MemoryError::BackendUnavailable(format!(
                "failed to load {}",
                path.display()
            )));
        }

        unsafe {
            let overlay = NativeOverlay {
                path: path.to_path_buf(),
                setup: std::mem::transmute(export(module, b"DirectOverlaySetup\0")?),
                set_option: std::mem::transmute(export(module, b"DirectOverlaySetOption\0")?),
                draw_line: std::mem::transmute(export(module, b"DrawLine\0")?),
                draw_box: std::mem::transmute(export(module, b"DrawBox\0")?),
                draw_circle: std::mem::transmute(export(module, b"DrawCircle\0")?),
                draw_ellipse: std::mem::transmute(export(module, b"DrawEllipse\0")?),
                draw_string: std::mem::transmute(export(module, b"DrawString\0")?),
            };
            info!("Loaded overlay backend from {}", path.display());
            Ok(overlay)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

unsafe fn export(module: HMODULE, name: &[u8]) -> MemoryResult<*const c_void> {
    let proc = GetProcAddress(module, name.as_ptr() as *const i8);
    if proc.is_null() {
        let symbol = String::from_utf8_lossy(&name[..name.len() - 1]).into_owned();
        return Err(MemoryError::BackendUnavailable(format!(
            "missing export {}",
            symbol
        )));
    }
    Ok(proc as *const c_void)
}

impl OverlayBackend for NativeOverlay {
    fn set_option(&self, flags: OverlayFlags) {
        debug!("Forwarding overlay options {}", flags);
        unsafe { (self.set_option)(flags.bits()) }
    }

    fn register_frame_callback(
        &self,
        window: WindowHandle,
        handler: FrameHandler,
    ) -> MemoryResult<()> {
        if frame_slot().replace(handler).is_some() {
            warn!("Replacing an existing frame handler");
        }
        unsafe { (self.setup)(frame_trampoline, window.raw() as *mut c_void) };
        info!("Overlay attached to {}", window);
        Ok(())
    }

    fn unregister_frame_callback(&self) {
        frame_slot().take();
    }

    fn draw(&self, command: &DrawCommand) {
        let [r, g, b, a] = command.rgba();
        unsafe {
            match command {
                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    thickness,
                    ..
                } => (self.draw_line)(*x1, *y1, *x2, *y2, *thickness, r, g, b, a),
                DrawCommand::Box {
                    x,
                    y,
                    width,
                    height,
                    thickness,
                    filled,
                    ..
                } => (self.draw_box)(*x, *y, *width, *height, *thickness, r, g, b, a, *filled as i32),
                DrawCommand::Circle {
                    x,
                    y,
                    radius,
                    thickness,
                    filled,
                    ..
                } => (self.draw_circle)(*x, *y, *radius, *thickness, r, g, b, a, *filled as i32),
                DrawCommand::Ellipse {
                    x,
                    y,
                    width,
                    height,
                    thickness,
                    filled,
                    ..
                } => (self.draw_ellipse)(
                    *x,
                    *y,
                    *width,
                    *height,
                    *thickness,
                    r,
                    g,
                    b,
                    a,
                    *filled as i32,
                ),
                DrawCommand::Text {
                    x, y, text, size, ..
                } => {
                    let wide = string_to_wide(text);
                    (self.draw_string)(wide.as_ptr(), *size, *x, *y, r, g, b, a)
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

impl std::fmt::Debug for NativeOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeOverlay")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
