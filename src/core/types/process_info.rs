//! Process and window identities

use super::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Information about a running process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: ProcessId,
    pub name: String,
    pub parent_pid: Option<ProcessId>,
    pub thread_count: u32,
}

impl ProcessInfo {
    /// Creates a new ProcessInfo with minimal information
    pub fn new(pid: ProcessId, name: impl Into<String>) -> Self {
        ProcessInfo {
            pid,
            name: name.into(),
            parent_pid: None,
            thread_count: 0,
        }
    }

    /// Image name without a trailing `.exe`
    pub fn base_name(&self) -> &str {
        strip_exe(&self.name)
    }

    /// Case-insensitive name match where the `.exe` suffix is optional on
    /// either side, so `"game"` and `"Game.exe"` both match `game.exe`.
    pub fn name_matches(&self, query: &str) -> bool {
        self.base_name().eq_ignore_ascii_case(strip_exe(query.trim()))
    }
}

fn strip_exe(name: &str) -> &str {
    let len = name.len();
    if len >= 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".exe") {
        &name[..len - 4]
    } else {
        name
    }
}

/// Opaque top-level window handle (`HWND` value on Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const fn raw(&self) -> isize {
        self.0
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HWND(0x{:X})", self.0)
    }
}
