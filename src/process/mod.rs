//! Process discovery and handle management
//!
//! The [`ProcessLocator`] trait is what the frame bridge uses to turn a
//! process name into a pid, a main window, and an open memory source.
//! [`SystemLocator`] implements it on Windows with ToolHelp32 snapshots,
//! top-level window enumeration and [`ProcessHandle`].

#[cfg(windows)]
pub mod enumerator;
#[cfg(windows)]
pub mod handle;
#[cfg(windows)]
pub mod window;

#[cfg(windows)]
pub use enumerator::{enumerate_processes, find_processes_by_name, ProcessEnumerator};
#[cfg(windows)]
pub use handle::{ProcessAccess, ProcessHandle};
#[cfg(windows)]
pub use window::find_main_window;

use crate::core::types::{MemoryResult, ProcessId, ProcessInfo, WindowHandle};
use crate::memory::ProcessMemory;

/// Source of processes, windows and memory handles
pub trait ProcessLocator: Send + Sync {
    /// All running processes whose image name matches `name`
    fn find_processes(&self, name: &str) -> MemoryResult<Vec<ProcessInfo>>;

    /// Primary top-level window of `pid`, if it has one
    fn main_window(&self, pid: ProcessId) -> MemoryResult<Option<WindowHandle>>;

    /// Open the process for reading, writing and region queries
    fn open_memory(&self, pid: ProcessId) -> MemoryResult<Box<dyn ProcessMemory>>;
}

/// Locator backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocator;

#[cfg(windows)]
impl ProcessLocator for SystemLocator {
    fn find_processes(&self, name: &str) -> MemoryResult<Vec<ProcessInfo>> {
        find_processes_by_name(name)
    }

    fn main_window(&self, pid: ProcessId) -> MemoryResult<Option<WindowHandle>> {
        find_main_window(pid)
    }

    fn open_memory(&self, pid: ProcessId) -> MemoryResult<Box<dyn ProcessMemory>> {
        Ok(Box::new(ProcessHandle::open_for_read_write(pid)?))
    }
}

#[cfg(not(windows))]
impl ProcessLocator for SystemLocator {
    fn find_processes(&self, _name: &str) -> MemoryResult<Vec<ProcessInfo>> {
        Err(crate::core::types::MemoryError::unsupported(
            "process enumeration requires Windows",
        ))
    }

    fn main_window(&self, _pid: ProcessId) -> MemoryResult<Option<WindowHandle>> {
        Err(crate::core::types::MemoryError::unsupported(
            "window enumeration requires Windows",
        ))
    }

    fn open_memory(&self, _pid: ProcessId) -> MemoryResult<Box<dyn ProcessMemory>> {
        Err(crate::core::types::MemoryError::unsupported(
            "process memory access requires Windows",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn test_system_locator_unsupported() {
        use crate::core::types::MemoryError;

        let locator = SystemLocator;
        assert!(matches!(
            locator.find_processes("game"),
            Err(MemoryError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            locator.main_window(1),
            Err(MemoryError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            locator.open_memory(1),
            Err(MemoryError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    #[cfg(windows)]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_system_locator_opens_own_process() {
        let locator = SystemLocator;
        let memory = locator.open_memory(std::process::id()).unwrap();
        assert_eq!(memory.pid(), std::process::id());
    }
}
