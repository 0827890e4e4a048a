//! Safe process handle wrapper with RAII semantics

use crate::core::types::{Address, MemoryError, MemoryResult, RegionInfo};
use crate::memory::{ProcessMemory, WriteStrategy};
use crate::windows::bindings::{kernel32, ntdll};
use crate::windows::types::MemoryBasicInfo;
use crate::windows::utils::{ErrorCode, RawTransfer};
use std::fmt;
use tracing::{debug, warn};
use winapi::um::winnt::HANDLE;

/// Access rights for process handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };
    /// Write memory access
    pub const VM_WRITE: Self = Self { value: 0x0020 };
    /// Operation rights required by both write paths
    pub const VM_OPERATION: Self = Self { value: 0x0008 };

    /// Rights an attach session needs
    pub const SESSION: Self = Self { value: 0x0438 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        for right in rights {
            value |= right.value;
        }
        Self { value }
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Owned handle to a target process, closed on drop
pub struct ProcessHandle {
    handle: HANDLE,
    pid: u32,
    access: ProcessAccess,
}

// The raw handle is a kernel object reference; it is valid from any thread.
unsafe impl Send for ProcessHandle {}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: u32, access: ProcessAccess) -> MemoryResult<Self> {
        let handle = kernel32::open_process(pid, access.value())?;
        debug!("Opened process {} with access 0x{:X}", pid, access.value());
        Ok(ProcessHandle {
            handle,
            pid,
            access,
        })
    }

    /// Open a process for reading and writing memory
    pub fn open_for_read_write(pid: u32) -> MemoryResult<Self> {
        Self::open(pid, ProcessAccess::SESSION)
    }

    /// Get the process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the access rights
    pub fn access(&self) -> ProcessAccess {
        self.access
    }

    /// Whether the target is still running
    pub fn is_alive(&self) -> bool {
        unsafe { kernel32::exit_code(self.handle) == Some(kernel32::STILL_ACTIVE) }
    }

    /// Turns a raw transfer into the accessor contract: counts for anything
    /// the OS managed to copy, errors only for faults on the handle itself.
    fn settle(&self, transfer: RawTransfer, op: &str, address: Address) -> MemoryResult<usize> {
        match transfer.error {
            None => Ok(transfer.transferred),
            Some(ErrorCode::AccessDenied) => {
                warn!("{} at {} denied for process {}", op, address, self.pid);
                Err(MemoryError::access_denied(
                    self.pid,
                    format!("{} at {}", op, address),
                ))
            }
            Some(code) => {
                if !self.is_alive() {
                    warn!("Process {} exited during {} at {}", self.pid, op, address);
                    return Err(MemoryError::TargetGone(self.pid));
                }
                debug!(
                    "{} at {} stopped after {} bytes: {}",
                    op, address, transfer.transferred, code
                );
                Ok(transfer.transferred)
            }
        }
    }
}

impl ProcessMemory for ProcessHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        let transfer =
            unsafe { kernel32::read_process_memory(self.handle, address.as_usize(), buffer) };
        self.settle(transfer, "read", address)
    }

    fn write_memory(
        &self,
        address: Address,
        data: &[u8],
        strategy: WriteStrategy,
    ) -> MemoryResult<usize> {
        let transfer = unsafe {
            match strategy {
                WriteStrategy::Standard => {
                    kernel32::write_process_memory(self.handle, address.as_usize(), data)
                }
                WriteStrategy::Fast => {
                    ntdll::write_virtual_memory(self.handle, address.as_usize(), data)
                }
            }
        };
        self.settle(transfer, "write", address)
    }

    fn query_region(&self, address: Address) -> MemoryResult<RegionInfo> {
        match unsafe { kernel32::virtual_query_ex(self.handle, address.as_usize()) } {
            Ok(mbi) => Ok(MemoryBasicInfo::from(mbi).into()),
            Err(_) if !self.is_alive() => Err(MemoryError::TargetGone(self.pid)),
            Err(e) => Err(e),
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if let Err(e) = unsafe { kernel32::close_handle(self.handle) } {
            warn!("Closing handle for process {}: {}", self.pid, e);
        }
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessHandle(pid={})", self.pid)
    }
}
