//! Kernel32.dll bindings for process and memory operations

use crate::core::types::{MemoryError, MemoryResult};
use crate::windows::utils::{ErrorCode, RawTransfer};
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{ReadProcessMemory, VirtualQueryEx, WriteProcessMemory};
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::winnt::{HANDLE, MEMORY_BASIC_INFORMATION};

/// Exit code reported by `GetExitCodeProcess` while a process is running
pub const STILL_ACTIVE: DWORD = 259;

/// Safe wrapper for OpenProcess
///
/// A refused open is classified: `ERROR_ACCESS_DENIED` becomes
/// `AccessDenied`, `ERROR_INVALID_PARAMETER` (no such pid) becomes
/// `ProcessGone`.
pub fn open_process(pid: u32, desired_access: u32) -> MemoryResult<HANDLE> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if !handle.is_null() {
        return Ok(handle);
    }

    match ErrorCode::last_error() {
        ErrorCode::AccessDenied => Err(MemoryError::access_denied(pid, "OpenProcess refused")),
        ErrorCode::InvalidParameter => Err(MemoryError::ProcessGone(pid)),
        code => Err(MemoryError::WindowsApi(format!(
            "OpenProcess failed for PID {}: {}",
            pid, code
        ))),
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle owned by the caller
pub unsafe fn close_handle(handle: HANDLE) -> MemoryResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(MemoryError::WindowsApi(
            "Failed to close handle".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Wrapper for ReadProcessMemory that always reports the transferred count
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(handle: HANDLE, address: usize, buffer: &mut [u8]) -> RawTransfer {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        RawTransfer::failed(bytes_read, ErrorCode::last_error())
    } else {
        RawTransfer::complete(bytes_read)
    }
}

/// Wrapper for WriteProcessMemory that always reports the transferred count
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_WRITE` and
/// `PROCESS_VM_OPERATION`
pub unsafe fn write_process_memory(handle: HANDLE, address: usize, data: &[u8]) -> RawTransfer {
    let mut bytes_written = 0;

    let result = WriteProcessMemory(
        handle,
        address as LPVOID,
        data.as_ptr() as LPCVOID,
        data.len(),
        &mut bytes_written,
    );

    if result == FALSE {
        RawTransfer::failed(bytes_written, ErrorCode::last_error())
    } else {
        RawTransfer::complete(bytes_written)
    }
}

/// Safe wrapper for VirtualQueryEx
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_QUERY_INFORMATION`
pub unsafe fn virtual_query_ex(
    handle: HANDLE,
    address: usize,
) -> MemoryResult<MEMORY_BASIC_INFORMATION> {
    let mut mbi: MEMORY_BASIC_INFORMATION = mem::zeroed();

    let result = VirtualQueryEx(
        handle,
        address as LPCVOID,
        &mut mbi,
        mem::size_of::<MEMORY_BASIC_INFORMATION>(),
    );

    if result == 0 {
        Err(MemoryError::InvalidAddress(format!(
            "VirtualQueryEx failed for 0x{:X}: {}",
            address,
            ErrorCode::last_error()
        )))
    } else {
        Ok(mbi)
    }
}

/// Exit code of the process, `STILL_ACTIVE` while it runs
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_QUERY_INFORMATION`
pub unsafe fn exit_code(handle: HANDLE) -> Option<DWORD> {
    let mut code: DWORD = 0;
    if GetExitCodeProcess(handle, &mut code) == FALSE {
        None
    } else {
        Some(code)
    }
}
