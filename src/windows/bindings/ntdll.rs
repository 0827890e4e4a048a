//! NTDLL.dll bindings for the native write path

use crate::windows::utils::{ErrorCode, RawTransfer};
use winapi::shared::basetsd::SIZE_T;
use winapi::shared::ntdef::{NTSTATUS, PVOID};
use winapi::um::winnt::HANDLE;

pub const STATUS_SUCCESS: NTSTATUS = 0x00000000;

#[link(name = "ntdll")]
extern "system" {
    fn NtWriteVirtualMemory(
        process_handle: HANDLE,
        base_address: PVOID,
        buffer: PVOID,
        buffer_size: SIZE_T,
        bytes_written: *mut SIZE_T,
    ) -> NTSTATUS;
}

/// Write through `NtWriteVirtualMemory`, skipping the Win32 wrapper
///
/// `WriteProcessMemory` queries and temporarily adjusts page protection
/// before it copies. This path goes straight to the system call, so the
/// target pages must already be writable.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_WRITE` and
/// `PROCESS_VM_OPERATION`
pub unsafe fn write_virtual_memory(handle: HANDLE, address: usize, data: &[u8]) -> RawTransfer {
    let mut bytes_written: SIZE_T = 0;

    let status = NtWriteVirtualMemory(
        handle,
        address as PVOID,
        data.as_ptr() as PVOID,
        data.len(),
        &mut bytes_written,
    );

    if status == STATUS_SUCCESS {
        RawTransfer::complete(bytes_written)
    } else {
        RawTransfer::failed(bytes_written, ErrorCode::from_nt_status(status))
    }
}
