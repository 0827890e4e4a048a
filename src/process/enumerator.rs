//! Process enumeration using Windows ToolHelp32 API

use crate::core::types::{MemoryResult, ProcessInfo};
use crate::windows::utils::{last_error_as_memory_error, wide_to_string};
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};
use winapi::um::winnt::HANDLE;

/// Process enumerator over a ToolHelp32 snapshot
pub struct ProcessEnumerator {
    snapshot: HANDLE,
    first_called: bool,
}

impl ProcessEnumerator {
    /// Take a snapshot of the running processes
    pub fn new() -> MemoryResult<Self> {
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
            return Err(last_error_as_memory_error(
                "Failed to create process snapshot",
            ));
        }
        Ok(ProcessEnumerator {
            snapshot,
            first_called: false,
        })
    }

    fn next_process(&mut self) -> Option<ProcessInfo> {
        unsafe {
            let mut entry: PROCESSENTRY32W = mem::zeroed();
            entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

            let success = if !self.first_called {
                self.first_called = true;
                Process32FirstW(self.snapshot, &mut entry)
            } else {
                Process32NextW(self.snapshot, &mut entry)
            };

            if success == FALSE {
                return None;
            }

            Some(ProcessInfo {
                pid: entry.th32ProcessID,
                name: wide_to_string(&entry.szExeFile),
                parent_pid: Some(entry.th32ParentProcessID),
                thread_count: entry.cntThreads,
            })
        }
    }
}

impl Drop for ProcessEnumerator {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.snapshot);
        }
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessInfo;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_process()
    }
}

/// Enumerate all running processes
pub fn enumerate_processes() -> MemoryResult<Vec<ProcessInfo>> {
    Ok(ProcessEnumerator::new()?.collect())
}

/// Find processes by image name (case-insensitive, `.exe` optional)
pub fn find_processes_by_name(name: &str) -> MemoryResult<Vec<ProcessInfo>> {
    Ok(ProcessEnumerator::new()?
        .filter(|p| p.name_matches(name))
        .collect())
}
