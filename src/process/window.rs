//! Main window resolution through top-level window enumeration

use crate::core::types::{MemoryResult, ProcessId, WindowHandle};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindow, GetWindowThreadProcessId, IsWindowVisible, GW_OWNER,
};

struct WindowSearch {
    pid: ProcessId,
    found: Option<HWND>,
}

unsafe extern "system" fn visit_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let search = &mut *(lparam.0 as *mut WindowSearch);

    let mut owner_pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut owner_pid as *mut u32));
    if owner_pid != search.pid || !IsWindowVisible(hwnd).as_bool() {
        return BOOL(1);
    }

    // Owned windows are dialogs and tool windows, not the main window
    if GetWindow(hwnd, GW_OWNER).0 != 0 {
        return BOOL(1);
    }

    search.found = Some(hwnd);
    BOOL(0)
}

/// First visible, unowned top-level window belonging to `pid`
pub fn find_main_window(pid: ProcessId) -> MemoryResult<Option<WindowHandle>> {
    let mut search = WindowSearch { pid, found: None };

    // Stopping early makes EnumWindows report failure, so only an empty
    // search turns that into an error.
    let result = unsafe {
        EnumWindows(
            Some(visit_window),
            LPARAM(&mut search as *mut WindowSearch as isize),
        )
    };

    match (search.found, result) {
        (Some(hwnd), _) => Ok(Some(WindowHandle(hwnd.0))),
        (None, Err(e)) if e.code().is_err() => Err(e.into()),
        (None, _) => Ok(None),
    }
}
