use crate::session::WindowRef;

#[cfg(target_os = "windows")]
use crate::observer::Restacking;
#[cfg(target_os = "windows")]
use crate::session::{SessionProps, SessionSnapshot};
#[cfg(target_os = "windows")]
use windows::Win32::Foundation::HWND;

/// Window class the engine registers for its scaling window. Discovery goes
/// through this class name; there is no other handshake.
pub const SCALING_WINDOW_CLASS: &str = "Window_Magpie_967EB565-6F73-4E94-AE53-00CC42592A22";

/// Name of the registered message the engine broadcasts on lifecycle changes.
pub const SCALING_CHANGED_MESSAGE: &str = "MagpieScalingChanged";

#[cfg(target_os = "windows")]
fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(target_os = "windows")]
pub fn to_hwnd(window: WindowRef) -> HWND {
    HWND(window.raw() as *mut core::ffi::c_void)
}

#[cfg(target_os = "windows")]
pub fn from_hwnd(hwnd: HWND) -> Option<WindowRef> {
    WindowRef::new(hwnd.0 as isize)
}

/// Message id of the engine's lifecycle broadcast, registered once.
#[cfg(target_os = "windows")]
pub fn scaling_changed_message() -> u32 {
    use once_cell::sync::Lazy;
    use windows::core::PCWSTR;
    use windows::Win32::UI::WindowsAndMessaging::RegisterWindowMessageW;

    static MESSAGE: Lazy<u32> = Lazy::new(|| {
        let name = to_wide(SCALING_CHANGED_MESSAGE);
        unsafe { RegisterWindowMessageW(PCWSTR(name.as_ptr())) }
    });
    *MESSAGE
}

/// Locate the engine's scaling window by class name. A window that exists
/// but is hidden is a leftover, not a live session, and is ignored.
#[cfg(target_os = "windows")]
pub fn find_scaling_window() -> Option<WindowRef> {
    use windows::core::PCWSTR;
    use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, IsWindowVisible};

    let class = to_wide(SCALING_WINDOW_CLASS);
    let hwnd = unsafe { FindWindowW(PCWSTR(class.as_ptr()), PCWSTR::null()) }.ok()?;
    if unsafe { IsWindowVisible(hwnd) }.as_bool() {
        from_hwnd(hwnd)
    } else {
        None
    }
}

#[cfg(not(target_os = "windows"))]
pub fn find_scaling_window() -> Option<WindowRef> {
    None
}

/// [`SessionProps`] backed by the properties the engine attaches to its
/// scaling window. Absent properties read as zero.
#[cfg(target_os = "windows")]
pub struct WindowProps;

#[cfg(target_os = "windows")]
impl SessionProps for WindowProps {
    fn read(&self, scaling: WindowRef) -> SessionSnapshot {
        use windows::core::{w, PCWSTR};
        use windows::Win32::UI::WindowsAndMessaging::GetPropW;

        use crate::geometry::Rect;

        let hwnd = to_hwnd(scaling);
        let prop = |key: PCWSTR| -> isize { unsafe { GetPropW(hwnd, key) }.0 as isize };

        SessionSnapshot {
            source_window: WindowRef::new(prop(w!("Magpie.SrcHWND"))),
            windowed: prop(w!("Magpie.Windowed")) != 0,
            src_rect: Rect::new(
                prop(w!("Magpie.SrcLeft")) as i32,
                prop(w!("Magpie.SrcTop")) as i32,
                prop(w!("Magpie.SrcRight")) as i32,
                prop(w!("Magpie.SrcBottom")) as i32,
            ),
            dest_rect: Rect::new(
                prop(w!("Magpie.DestLeft")) as i32,
                prop(w!("Magpie.DestTop")) as i32,
                prop(w!("Magpie.DestRight")) as i32,
                prop(w!("Magpie.DestBottom")) as i32,
            ),
        }
    }
}

/// Title of the given window, empty when it has none.
#[cfg(target_os = "windows")]
pub fn window_title(window: WindowRef) -> String {
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowTextLengthW, GetWindowTextW};

    let hwnd = to_hwnd(window);
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buffer = vec![0u16; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
}

#[cfg(not(target_os = "windows"))]
pub fn window_title(_window: WindowRef) -> String {
    String::new()
}

/// Raise the observer window above the scaling surface or release it from
/// always-on-top.
#[cfg(target_os = "windows")]
pub fn apply_restacking(hwnd: HWND, restacking: Restacking) {
    use windows::Win32::UI::WindowsAndMessaging::{
        BringWindowToTop, SetWindowPos, HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOACTIVATE, SWP_NOMOVE,
        SWP_NOSIZE,
    };

    let insert_after = match restacking {
        Restacking::Topmost => HWND_TOPMOST,
        Restacking::Normal => HWND_NOTOPMOST,
    };
    unsafe {
        if let Err(err) = SetWindowPos(
            hwnd,
            insert_after,
            0,
            0,
            0,
            0,
            SWP_NOACTIVATE | SWP_NOMOVE | SWP_NOSIZE,
        ) {
            tracing::warn!(?err, "failed to restack watcher window");
        }
        if matches!(restacking, Restacking::Topmost) {
            let _ = BringWindowToTop(hwnd);
        }
    }
}

/// Let the engine's broadcast through UIPI. Without this the message is
/// silently dropped whenever the engine runs at a higher integrity level.
#[cfg(target_os = "windows")]
pub fn allow_scaling_message(hwnd: HWND, message: u32) {
    use windows::Win32::UI::WindowsAndMessaging::{ChangeWindowMessageFilterEx, MSGFLT_ALLOW};

    if let Err(err) = unsafe { ChangeWindowMessageFilterEx(hwnd, message, MSGFLT_ALLOW, None) } {
        tracing::warn!(?err, "failed to open the message filter");
    }
}

/// Mark our window as a tool window of the engine so scaling continues when
/// the watcher gains focus.
#[cfg(target_os = "windows")]
pub fn mark_tool_window(hwnd: HWND) {
    use windows::core::w;
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::UI::WindowsAndMessaging::SetPropW;

    let flag = HANDLE(1 as *mut core::ffi::c_void);
    if let Err(err) = unsafe { SetPropW(hwnd, w!("Magpie.ToolWindow"), flag) } {
        tracing::warn!(?err, "failed to set the tool window property");
    }
}

/// Grow or shrink the scaled window by `delta_px` in both dimensions,
/// keeping its position and z-order.
#[cfg(target_os = "windows")]
pub fn resize_scaling_window(window: WindowRef, delta_px: i32) {
    use windows::Win32::Foundation::RECT;
    use windows::Win32::UI::WindowsAndMessaging::{
        GetWindowRect, SetWindowPos, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER,
    };

    let hwnd = to_hwnd(window);
    let mut rect = RECT::default();
    if unsafe { GetWindowRect(hwnd, &mut rect) }.is_err() {
        return;
    }
    let width = rect.right - rect.left + delta_px;
    let height = rect.bottom - rect.top + delta_px;
    unsafe {
        if let Err(err) = SetWindowPos(
            hwnd,
            None,
            0,
            0,
            width,
            height,
            SWP_NOACTIVATE | SWP_NOMOVE | SWP_NOZORDER,
        ) {
            tracing::warn!(?err, "failed to resize the scaling window");
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub fn resize_scaling_window(_window: WindowRef, _delta_px: i32) {}
