//! Win32 host window for the watcher.
//!
//! This is deliberately a thin adapter: window messages are decoded into
//! [`ScalingEvent`]s, handed to the observer state machine, and the returned
//! intents are executed with plain Win32 calls. No protocol logic lives here.

use crate::display;
use crate::observer::{Intent, ScalingEvent};
use crate::session::WindowRef;
use crate::settings::Settings;
use crate::win_util::{self, WindowProps};

use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateFontIndirectW, DeleteDC,
    DeleteObject, DrawTextW, EndPaint, FillRect, GetSysColorBrush, InvalidateRect, SelectObject,
    COLOR_WINDOW, DT_LEFT, DT_TOP, DT_WORDBREAK, FW_NORMAL, HFONT, LOGFONTW, PAINTSTRUCT, SRCCOPY,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::Input::KeyboardAndMouse::EnableWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, GetClientRect, GetForegroundWindow,
    GetMessageW, GetWindowLongPtrW, KillTimer, LoadCursorW, PostQuitMessage, RegisterClassW,
    SendMessageW, SetTimer, SetWindowLongPtrW, SetWindowPos, TranslateMessage, BN_CLICKED,
    CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HMENU, HWND_TOP,
    HWND_TOPMOST, IDC_ARROW, MINMAXINFO, MSG, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER,
    SWP_SHOWWINDOW, USER_DEFAULT_SCREEN_DPI, WINDOW_EX_STYLE, WM_COMMAND, WM_CREATE,
    WM_CTLCOLORBTN, WM_DESTROY, WM_DPICHANGED, WM_ERASEBKGND, WM_GETMINMAXINFO, WM_PAINT,
    WM_SETFONT, WM_SIZE, WM_TIMER, WNDCLASSW, WS_CHILD, WS_CLIPCHILDREN, WS_OVERLAPPEDWINDOW,
    WS_TABSTOP, WS_VISIBLE,
};

use crate::observer::ObserverState;

const POLL_TIMER_ID: usize = 1;
const ID_SIZE_UP: isize = 1;
const ID_SIZE_DOWN: isize = 2;

struct WindowState {
    observer: ObserverState,
    settings: Settings,
    dpi_scale: f64,
    font: HFONT,
    btn_size_up: HWND,
    btn_size_down: HWND,
}

impl WindowState {
    fn new(settings: Settings) -> Self {
        Self {
            observer: ObserverState::new(),
            settings,
            dpi_scale: 1.0,
            font: HFONT::default(),
            btn_size_up: HWND::default(),
            btn_size_down: HWND::default(),
        }
    }

    fn scaled(&self, value: i32) -> i32 {
        (value as f64 * self.dpi_scale).round() as i32
    }

    fn update_dpi(&mut self, dpi: u32) {
        self.dpi_scale = dpi as f64 / USER_DEFAULT_SCREEN_DPI as f64;
        unsafe {
            if !self.font.0.is_null() {
                let _ = DeleteObject(self.font);
            }
            let mut lf = LOGFONTW {
                lfHeight: self.scaled(20),
                lfWeight: FW_NORMAL.0 as i32,
                ..Default::default()
            };
            for (dst, src) in lf.lfFaceName.iter_mut().zip("Segoe UI\0".encode_utf16()) {
                *dst = src;
            }
            self.font = CreateFontIndirectW(&lf);
            for btn in [self.btn_size_up, self.btn_size_down] {
                SendMessageW(btn, WM_SETFONT, WPARAM(self.font.0 as usize), LPARAM(1));
            }
        }
    }

    fn layout_buttons(&self, hwnd: HWND) {
        unsafe {
            let mut client = RECT::default();
            let _ = GetClientRect(hwnd, &mut client);
            let padding = self.scaled(10);
            let btn_width = self.scaled(56);
            let btn_height = self.scaled(30);
            let top = client.bottom - client.top - padding - btn_height;
            let _ = SetWindowPos(
                self.btn_size_up,
                None,
                padding,
                top,
                btn_width,
                btn_height,
                SWP_NOACTIVATE | SWP_NOZORDER,
            );
            let _ = SetWindowPos(
                self.btn_size_down,
                None,
                padding + btn_width + self.scaled(4),
                top,
                btn_width,
                btn_height,
                SWP_NOACTIVATE | SWP_NOZORDER,
            );
        }
        self.enable_buttons();
    }

    /// The resize buttons only make sense while a session is active.
    fn enable_buttons(&self) {
        let enabled = self.observer.is_scaling();
        unsafe {
            let _ = EnableWindow(self.btn_size_up, enabled);
            let _ = EnableWindow(self.btn_size_down, enabled);
        }
    }
}

/// Create the watcher window and run its message loop until it is closed.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    unsafe {
        let instance = GetModuleHandleW(None)?;
        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: instance.into(),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            lpszClassName: w!("ScaleWatch"),
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            anyhow::bail!("failed to register the window class");
        }

        let state = Box::into_raw(Box::new(WindowState::new(settings)));
        let hwnd = match CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            wc.lpszClassName,
            w!("ScaleWatch"),
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            CW_USEDEFAULT,
            0,
            0,
            0,
            None,
            HMENU::default(),
            instance,
            Some(state as *const core::ffi::c_void),
        ) {
            Ok(hwnd) => hwnd,
            Err(err) => {
                drop(Box::from_raw(state));
                return Err(err.into());
            }
        };

        // Mirror the session found at startup in the initial z-order: topmost
        // only when the engine is scaling and its source is foreground.
        let state = &mut *state;
        let foreground = win_util::from_hwnd(GetForegroundWindow());
        let insert_after = match state.observer.snapshot.source_window {
            Some(source) if foreground == Some(source) => HWND_TOPMOST,
            _ => HWND_TOP,
        };
        let (width, height) = state.settings.window_size();
        let _ = SetWindowPos(
            hwnd,
            insert_after,
            0,
            0,
            state.scaled(width),
            state.scaled(height),
            SWP_NOMOVE | SWP_SHOWWINDOW,
        );

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).into() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
    Ok(())
}

unsafe fn state_mut<'a>(hwnd: HWND) -> Option<&'a mut WindowState> {
    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState;
    ptr.as_mut()
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == win_util::scaling_changed_message() {
        if let Some(state) = state_mut(hwnd) {
            on_scaling_changed(hwnd, state, wparam, lparam);
        }
        return LRESULT(0);
    }

    match msg {
        WM_CREATE => {
            on_create(hwnd, lparam);
            LRESULT(0)
        }
        WM_TIMER if wparam.0 == POLL_TIMER_ID => {
            if let Some(state) = state_mut(hwnd) {
                let intents = state.observer.handle_poll_tick(&WindowProps);
                run_intents(hwnd, &intents);
            }
            LRESULT(0)
        }
        WM_DPICHANGED => {
            if let Some(state) = state_mut(hwnd) {
                state.update_dpi(((wparam.0 >> 16) & 0xffff) as u32);
                state.layout_buttons(hwnd);
                let suggested = &*(lparam.0 as *const RECT);
                let _ = SetWindowPos(
                    hwnd,
                    None,
                    suggested.left,
                    suggested.top,
                    suggested.right - suggested.left,
                    suggested.bottom - suggested.top,
                    SWP_NOACTIVATE | SWP_NOZORDER,
                );
            }
            LRESULT(0)
        }
        WM_GETMINMAXINFO => {
            if let Some(state) = state_mut(hwnd) {
                let (width, height) = state.settings.window_size();
                let mmi = &mut *(lparam.0 as *mut MINMAXINFO);
                mmi.ptMinTrackSize = POINT {
                    x: state.scaled(width),
                    y: state.scaled(height),
                };
            }
            LRESULT(0)
        }
        WM_SIZE => {
            if let Some(state) = state_mut(hwnd) {
                state.layout_buttons(hwnd);
            }
            LRESULT(0)
        }
        // The whole client area is repainted from the back buffer.
        WM_ERASEBKGND => LRESULT(1),
        // Transparent background outside the native button borders.
        WM_CTLCOLORBTN => LRESULT(0),
        WM_PAINT => {
            if let Some(state) = state_mut(hwnd) {
                on_paint(hwnd, state);
                LRESULT(0)
            } else {
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
        }
        WM_COMMAND => {
            on_command(hwnd, wparam);
            LRESULT(0)
        }
        WM_DESTROY => {
            on_destroy(hwnd);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe fn on_create(hwnd: HWND, lparam: LPARAM) {
    let create = &*(lparam.0 as *const CREATESTRUCTW);
    let state_ptr = create.lpCreateParams as *mut WindowState;
    SetWindowLongPtrW(hwnd, GWLP_USERDATA, state_ptr as isize);
    let state = &mut *state_ptr;

    win_util::allow_scaling_message(hwnd, win_util::scaling_changed_message());
    win_util::mark_tool_window(hwnd);

    let instance = GetModuleHandleW(None).unwrap_or_default();
    state.btn_size_up = CreateWindowExW(
        WINDOW_EX_STYLE::default(),
        w!("BUTTON"),
        w!("Size+"),
        WS_CHILD | WS_VISIBLE | WS_TABSTOP,
        0,
        0,
        0,
        0,
        hwnd,
        HMENU(ID_SIZE_UP as *mut core::ffi::c_void),
        instance,
        None,
    )
    .unwrap_or_default();
    state.btn_size_down = CreateWindowExW(
        WINDOW_EX_STYLE::default(),
        w!("BUTTON"),
        w!("Size-"),
        WS_CHILD | WS_VISIBLE | WS_TABSTOP,
        0,
        0,
        0,
        0,
        hwnd,
        HMENU(ID_SIZE_DOWN as *mut core::ffi::c_void),
        instance,
        None,
    )
    .unwrap_or_default();

    state.update_dpi(GetDpiForWindow(hwnd));
    state
        .observer
        .attach_initial(win_util::find_scaling_window(), &WindowProps);
    state.layout_buttons(hwnd);
}

unsafe fn on_scaling_changed(hwnd: HWND, state: &mut WindowState, wparam: WPARAM, lparam: LPARAM) {
    let Some(event) = ScalingEvent::decode(wparam.0, WindowRef::new(lparam.0)) else {
        tracing::debug!(code = wparam.0, "ignoring unknown scaling notification");
        return;
    };

    let was_armed = state.observer.polling_armed;
    let intents = state.observer.handle_event(event, &WindowProps);

    // One reusable timer: armed on the DragStarted edge, killed on the first
    // definitive event after it.
    if state.observer.polling_armed && !was_armed {
        let _ = SetTimer(hwnd, POLL_TIMER_ID, state.settings.poll_interval(), None);
    } else if !state.observer.polling_armed && was_armed {
        let _ = KillTimer(hwnd, POLL_TIMER_ID);
    }

    state.enable_buttons();
    run_intents(hwnd, &intents);
}

unsafe fn run_intents(hwnd: HWND, intents: &[Intent]) {
    for intent in intents {
        match intent {
            Intent::Restack(restacking) => win_util::apply_restacking(hwnd, *restacking),
            Intent::Redraw => {
                let _ = InvalidateRect(hwnd, None, true);
            }
        }
    }
}

unsafe fn on_paint(hwnd: HWND, state: &mut WindowState) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    let mut client = RECT::default();
    let _ = GetClientRect(hwnd, &mut client);
    let width = client.right - client.left;
    let height = client.bottom - client.top;

    // Double buffering keeps the text from flickering during drag polling.
    let mem_dc = CreateCompatibleDC(hdc);
    let bitmap = CreateCompatibleBitmap(hdc, width, height);
    let old_bitmap = SelectObject(mem_dc, bitmap);
    let old_font = SelectObject(mem_dc, state.font);

    FillRect(mem_dc, &client, GetSysColorBrush(COLOR_WINDOW));

    let title = state
        .observer
        .snapshot
        .source_window
        .map(win_util::window_title)
        .unwrap_or_default();
    let text = display::status_text(&state.observer, &title);
    let mut wide: Vec<u16> = text.encode_utf16().collect();

    let padding = state.scaled(10);
    let mut text_rect = RECT {
        left: client.left + padding,
        top: client.top + padding,
        right: client.right - padding,
        bottom: client.bottom - padding,
    };
    DrawTextW(mem_dc, &mut wide, &mut text_rect, DT_TOP | DT_LEFT | DT_WORDBREAK);

    let _ = BitBlt(hdc, 0, 0, width, height, mem_dc, 0, 0, SRCCOPY);

    SelectObject(mem_dc, old_font);
    SelectObject(mem_dc, old_bitmap);
    let _ = DeleteObject(bitmap);
    let _ = DeleteDC(mem_dc);
    let _ = EndPaint(hwnd, &ps);
}

unsafe fn on_command(hwnd: HWND, wparam: WPARAM) {
    let notification = ((wparam.0 >> 16) & 0xffff) as u32;
    if notification != BN_CLICKED as u32 {
        return;
    }
    if let Some(state) = state_mut(hwnd) {
        if let Some(scaling) = state.observer.active_session {
            let id = (wparam.0 & 0xffff) as isize;
            let step = state.scaled(state.settings.resize_step_px);
            let delta = if id == ID_SIZE_UP { step } else { -step };
            win_util::resize_scaling_window(scaling, delta);
        }
    }
}

unsafe fn on_destroy(hwnd: HWND) {
    if let Some(state) = state_mut(hwnd) {
        // The poll timer must not outlive the state it reads.
        if state.observer.polling_armed {
            let _ = KillTimer(hwnd, POLL_TIMER_ID);
            state.observer.polling_armed = false;
        }
        if !state.font.0.is_null() {
            let _ = DeleteObject(state.font);
        }
    }
    let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowState;
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
    PostQuitMessage(0);
}
