//! Main window module.
//!
//! Registers the window class, creates the TurkeySpell window and routes
//! character and paint messages into the session.

use crate::config::{parse_hex_color, AppConfig};
use crate::input::{CharEvent, KeyFlags};
use crate::session::Session;
use crate::sound::SoundQueue;
use thiserror::Error;
use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{
            BeginPaint, CreateFontW, CreateSolidBrush, DeleteObject, EndPaint, FillRect,
            GetSysColorBrush, InvalidateRect, SelectObject, SetBkMode, SetTextColor, TextOutW,
            UpdateWindow, COLOR_WINDOW, HBRUSH, HFONT, PAINTSTRUCT, TRANSPARENT,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect,
            GetMessageW, GetWindowLongPtrW, IsWindow, LoadCursorW, LoadIconW, MessageBoxW,
            PostQuitMessage, RegisterClassExW, SetWindowLongPtrW, ShowWindow, TranslateMessage,
            CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, IDC_ARROW, IDI_APPLICATION,
            MB_ICONERROR, MB_OK, MSG, SW_SHOWDEFAULT, WM_CHAR, WM_DESTROY, WM_PAINT,
            WNDCLASSEXW, WS_EX_OVERLAPPEDWINDOW, WS_OVERLAPPEDWINDOW,
        },
    },
};

const CLASS_NAME: &str = "TurkeySpell";

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Call to RegisterClassEx failed!")]
    RegisterClass,
    #[error("Call to CreateWindowEx failed! ({0})")]
    CreateWindow(#[from] windows::core::Error),
}

/// Null-terminated UTF-16 copy of `text`.
fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn colorref((r, g, b): (u8, u8, u8)) -> COLORREF {
    COLORREF(r as u32 | ((g as u32) << 8) | ((b as u32) << 16))
}

/// Window state stored in GWLP_USERDATA.
struct WindowState {
    session: Session,
    sounds: Option<SoundQueue>,
    font: HFONT,
    matched_brush: HBRUSH,
    text_color: COLORREF,
    text_origin: (i32, i32),
}

/// Returns the state attached to `hwnd`, if any.
///
/// # Safety
/// Must be called on the window's thread, and the reference must not outlive
/// the current message.
unsafe fn window_state<'a>(hwnd: HWND) -> Option<&'a mut WindowState> {
    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA);
    if ptr == 0 {
        None
    } else {
        Some(&mut *(ptr as *mut WindowState))
    }
}

/// Registers the window class.
fn register_class(class_name: &[u16]) -> Result<(), WindowError> {
    unsafe {
        let hinstance = GetModuleHandleW(None).unwrap_or_default();

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance.into(),
            hIcon: LoadIconW(None, IDI_APPLICATION).unwrap_or_default(),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as usize as *mut std::ffi::c_void),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hIconSm: LoadIconW(None, IDI_APPLICATION).unwrap_or_default(),
            ..Default::default()
        };

        if RegisterClassExW(&wc) != 0 {
            Ok(())
        } else {
            Err(WindowError::RegisterClass)
        }
    }
}

/// Window procedure for the main window.
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CHAR => {
            if let Some(state) = window_state(hwnd) {
                let event = CharEvent::new(wparam.0 as u32, KeyFlags::from_raw(lparam.0));
                if state.session.handle_char(event) {
                    let _ = InvalidateRect(hwnd, None, false);
                }
            }
            LRESULT(0)
        }
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);

            if let Some(state) = window_state(hwnd) {
                let frame = state.session.paint();

                let mut rect = RECT::default();
                let _ = GetClientRect(hwnd, &mut rect);
                let background = if frame.is_match() {
                    state.matched_brush
                } else {
                    GetSysColorBrush(COLOR_WINDOW)
                };
                FillRect(hdc, &rect, background);

                let _ = SetBkMode(hdc, TRANSPARENT);
                let old_font = SelectObject(hdc, state.font);
                SetTextColor(hdc, state.text_color);

                let text_wide: Vec<u16> = frame.text.encode_utf16().collect();
                let (x, y) = state.text_origin;
                let _ = TextOutW(hdc, x, y, &text_wide);

                SelectObject(hdc, old_font);

                if let (Some(path), Some(sounds)) = (frame.sound(), &state.sounds) {
                    if let Err(e) = sounds.play(path.clone()) {
                        log::warn!("Cannot queue {}: {}", path.display(), e);
                    }
                }
            }

            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        WM_DESTROY => {
            let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA);
            if ptr != 0 {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                let state = Box::from_raw(ptr as *mut WindowState);
                let _ = DeleteObject(state.font);
                let _ = DeleteObject(state.matched_brush);
                // Dropping the state joins the sound worker
            }
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// The TurkeySpell window.
pub struct MainWindow {
    hwnd: HWND,
}

impl MainWindow {
    /// Registers the class and creates the window. The window is not shown yet.
    pub fn new(
        config: &AppConfig,
        session: Session,
        sounds: Option<SoundQueue>,
    ) -> Result<Self, WindowError> {
        let class_name = wide(CLASS_NAME);
        register_class(&class_name)?;

        let title = wide(&config.title);

        unsafe {
            let hinstance = GetModuleHandleW(None).unwrap_or_default();

            let hwnd = CreateWindowExW(
                WS_EX_OVERLAPPEDWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                config.width,
                config.height,
                HWND::default(),
                None,
                hinstance,
                None,
            )?;

            log::debug!(
                "Created window hwnd {:?} size {}x{}",
                hwnd.0,
                config.width,
                config.height
            );

            let font_name = wide(&config.font_family);
            let font = CreateFontW(
                config.font_size as i32,
                0,
                0,
                0,
                400, // FW_NORMAL
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                PCWSTR(font_name.as_ptr()),
            );
            let matched_brush = CreateSolidBrush(colorref(parse_hex_color(&config.colors.matched)));

            let state = Box::new(WindowState {
                session,
                sounds,
                font,
                matched_brush,
                text_color: colorref(parse_hex_color(&config.colors.text)),
                text_origin: (config.text_x, config.text_y),
            });
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);

            Ok(Self { hwnd })
        }
    }

    /// Shows the window and paints it once.
    pub fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWDEFAULT);
            let _ = UpdateWindow(self.hwnd);
        }
    }
}

impl Drop for MainWindow {
    fn drop(&mut self) {
        unsafe {
            if IsWindow(self.hwnd).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}

/// Pumps messages until WM_QUIT. Returns the exit code it carried.
pub fn run_message_loop() -> i32 {
    let mut msg = MSG::default();
    unsafe {
        loop {
            let result = GetMessageW(&mut msg, HWND::default(), 0, 0);
            if result.0 == 0 || result.0 == -1 {
                break;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
    msg.wParam.0 as i32
}

/// Shows a modal error box titled "TurkeySpell".
pub fn show_error_message(text: &str) {
    let title = wide(CLASS_NAME);
    let message = wide(text);

    unsafe {
        let _ = MessageBoxW(
            None,
            PCWSTR(message.as_ptr()),
            PCWSTR(title.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}
