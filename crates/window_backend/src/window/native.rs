//! Platform window handles

use std::ffi::c_void;

use raw_window_handle::RawWindowHandle;

/// Opaque platform handle of the backend's window
///
/// The representation depends on the operating system and display server;
/// consumers must match on the variant they support and not assume a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeWindow {
    /// Win32 `HWND`
    Win32(*mut c_void),
    /// Xlib window id
    X11(u64),
    /// Wayland `wl_surface` pointer
    Wayland(*mut c_void),
    /// No handle is exposed on this platform
    None,
}

impl NativeWindow {
    /// Check whether a handle is available
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<RawWindowHandle> for NativeWindow {
    fn from(handle: RawWindowHandle) -> Self {
        match handle {
            RawWindowHandle::Win32(h) => Self::Win32(h.hwnd),
            RawWindowHandle::Xlib(h) => Self::X11(u64::from(h.window)),
            RawWindowHandle::Wayland(h) => Self::Wayland(h.surface),
            _ => Self::None,
        }
    }
}
