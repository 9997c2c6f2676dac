//! Window system trait
//!
//! This module defines the traits the render loop drives. The GLFW window in
//! `glfw_window.rs` is the production implementation; tests substitute
//! recording mocks so the loop can be exercised without a display.

use glfw::WindowEvent;

use super::native::NativeWindow;
use super::WindowResult;

/// Called by the window system when the window contents must be repainted
///
/// Runs synchronously from inside [`WindowSystem::poll_events`], which is
/// where the platform's modal move and resize loops live.
pub type RefreshHandler = Box<dyn FnMut(&mut dyn Surface)>;

/// The part of a window one frame draws into
///
/// This is all a frame needs, so refresh handlers can render from inside
/// event polling without borrowing the whole window.
pub trait Surface {
    /// Get the current framebuffer size in pixels
    ///
    /// Differs from the window size on displays with a content scale.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Check whether this window's GL context is current on this thread
    fn is_context_current(&self) -> bool;

    /// Make this window's GL context current on this thread
    fn make_context_current(&mut self);

    /// Swap front and back buffers
    fn swap_buffers(&mut self);

    /// Address of a GL function, null if unavailable
    ///
    /// For GUI bridges that load their renderer's GL entry points.
    fn proc_address(&mut self, name: &str) -> *const std::ffi::c_void;
}

/// Interface between the [`Backend`](crate::Backend) and a native window
///
/// Every method must be called from the thread that created the window.
///
/// # Thread Safety
/// Not `Send`: GLFW windows and their GL contexts belong to one thread.
pub trait WindowSystem: Surface {
    /// Check if the window should close
    ///
    /// Returns true once the user has requested the window to close (clicked
    /// the X button, pressed Alt+F4, etc.).
    fn should_close(&self) -> bool;

    /// Poll for window events
    ///
    /// Processes pending window system events without blocking and returns
    /// them in arrival order. The refresh handler, if any, runs during this
    /// call.
    fn poll_events(&mut self) -> Vec<WindowEvent>;

    /// Install or remove the handler for repaint requests
    fn set_refresh_handler(&mut self, handler: Option<RefreshHandler>);

    /// The drawable part of this window
    fn surface(&mut self) -> &mut dyn Surface;

    /// Make the window visible
    fn show(&mut self);

    /// Check if the window is visible
    fn is_visible(&self) -> bool;

    /// Check if the window is currently minimized (iconified)
    fn is_iconified(&self) -> bool;

    /// Check if the window currently has input focus
    fn is_focused(&self) -> bool;

    /// Check if the window is maximized
    fn is_maximized(&self) -> bool;

    /// Maximize the window
    fn maximize(&mut self);

    /// Restore the window from a maximized or minimized state
    fn restore(&mut self);

    /// Get the current window position on screen
    fn position(&self) -> (i32, i32);

    /// Set the window position on screen
    fn set_position(&mut self, x: i32, y: i32);

    /// Get the current client area size in screen coordinates
    fn size(&self) -> (u32, u32);

    /// Set the window title text
    fn set_title(&mut self, title: &str);

    /// Replace the window icon
    ///
    /// `pixels` holds `width * height` RGBA8 pixels, row-major from the top.
    fn set_icon(&mut self, pixels: &[u8], width: u32, height: u32) -> WindowResult<()>;

    /// Content scale of the monitor the window is attached to, if any
    fn window_monitor_scale(&self) -> Option<f32>;

    /// Content scale of the primary monitor, if any
    fn primary_monitor_scale(&self) -> Option<f32>;

    /// Platform handle of the window
    fn native_window(&self) -> NativeWindow;

    /// Get access to the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Validate an RGBA8 icon buffer before handing it to the window system
pub(crate) fn check_icon(pixels: &[u8], width: u32, height: u32) -> WindowResult<()> {
    use super::WindowError;

    if width == 0 || height == 0 {
        return Err(WindowError::InvalidIcon(format!(
            "icon size must be non-zero, got {}x{}",
            width, height
        )));
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(WindowError::InvalidIcon(format!(
            "expected {} bytes for a {}x{} RGBA icon, got {}",
            expected,
            width,
            height,
            pixels.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowError;

    #[test]
    fn test_icon_buffer_accepted() {
        let pixels = vec![0u8; 16 * 16 * 4];
        assert!(check_icon(&pixels, 16, 16).is_ok());
    }

    #[test]
    fn test_icon_buffer_too_short() {
        let pixels = vec![0u8; 16 * 16 * 3];
        assert!(matches!(check_icon(&pixels, 16, 16), Err(WindowError::InvalidIcon(_))));
    }

    #[test]
    fn test_icon_zero_dimension() {
        assert!(matches!(check_icon(&[], 0, 32), Err(WindowError::InvalidIcon(_))));
    }
}
