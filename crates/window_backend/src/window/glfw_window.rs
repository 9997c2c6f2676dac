//! Window management using GLFW
//!
//! Provides the OpenGL window the backend renders into.

use std::sync::atomic::{AtomicBool, Ordering};

use glfw::Context;
use raw_window_handle::HasRawWindowHandle;

use crate::config::BackendConfig;
use crate::geometry::WindowGeometry;
use super::backend::{check_icon, RefreshHandler, Surface, WindowSystem};
use super::native::NativeWindow;
use super::{WindowError, WindowResult};

static GLFW_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide GLFW library
///
/// GLFW keeps global state and must be initialized and terminated from one
/// place, so at most one [`GlfwWindow`] may exist per process. The guard is
/// held by the window and released when it drops.
#[derive(Debug)]
pub struct InstanceGuard {
    _private: (),
}

impl InstanceGuard {
    /// Claim GLFW for this process
    pub fn acquire() -> WindowResult<Self> {
        GLFW_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { _private: () })
            .map_err(|_| WindowError::AlreadyActive)
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        GLFW_ACTIVE.store(false, Ordering::Release);
    }
}

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {:?}: {}", error, description);
}

/// Pack RGBA8 bytes into the per-pixel words GLFW expects
///
/// GLFW reads the words back as bytes, so native order keeps RGBA intact.
fn pack_icon_pixels(pixels: &[u8]) -> Vec<u32> {
    pixels
        .chunks_exact(4)
        .map(|px| u32::from_ne_bytes([px[0], px[1], px[2], px[3]]))
        .collect()
}

/// GLFW window wrapper with proper resource management
///
/// Field order matters: the window is destroyed before GLFW terminates.
pub struct GlfwWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
    native: NativeWindow,
    _guard: InstanceGuard,
}

impl GlfwWindow {
    /// Open a hidden window with a current OpenGL context
    ///
    /// The window is created with the geometry's size; position and maximize
    /// state are applied by the backend afterwards.
    pub fn open(config: &BackendConfig, geometry: &WindowGeometry) -> WindowResult<Self> {
        config.validate().map_err(WindowError::InitializationFailed)?;
        let guard = InstanceGuard::acquire()?;

        let mut glfw = glfw::init(log_glfw_error)
            .map_err(|e| WindowError::InitializationFailed(format!("{:?}", e)))?;

        // Wayland has no hidden windows; drop the alpha channel instead so the
        // compositor does not blend the window with what is behind it
        #[cfg(feature = "wayland")]
        glfw.window_hint(glfw::WindowHint::AlphaBits(Some(0)));
        #[cfg(not(feature = "wayland"))]
        glfw.window_hint(glfw::WindowHint::Visible(false));

        let (major, minor) = config.context_version;
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        #[cfg(target_os = "macos")]
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));

        let (mut window, events) = glfw
            .create_window(
                geometry.width,
                geometry.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::CreationFailed)?;

        window.make_current();
        if config.vsync {
            glfw.set_swap_interval(glfw::SwapInterval::Sync(1));
        }

        // Input goes to the GUI bridge. Refresh requests are not queued: the
        // refresh handler answers them from inside poll_events
        window.set_all_polling(true);
        window.set_refresh_polling(false);

        let native = NativeWindow::from(window.raw_window_handle());
        log::info!(
            "Created {}x{} window \"{}\" (OpenGL {}.{} core)",
            geometry.width,
            geometry.height,
            config.title,
            major,
            minor
        );

        Ok(Self {
            window,
            events,
            glfw,
            native,
            _guard: guard,
        })
    }

    /// Underlying GLFW window
    ///
    /// Bridge integration API: GUI platform layers that talk to GLFW
    /// directly reach it through [`WindowSystem::as_any`] and this accessor.
    pub fn glfw_window(&self) -> &glfw::Window {
        &self.window
    }

    /// Mutable access to the underlying GLFW window
    ///
    /// Bridge integration API, see [`glfw_window`](Self::glfw_window).
    pub fn glfw_window_mut(&mut self) -> &mut glfw::Window {
        &mut self.window
    }
}

impl Surface for glfw::Window {
    fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn is_context_current(&self) -> bool {
        self.is_current()
    }

    fn make_context_current(&mut self) {
        self.make_current();
    }

    fn swap_buffers(&mut self) {
        Context::swap_buffers(self);
    }

    fn proc_address(&mut self, name: &str) -> *const std::ffi::c_void {
        self.get_proc_address(name) as *const std::ffi::c_void
    }
}

impl Surface for GlfwWindow {
    fn framebuffer_size(&self) -> (u32, u32) {
        Surface::framebuffer_size(&*self.window)
    }

    fn is_context_current(&self) -> bool {
        Surface::is_context_current(&*self.window)
    }

    fn make_context_current(&mut self) {
        Surface::make_context_current(&mut *self.window);
    }

    fn swap_buffers(&mut self) {
        Surface::swap_buffers(&mut *self.window);
    }

    fn proc_address(&mut self, name: &str) -> *const std::ffi::c_void {
        Surface::proc_address(&mut *self.window, name)
    }
}

impl WindowSystem for GlfwWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn poll_events(&mut self) -> Vec<glfw::WindowEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .map(|(_, event)| event)
            .collect()
    }

    fn set_refresh_handler(&mut self, handler: Option<RefreshHandler>) {
        match handler {
            Some(mut handler) => self
                .window
                .set_refresh_callback(move |window| handler(window)),
            None => self.window.unset_refresh_callback(),
        }
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.window
    }

    fn show(&mut self) {
        self.window.show();
    }

    fn is_visible(&self) -> bool {
        self.window.is_visible()
    }

    fn is_iconified(&self) -> bool {
        self.window.is_iconified()
    }

    fn is_focused(&self) -> bool {
        self.window.is_focused()
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn maximize(&mut self) {
        self.window.maximize();
    }

    fn restore(&mut self) {
        self.window.restore();
    }

    fn position(&self) -> (i32, i32) {
        self.window.get_pos()
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.window.set_pos(x, y);
    }

    fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_icon(&mut self, pixels: &[u8], width: u32, height: u32) -> WindowResult<()> {
        check_icon(pixels, width, height)?;

        self.window.set_icon_from_pixels(vec![glfw::PixelImage {
            width,
            height,
            pixels: pack_icon_pixels(pixels),
        }]);
        Ok(())
    }

    fn window_monitor_scale(&self) -> Option<f32> {
        self.window.with_window_mode(|mode| match mode {
            glfw::WindowMode::FullScreen(monitor) => Some(monitor.get_content_scale().0),
            glfw::WindowMode::Windowed => None,
        })
    }

    fn primary_monitor_scale(&self) -> Option<f32> {
        let mut glfw = self.glfw.clone();
        glfw.with_primary_monitor(|_, monitor| monitor.map(|m| m.get_content_scale().0))
    }

    fn native_window(&self) -> NativeWindow {
        self.native
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
