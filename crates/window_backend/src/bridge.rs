//! GUI Bridge Trait
//!
//! Defines the interface between the backend and the immediate-mode GUI
//! library plus its graphics API renderer. Keeps the window and render loop
//! independent of which GUI library draws the frame.

use glfw::WindowEvent;
use thiserror::Error;

use crate::window::{Surface, WindowSystem};

/// GUI bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The platform or renderer half of the bridge failed to start
    #[error("GUI bridge initialization failed: {0}")]
    InitializationFailed(String),
}

/// Framebuffer clear color in linear 0..1 components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl ClearColor {
    /// Opaque color from 8-bit RGB components
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: 1.0,
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::from_rgb8([114, 144, 154])
    }
}

/// Backend-agnostic GUI library and renderer interface
///
/// The backend calls these in a fixed order each frame:
/// `new_frame`, then (after the redraw callback has issued its draw calls)
/// `finalize`, `set_viewport`, `clear`, `render_draw_data`, and optionally
/// `update_platform_windows`.
pub trait GuiBridge {
    /// Attach the GUI library and renderer to a freshly created window
    ///
    /// The window's GL context is current when this is called.
    fn init(&mut self, window: &mut dyn WindowSystem) -> Result<(), BridgeError>;

    /// Forward a window event to the GUI library's platform layer
    fn handle_event(&mut self, _event: &WindowEvent) {}

    /// Begin a new GUI frame for a framebuffer of the given size
    fn new_frame(&mut self, surface: &dyn Surface, framebuffer: (u32, u32));

    /// Finalize this frame's draw data
    fn finalize(&mut self);

    /// Set the rendering viewport in framebuffer pixels
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clear the framebuffer
    fn clear(&mut self, color: ClearColor);

    /// Submit the finalized draw data to the graphics API
    fn render_draw_data(&mut self);

    /// Whether the GUI library's multi-viewport feature is enabled
    fn viewports_enabled(&self) -> bool {
        false
    }

    /// Update and render the GUI library's additional platform windows
    ///
    /// May leave a different GL context current. Afterwards the main
    /// window's context is made current again if it was current before the
    /// call. A context that belonged to some other window is not restored;
    /// bridges that need it must restore it themselves before returning.
    fn update_platform_windows(&mut self) {}

    /// Detach from the window, releasing renderer and platform resources
    fn shutdown(&mut self);

    /// Get access to the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Bridge with no GUI library attached
///
/// Lets the window lifecycle and render loop run on their own. Frames are
/// presented without any content.
#[derive(Debug, Default)]
pub struct NullBridge {
    frames: u64,
}

impl NullBridge {
    /// Create a new null bridge
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames begun so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl GuiBridge for NullBridge {
    fn init(&mut self, _window: &mut dyn WindowSystem) -> Result<(), BridgeError> {
        log::info!("No GUI library attached, frames will be empty");
        Ok(())
    }

    fn new_frame(&mut self, _surface: &dyn Surface, framebuffer: (u32, u32)) {
        self.frames += 1;
        log::trace!("Frame {} at {}x{}", self.frames, framebuffer.0, framebuffer.1);
    }

    fn finalize(&mut self) {}

    fn set_viewport(&mut self, _x: i32, _y: i32, _width: u32, _height: u32) {}

    fn clear(&mut self, _color: ClearColor) {}

    fn render_draw_data(&mut self) {}

    fn shutdown(&mut self) {
        log::debug!("Null bridge shut down after {} frames", self.frames);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
