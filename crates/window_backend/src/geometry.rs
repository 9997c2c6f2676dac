//! Persisted window placement
//!
//! The backend reads a [`WindowGeometry`] when the window is created and
//! captures a new one from the live window at shutdown. Where it is stored
//! is up to the application; any [`Config`] file format works.

use serde::{Serialize, Deserialize};

use crate::config::Config;

/// Window rectangle and maximize state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    /// Left edge in screen coordinates
    pub x: i32,
    /// Top edge in screen coordinates
    pub y: i32,
    /// Client area width, never zero
    pub width: u32,
    /// Client area height, never zero
    pub height: u32,
    /// Whether the window was maximized
    pub maximized: bool,
}

impl WindowGeometry {
    /// Create a non-maximized geometry
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            maximized: false,
        }
    }

    /// Set the maximize flag
    pub fn with_maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }

    /// Position as `(x, y)`
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Size as `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Check that the rectangle can be used to create a window
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }

    /// Return this geometry, or the default one if it is unusable
    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(reason) => {
                log::warn!("Ignoring stored window geometry: {}", reason);
                Self::default()
            }
        }
    }
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::new(200, 200, 1650, 960)
    }
}

impl Config for WindowGeometry {}
