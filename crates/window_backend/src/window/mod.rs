//! Window management subsystem
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Backend (render loop)       │
//! └─────────────┬───────────────────┘
//!               │ drives
//!      ┌────────▼────────┐
//!      │ WindowSystem    │ ← trait (backend.rs)
//!      └────────┬────────┘
//!               │ implemented by
//!      ┌────────▼────────┐
//!      │ GlfwWindow      │ ← glfw_window.rs
//!      └─────────────────┘
//! ```
//!
//! - **`backend`**: the traits the render loop is written against
//! - **`glfw_window`**: GLFW implementation with an OpenGL context
//! - **`native`**: per-platform window handles

pub mod backend;
pub mod glfw_window;
pub mod native;

pub use backend::{RefreshHandler, Surface, WindowSystem};
pub use glfw_window::{GlfwWindow, InstanceGuard};
pub use native::NativeWindow;

use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The native window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// Another window backend already owns GLFW in this process
    #[error("A GLFW window is already active in this process")]
    AlreadyActive,

    /// Icon pixel data does not match its dimensions
    #[error("Invalid window icon: {0}")]
    InvalidIcon(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;
