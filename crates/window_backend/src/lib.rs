//! # Window Backend
//!
//! GLFW window, render loop and main-thread task scheduling for applications
//! built on an immediate-mode GUI library.
//!
//! ## Features
//!
//! - **Frame pacing**: full rate while focused, throttled while in the
//!   background, idle while minimized
//! - **Main-thread tasks**: background threads schedule work that runs
//!   between frames
//! - **Persistent placement**: window position, size and maximize state
//!   survive restarts
//! - **Pluggable GUI bridge**: the GUI library and its renderer sit behind
//!   the [`GuiBridge`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use window_backend::prelude::*;
//!
//! fn main() {
//!     window_backend::foundation::logging::init_with_default("info");
//!
//!     let config = BackendConfig::load_or_default("viewer.toml");
//!     let geometry = WindowGeometry::load_or_default("window.ron");
//!     let tasks = RunQueue::new();
//!
//!     let redraw = |frame: &mut Frame<'_>| {
//!         frame.new_frame();
//!         // GUI draw calls go here
//!         frame.end_frame();
//!     };
//!
//!     let mut backend = match Backend::new(&config, geometry, Box::new(NullBridge::new()), redraw, &tasks) {
//!         Ok(backend) => backend,
//!         Err(e) => {
//!             log::error!("{}", e);
//!             std::process::exit(1);
//!         }
//!     };
//!
//!     backend.show();
//!     backend.run();
//!
//!     let geometry = backend.shutdown();
//!     if let Err(e) = geometry.save_to_file("window.ron") {
//!         log::warn!("Could not save window geometry: {}", e);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod bridge;
pub mod config;
pub mod foundation;
pub mod geometry;
pub mod tasks;
pub mod window;

#[cfg(test)]
mod tests;

pub use backend::{Backend, BackendError, BackendResult, Frame, LoopState};
pub use bridge::{GuiBridge, NullBridge};
pub use geometry::WindowGeometry;
pub use tasks::{MainThreadTasks, RunQueue};

/// Common imports for backend users
pub mod prelude {
    pub use crate::{
        Backend, BackendError, BackendResult, Frame, LoopState,
        bridge::{BridgeError, ClearColor, GuiBridge, NullBridge},
        config::{BackendConfig, Config, ConfigError},
        geometry::WindowGeometry,
        tasks::{MainThreadTasks, RunQueue},
        window::{NativeWindow, Surface, WindowError, WindowSystem},
    };
}
