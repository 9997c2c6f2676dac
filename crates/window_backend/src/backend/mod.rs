//! Window backend and render loop
//!
//! [`Backend`] owns the window and the GUI bridge, runs the render loop and
//! remembers where the window was when it closed.
//!
//! # Render loop
//!
//! Each iteration polls window events, then decides what to do from the
//! window's state:
//!
//! | State       | Redraw | Idle                   | Drain tasks |
//! |-------------|--------|------------------------|-------------|
//! | Iconified   | no     | [`ICONIFIED_IDLE`]     | no          |
//! | Active      | yes    | no                     | yes         |
//! | Unfocused   | yes    | [`UNFOCUSED_IDLE`]     | yes         |
//!
//! Redraw always precedes the task drain. The loop ends when the window's
//! close flag is seen at the top of an iteration.

mod frame;
mod pacing;

pub use frame::Frame;
pub use pacing::{LoopState, Pacer, ICONIFIED_IDLE, UNFOCUSED_IDLE};

use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::bridge::{BridgeError, ClearColor, GuiBridge};
use crate::config::BackendConfig;
use crate::geometry::WindowGeometry;
use crate::tasks::MainThreadTasks;
use crate::window::{
    GlfwWindow, NativeWindow, RefreshHandler, Surface, WindowError, WindowResult, WindowSystem,
};
use frame::FrameState;

/// Backend errors
///
/// Any error from construction means the application has no window and
/// cannot continue.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Window system failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// GUI bridge failure
    #[error("GUI bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Icon image could not be loaded
    #[error("Icon image error: {0}")]
    Icon(#[from] image::ImageError),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Callback that renders one frame
pub type RedrawFn = Box<dyn FnMut(&mut Frame<'_>)>;

/// Everything a redraw needs apart from the window
///
/// Shared between the render loop and the window's refresh handler, which
/// redraws from inside event polling.
struct Renderer {
    bridge: Box<dyn GuiBridge>,
    redraw: RedrawFn,
    frame: FrameState,
    clear_color: ClearColor,
}

impl Renderer {
    fn frame<'f>(&'f mut self, surface: &'f mut dyn Surface) -> Frame<'f> {
        Frame::new(surface, self.bridge.as_mut(), &mut self.frame, self.clear_color)
    }

    fn redraw(&mut self, surface: &mut dyn Surface) {
        let mut frame = Frame::new(surface, self.bridge.as_mut(), &mut self.frame, self.clear_color);
        (self.redraw)(&mut frame);

        if self.frame.open {
            log::warn!("Redraw callback returned without calling end_frame");
            self.frame.open = false;
        }
    }
}

/// Refresh handler that redraws through a renderer the backend still owns
fn refresh_handler(renderer: Weak<RefCell<Renderer>>) -> RefreshHandler {
    Box::new(move |surface: &mut dyn Surface| {
        let Some(shared) = renderer.upgrade() else {
            return;
        };
        match shared.try_borrow_mut() {
            Ok(mut renderer) => renderer.redraw(surface),
            Err(_) => log::trace!("Refresh requested during a frame, skipped"),
        };
    })
}

/// Application window, render loop and GUI bridge
///
/// The task queue is borrowed for `'a` and must outlive the backend. The
/// redraw callback is owned, since the window system may call it from
/// inside event polling. All methods must be called on the thread that
/// created the backend.
pub struct Backend<'a> {
    renderer: Rc<RefCell<Renderer>>,
    window: Box<dyn WindowSystem>,
    tasks: &'a dyn MainThreadTasks,
    geometry: WindowGeometry,
    pacer: Pacer,
    last_state: Option<LoopState>,
    torn_down: bool,
}

impl<'a> Backend<'a> {
    /// Open a GLFW window and attach the GUI bridge to it
    ///
    /// The window starts hidden; call [`show`](Self::show) once the first
    /// frame's state is ready.
    pub fn new(
        config: &BackendConfig,
        geometry: WindowGeometry,
        bridge: Box<dyn GuiBridge>,
        redraw: impl FnMut(&mut Frame<'_>) + 'static,
        tasks: &'a dyn MainThreadTasks,
    ) -> BackendResult<Self> {
        let geometry = geometry.sanitized();
        let window = GlfwWindow::open(config, &geometry)?;
        Self::with_window(Box::new(window), config, geometry, bridge, redraw, tasks)
    }

    /// Build a backend around an already created window
    ///
    /// The window must have been created with the geometry's size. Its
    /// position and maximize state are applied here, and the redraw
    /// callback is installed as its refresh handler.
    pub fn with_window(
        mut window: Box<dyn WindowSystem>,
        config: &BackendConfig,
        geometry: WindowGeometry,
        mut bridge: Box<dyn GuiBridge>,
        redraw: impl FnMut(&mut Frame<'_>) + 'static,
        tasks: &'a dyn MainThreadTasks,
    ) -> BackendResult<Self> {
        let geometry = geometry.sanitized();

        window.set_position(geometry.x, geometry.y);
        if geometry.maximized {
            window.maximize();
        }

        window.make_context_current();
        bridge.init(window.as_mut())?;

        let renderer = Rc::new(RefCell::new(Renderer {
            bridge,
            redraw: Box::new(redraw),
            frame: FrameState::default(),
            clear_color: ClearColor::from_rgb8(config.clear_color),
        }));
        window.set_refresh_handler(Some(refresh_handler(Rc::downgrade(&renderer))));

        log::info!(
            "Backend ready at ({}, {}) {}x{}{}",
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height,
            if geometry.maximized { ", maximized" } else { "" }
        );

        Ok(Self {
            renderer,
            window,
            tasks,
            geometry,
            pacer: Pacer::new(),
            last_state: None,
            torn_down: false,
        })
    }

    /// Replace the pacer used for idle periods
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Make the window visible
    pub fn show(&mut self) {
        if !self.window.is_visible() {
            self.window.show();
        }
    }

    /// Run the render loop until the window is asked to close
    pub fn run(&mut self) {
        log::info!("Entering render loop");
        while !self.window.should_close() {
            self.step();
        }
        log::info!("Close requested, leaving render loop");
    }

    /// Run one iteration of the render loop
    ///
    /// Does not check the close flag; [`run`](Self::run) does that before
    /// every iteration. Repaint requests arriving while events are polled
    /// redraw immediately, whatever the loop state.
    pub fn step(&mut self) -> LoopState {
        for event in self.window.poll_events() {
            self.renderer.borrow_mut().bridge.handle_event(&event);
        }

        let state = LoopState::of(self.window.as_ref());
        if self.last_state != Some(state) {
            log::debug!("Render loop state: {:?}", state);
            self.last_state = Some(state);
        }

        if state.renders() {
            self.redraw();
            if state == LoopState::Unfocused {
                self.pacer.idle(UNFOCUSED_IDLE);
            }
            self.tasks.run_pending();
        } else {
            self.pacer.idle(ICONIFIED_IDLE);
        }

        state
    }

    fn redraw(&mut self) {
        self.renderer.borrow_mut().redraw(self.window.surface());
    }

    /// Start a frame outside the redraw callback
    ///
    /// Same as [`Frame::new_frame`].
    pub fn new_frame(&mut self) -> (u32, u32) {
        let mut renderer = self.renderer.borrow_mut();
        let mut frame = renderer.frame(self.window.surface());
        frame.new_frame()
    }

    /// Finish a frame started with [`new_frame`](Self::new_frame)
    ///
    /// Same as [`Frame::end_frame`].
    pub fn end_frame(&mut self) {
        let mut renderer = self.renderer.borrow_mut();
        renderer.frame(self.window.surface()).end_frame();
    }

    /// Framebuffer size stored by the last `new_frame`
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let renderer = self.renderer.borrow();
        (renderer.frame.width, renderer.frame.height)
    }

    /// Replace the window icon with RGBA8 pixels
    pub fn set_icon(&mut self, pixels: &[u8], width: u32, height: u32) -> WindowResult<()> {
        self.window.set_icon(pixels, width, height)
    }

    /// Replace the window icon with an image
    pub fn set_icon_from_image(&mut self, image: &image::DynamicImage) -> WindowResult<()> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        self.set_icon(rgba.as_raw(), width, height)
    }

    /// Load an image file and use it as the window icon
    pub fn load_icon(&mut self, path: impl AsRef<Path>) -> BackendResult<()> {
        let image = image::open(path.as_ref())?;
        self.set_icon_from_image(&image)?;
        Ok(())
    }

    /// Set the window title
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Content scale of the monitor showing the window
    ///
    /// Falls back to the primary monitor, then to 1.0.
    pub fn dpi_scale(&self) -> f32 {
        self.window
            .window_monitor_scale()
            .or_else(|| self.window.primary_monitor_scale())
            .unwrap_or(1.0)
    }

    /// Platform handle of the window
    pub fn native_window(&self) -> NativeWindow {
        self.window.native_window()
    }

    /// Window geometry: as constructed until shutdown, then as captured
    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    /// The underlying window
    pub fn window(&self) -> &dyn WindowSystem {
        self.window.as_ref()
    }

    /// The GUI bridge
    pub fn bridge(&self) -> Ref<'_, dyn GuiBridge> {
        Ref::map(self.renderer.borrow(), |renderer| &*renderer.bridge)
    }

    /// Close the window and return its final geometry
    pub fn shutdown(mut self) -> WindowGeometry {
        self.teardown();
        self.geometry
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        // No repaint requests may reach the renderer once teardown starts
        self.window.set_refresh_handler(None);

        // A maximized window reports the maximized rectangle; restore first
        // so the saved rectangle is the one to return to
        let maximized = self.window.is_maximized();
        if maximized {
            self.window.restore();
        }

        let (x, y) = self.window.position();
        let (width, height) = self.window.size();
        self.geometry = WindowGeometry {
            x,
            y,
            width,
            height,
            maximized,
        };

        self.renderer.borrow_mut().bridge.shutdown();
        log::info!(
            "Window closed at ({}, {}) {}x{}{}",
            x,
            y,
            width,
            height,
            if maximized { ", maximized" } else { "" }
        );
    }
}

impl Drop for Backend<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}
