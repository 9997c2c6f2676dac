//! Per-frame protocol between the redraw callback and the GUI bridge

use crate::bridge::{ClearColor, GuiBridge};
use crate::window::Surface;

/// Frame bookkeeping kept by the backend between `new_frame` and `end_frame`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FrameState {
    pub width: u32,
    pub height: u32,
    pub open: bool,
}

/// Handle passed to the redraw callback for one frame
///
/// Call [`new_frame`](Self::new_frame) before issuing GUI draw calls and
/// [`end_frame`](Self::end_frame) exactly once afterwards.
pub struct Frame<'f> {
    surface: &'f mut dyn Surface,
    bridge: &'f mut dyn GuiBridge,
    state: &'f mut FrameState,
    clear_color: ClearColor,
}

impl<'f> Frame<'f> {
    pub(crate) fn new(
        surface: &'f mut dyn Surface,
        bridge: &'f mut dyn GuiBridge,
        state: &'f mut FrameState,
        clear_color: ClearColor,
    ) -> Self {
        Self {
            surface,
            bridge,
            state,
            clear_color,
        }
    }

    /// Start a frame and return the framebuffer size in pixels
    pub fn new_frame(&mut self) -> (u32, u32) {
        let (width, height) = self.surface.framebuffer_size();
        *self.state = FrameState {
            width,
            height,
            open: true,
        };

        self.bridge.new_frame(&*self.surface, (width, height));
        (width, height)
    }

    /// Render the GUI draw data and present the frame
    pub fn end_frame(&mut self) {
        if !self.state.open {
            log::warn!("end_frame called without new_frame, nothing presented");
            return;
        }
        self.state.open = false;

        self.bridge.finalize();
        self.bridge.set_viewport(0, 0, self.state.width, self.state.height);
        self.bridge.clear(self.clear_color);
        self.bridge.render_draw_data();

        // Platform windows render with their own contexts. Only this
        // window's context can be put back; see update_platform_windows
        if self.bridge.viewports_enabled() {
            let was_current = self.surface.is_context_current();
            self.bridge.update_platform_windows();
            if was_current {
                self.surface.make_context_current();
            }
        }

        self.surface.swap_buffers();
    }

    /// Framebuffer size stored by the last `new_frame`
    pub fn size(&self) -> (u32, u32) {
        (self.state.width, self.state.height)
    }

    /// Address of a GL function, null if unavailable
    pub fn proc_address(&mut self, name: &str) -> *const std::ffi::c_void {
        self.surface.proc_address(name)
    }

    /// The GUI bridge, for issuing draw calls to the GUI library
    pub fn bridge(&mut self) -> &mut dyn GuiBridge {
        &mut *self.bridge
    }

    /// The GUI bridge downcast to its concrete type
    pub fn bridge_as<T: 'static>(&mut self) -> Option<&mut T> {
        self.bridge.as_any_mut().downcast_mut::<T>()
    }
}
