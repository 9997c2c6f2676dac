//! Backend tests against recording mocks
//!
//! The mocks share one call log so tests can assert on the exact order in
//! which the loop talks to the window, the GUI bridge and the task queue.


mod run_loop;

use crate::backend::{Backend, BackendResult, Frame};
use crate::config::BackendConfig;
use crate::geometry::WindowGeometry;
use mock::{call_log, recording_pacer, Call, CallLog, MockBridge, MockTasks, MockWindow, SharedWindow};

/// Redraw callback that records itself and runs a full frame
fn standard_redraw(log: CallLog) -> impl FnMut(&mut Frame<'_>) {
    move |frame: &mut Frame<'_>| {
        log.borrow_mut().push(Call::Redraw);
        frame.new_frame();
        frame.end_frame();
    }
}

struct Harness {
    log: CallLog,
    tasks: MockTasks,
    config: BackendConfig,
}

impl Harness {
    fn new() -> Self {
        let log = call_log();
        Self {
            tasks: MockTasks::new(log.clone()),
            log,
            config: BackendConfig::default(),
        }
    }

    fn open(&self, geometry: WindowGeometry) -> (Backend<'_>, SharedWindow) {
        let bridge = MockBridge::new(self.log.clone());
        let (backend, window) = self.open_with(geometry, bridge, standard_redraw(self.log.clone()));
        (backend.expect("mock backend failed to open"), window)
    }

    fn open_with<'h>(
        &'h self,
        geometry: WindowGeometry,
        bridge: MockBridge,
        redraw: impl FnMut(&mut Frame<'_>) + 'static,
    ) -> (BackendResult<Backend<'h>>, SharedWindow) {
        let (window, state) = MockWindow::new(geometry.sanitized(), self.log.clone());
        let backend = Backend::with_window(
            Box::new(window),
            &self.config,
            geometry,
            Box::new(bridge),
            redraw,
            &self.tasks,
        )
        .map(|backend| backend.with_pacer(recording_pacer(self.log.clone())));
        (backend, state)
    }

    fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn count(&self, call: &Call) -> usize {
        self.log.borrow().iter().filter(|c| *c == call).count()
    }
}
