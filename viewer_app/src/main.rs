//! Viewer demo application
//!
//! Opens the backend window where it was last closed, runs the render loop
//! while a background thread schedules work onto the main thread, and saves
//! the window placement on exit.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use window_backend::foundation::logging;
use window_backend::prelude::*;

const CONFIG_PATH: &str = "viewer.toml";
const GEOMETRY_PATH: &str = "window.ron";
const ICON_PATH: &str = "icon.png";

/// How often the background worker hands a task to the main thread
const WORKER_INTERVAL: Duration = Duration::from_millis(250);

/// Background thread that keeps scheduling main-thread tasks until stopped
fn spawn_worker(
    tasks: Arc<RunQueue>,
    completed: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut tick = 0u64;
        while running.load(Ordering::Acquire) {
            tick += 1;
            let completed = Arc::clone(&completed);
            tasks.queue(move || {
                completed.fetch_add(1, Ordering::Relaxed);
                log::debug!("Background tick {} handled on main thread", tick);
            });
            thread::sleep(WORKER_INTERVAL);
        }
    })
}

fn main() {
    logging::init_with_default("info");

    let config = BackendConfig::load_or_default(CONFIG_PATH);
    let geometry = WindowGeometry::load_or_default(GEOMETRY_PATH);
    let tasks = Arc::new(RunQueue::new());

    let frames = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&frames);
    let redraw = move |frame: &mut Frame<'_>| {
        counter.set(counter.get() + 1);
        let (width, height) = frame.new_frame();
        log::trace!("Frame {} at {}x{}", counter.get(), width, height);
        frame.end_frame();
    };

    let mut backend = match Backend::new(
        &config,
        geometry,
        Box::new(NullBridge::new()),
        redraw,
        &*tasks,
    ) {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("Cannot open window: {}", e);
            std::process::exit(1);
        }
    };

    if Path::new(ICON_PATH).exists() {
        if let Err(e) = backend.load_icon(ICON_PATH) {
            log::warn!("Window icon not set: {}", e);
        }
    }
    log::info!(
        "DPI scale {:.2}, native window {:?}",
        backend.dpi_scale(),
        backend.native_window()
    );

    let completed = Arc::new(AtomicU64::new(0));
    let running = Arc::new(AtomicBool::new(true));
    let worker = spawn_worker(Arc::clone(&tasks), Arc::clone(&completed), Arc::clone(&running));

    backend.show();
    backend.run();
    let geometry = backend.shutdown();

    running.store(false, Ordering::Release);
    if worker.join().is_err() {
        log::warn!("Background worker panicked");
    }

    if let Err(e) = geometry.save_to_file(GEOMETRY_PATH) {
        log::warn!("Could not save window geometry: {}", e);
    }

    log::info!(
        "Rendered {} frames, ran {} background tasks",
        frames.get(),
        completed.load(Ordering::Relaxed)
    );
}
