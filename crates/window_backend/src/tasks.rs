//! Main-thread task scheduling
//!
//! Background threads hand work to the window's thread through a queue that
//! the render loop drains once per frame, after the redraw. Anything a task
//! touches is therefore never in use by the redraw callback at the same time.

use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

/// Work that must run on the main thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Queue consumed by the render loop
pub trait MainThreadTasks {
    /// Run every task that is pending now
    fn run_pending(&self);
}

/// FIFO of main-thread tasks
///
/// Shared with producer threads through an `Arc`; the thread that creates it
/// is treated as the main thread.
pub struct RunQueue {
    pending: Mutex<Vec<Task>>,
    main_thread: ThreadId,
}

impl Default for RunQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RunQueue {
    /// Create a queue owned by the calling thread
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            main_thread: thread::current().id(),
        }
    }

    /// Defer a task to the next drain
    pub fn queue(&self, task: impl FnOnce() + Send + 'static) {
        self.lock().push(Box::new(task));
    }

    /// Run a task now if called on the main thread, otherwise defer it
    pub fn run_or_queue(&self, task: impl FnOnce() + Send + 'static) {
        if self.is_main_thread() {
            task();
        } else {
            self.queue(task);
        }
    }

    /// Whether the calling thread owns this queue
    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread
    }

    /// Number of tasks waiting for the next drain
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no tasks are waiting
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Tasks run outside the lock, so a panicking task cannot poison it
    // while it is held; recover the data if it ever happens anyway.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Task>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MainThreadTasks for RunQueue {
    fn run_pending(&self) {
        debug_assert!(self.is_main_thread(), "RunQueue drained off the main thread");

        // Tasks queued while this batch runs wait for the next drain
        let batch = std::mem::take(&mut *self.lock());
        if !batch.is_empty() {
            log::trace!("Running {} main-thread tasks", batch.len());
        }
        for task in batch {
            task();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_tasks_from_other_threads_run_once_in_order() {
        let queue = Arc::new(RunQueue::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let producer = {
            let queue = Arc::clone(&queue);
            let order = Arc::clone(&order);
            thread::spawn(move || {
                for i in 0..5 {
                    let order = Arc::clone(&order);
                    queue.run_or_queue(move || order.lock().unwrap().push(i));
                }
            })
        };
        producer.join().unwrap();

        assert_eq!(queue.len(), 5);
        assert!(order.lock().unwrap().is_empty());

        queue.run_pending();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());

        queue.run_pending();
        assert_eq!(order.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_run_or_queue_on_main_thread_runs_inline() {
        let queue = RunQueue::new();
        let ran = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&ran);
        queue.run_or_queue(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_task_queued_during_drain_waits() {
        let queue = Arc::new(RunQueue::new());
        let ran = Arc::new(AtomicUsize::new(0));

        let inner_queue = Arc::clone(&queue);
        let counter = Arc::clone(&ran);
        queue.queue(move || {
            let counter = Arc::clone(&counter);
            inner_queue.queue(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        queue.run_pending();
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(queue.len(), 1);

        queue.run_pending();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
