//! Frame pacing for the render loop

use std::fmt;
use std::time::Duration;

use crate::window::WindowSystem;

/// Idle time per loop iteration while the window is minimized
pub const ICONIFIED_IDLE: Duration = Duration::from_millis(50);

/// Idle time after each redraw while the window lacks input focus
pub const UNFOCUSED_IDLE: Duration = Duration::from_millis(50);

/// What one loop iteration did, decided after event polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Minimized: no redraw, no task drain, idle
    Iconified,
    /// Focused: redraw and drain at full rate
    Active,
    /// Visible without focus: redraw, idle, then drain
    Unfocused,
}

impl LoopState {
    /// Classify the window's current presentation state
    pub fn of(window: &dyn WindowSystem) -> Self {
        if window.is_iconified() {
            Self::Iconified
        } else if window.is_focused() {
            Self::Active
        } else {
            Self::Unfocused
        }
    }

    /// Whether this iteration redraws and drains the task queue
    pub fn renders(self) -> bool {
        !matches!(self, Self::Iconified)
    }
}

/// Sleeps for the loop's idle periods
///
/// Defaults to [`std::thread::sleep`]; a different sleeper can be supplied to
/// observe or shorten the idle periods.
pub struct Pacer {
    sleep: Box<dyn FnMut(Duration)>,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer {
    /// Pacer that blocks the current thread
    pub fn new() -> Self {
        Self::with_sleeper(std::thread::sleep)
    }

    /// Pacer with a custom sleep function
    pub fn with_sleeper(sleep: impl FnMut(Duration) + 'static) -> Self {
        Self {
            sleep: Box::new(sleep),
        }
    }

    /// Idle for `duration`
    pub fn idle(&mut self, duration: Duration) {
        (self.sleep)(duration);
    }
}

impl fmt::Debug for Pacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_idle_periods() {
        assert_eq!(ICONIFIED_IDLE, Duration::from_millis(50));
        assert_eq!(UNFOCUSED_IDLE, Duration::from_millis(50));
    }

    #[test]
    fn test_only_iconified_skips_rendering() {
        assert!(!LoopState::Iconified.renders());
        assert!(LoopState::Active.renders());
        assert!(LoopState::Unfocused.renders());
    }

    #[test]
    fn test_custom_sleeper_receives_duration() {
        let slept = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&slept);
        let mut pacer = Pacer::with_sleeper(move |d| log.borrow_mut().push(d));

        pacer.idle(UNFOCUSED_IDLE);
        assert_eq!(*slept.borrow(), vec![UNFOCUSED_IDLE]);
    }
}
