use glfw::WindowEvent;

use super::mock::Call;
use super::Harness;
use crate::backend::{LoopState, ICONIFIED_IDLE, UNFOCUSED_IDLE};
use crate::geometry::WindowGeometry;

/// Keep only the calls that describe the loop's pacing decisions
fn loop_calls(calls: Vec<Call>) -> Vec<Call> {
    calls
        .into_iter()
        .filter(|c| matches!(c, Call::Poll | Call::Redraw | Call::Idle(_) | Call::Drain))
        .collect()
}

#[test]
fn test_focused_iteration_redraws_then_drains() {
    let harness = Harness::new();
    let (mut backend, _window) = harness.open(WindowGeometry::default());
    harness.take_calls();

    assert_eq!(backend.step(), LoopState::Active);
    assert_eq!(
        loop_calls(harness.take_calls()),
        vec![Call::Poll, Call::Redraw, Call::Drain]
    );
}

#[test]
fn test_unfocused_iteration_idles_between_redraw_and_drain() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().focused = false;
    harness.take_calls();

    assert_eq!(backend.step(), LoopState::Unfocused);
    assert_eq!(
        loop_calls(harness.take_calls()),
        vec![Call::Poll, Call::Redraw, Call::Idle(UNFOCUSED_IDLE), Call::Drain]
    );
}

#[test]
fn test_iconified_iteration_skips_redraw_and_drain() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    {
        let mut state = window.borrow_mut();
        state.iconified = true;
        state.focused = false;
    }
    harness.take_calls();

    assert_eq!(backend.step(), LoopState::Iconified);
    let calls = harness.take_calls();
    assert_eq!(loop_calls(calls.clone()), vec![Call::Poll, Call::Idle(ICONIFIED_IDLE)]);
    assert!(!calls.contains(&Call::Swap));
}

#[test]
fn test_state_is_read_after_polling() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().on_poll(|state| state.iconified = true);

    assert_eq!(backend.step(), LoopState::Iconified);
    assert_eq!(harness.count(&Call::Redraw), 0);
}

#[test]
fn test_run_returns_after_close_request() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    {
        let mut state = window.borrow_mut();
        state.on_poll(|_| {});
        state.on_poll(|_| {});
        state.on_poll(|state| state.should_close = true);
    }

    backend.run();

    // The iteration that saw the request finishes; no further one starts
    assert_eq!(window.borrow().polls, 3);
    assert_eq!(harness.count(&Call::Redraw), 3);
    assert_eq!(harness.count(&Call::Drain), 3);
}

#[test]
fn test_run_on_closed_window_does_nothing() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().should_close = true;
    harness.take_calls();

    backend.run();

    assert!(loop_calls(harness.take_calls()).is_empty());
}

#[test]
fn test_run_follows_window_state_changes() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    {
        let mut state = window.borrow_mut();
        state.on_poll(|state| state.iconified = true);
        state.on_poll(|state| {
            state.iconified = false;
            state.focused = false;
        });
        state.on_poll(|state| {
            state.focused = true;
            state.should_close = true;
        });
    }
    harness.take_calls();

    backend.run();

    assert_eq!(
        loop_calls(harness.take_calls()),
        vec![
            Call::Poll,
            Call::Idle(ICONIFIED_IDLE),
            Call::Poll,
            Call::Redraw,
            Call::Idle(UNFOCUSED_IDLE),
            Call::Drain,
            Call::Poll,
            Call::Redraw,
            Call::Drain,
        ]
    );
}

/// Loop calls plus the end of event polling, to place refresh redraws
fn polling_calls(calls: Vec<Call>) -> Vec<Call> {
    calls
        .into_iter()
        .filter(|c| {
            matches!(
                c,
                Call::Poll | Call::PollEnd | Call::Redraw | Call::Idle(_) | Call::Drain
            )
        })
        .collect()
}

#[test]
fn test_refresh_redraws_before_polling_returns() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().refresh_requests = 2;
    harness.take_calls();

    backend.step();

    let calls = harness.take_calls();
    assert_eq!(
        polling_calls(calls.clone()),
        vec![
            Call::Poll,
            Call::Redraw,
            Call::Redraw,
            Call::PollEnd,
            Call::Redraw,
            Call::Drain,
        ]
    );
    assert_eq!(calls.iter().filter(|c| **c == Call::Swap).count(), 3);
}

#[test]
fn test_refresh_redraws_while_iconified() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    {
        let mut state = window.borrow_mut();
        state.iconified = true;
        state.refresh_requests = 1;
    }
    harness.take_calls();

    assert_eq!(backend.step(), LoopState::Iconified);
    let calls = harness.take_calls();
    assert_eq!(
        polling_calls(calls.clone()),
        vec![Call::Poll, Call::Redraw, Call::PollEnd, Call::Idle(ICONIFIED_IDLE)]
    );
    assert!(calls.contains(&Call::Swap));
}

#[test]
fn test_refresh_events_are_not_redrawn_twice() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().next_events = vec![WindowEvent::Refresh];
    harness.take_calls();

    backend.step();

    // A queued refresh event only reaches the bridge; the handler repaints
    assert_eq!(
        loop_calls(harness.take_calls()),
        vec![Call::Poll, Call::Redraw, Call::Drain]
    );
}

#[test]
fn test_refresh_handler_removed_at_shutdown() {
    let harness = Harness::new();
    let (backend, _window) = harness.open(WindowGeometry::default());

    let _ = backend.shutdown();

    let calls = harness.calls();
    let removed = calls.iter().position(|c| *c == Call::SetRefresh(false));
    let shutdown = calls.iter().position(|c| *c == Call::BridgeShutdown);
    assert!(removed.is_some());
    assert!(removed < shutdown);
}

#[test]
fn test_events_pass_through_to_bridge() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().next_events = vec![WindowEvent::Focus(false), WindowEvent::Pos(40, 80)];
    harness.take_calls();

    backend.step();

    let calls = harness.take_calls();
    assert_eq!(calls.iter().filter(|c| **c == Call::BridgeEvent).count(), 2);
    let first_event = calls.iter().position(|c| *c == Call::BridgeEvent);
    let redraw = calls.iter().position(|c| *c == Call::Redraw);
    assert!(first_event < redraw);
}

#[test]
fn test_drain_never_overlaps_redraw() {
    let harness = Harness::new();
    let (mut backend, window) = harness.open(WindowGeometry::default());
    window.borrow_mut().focused = false;
    harness.take_calls();

    for _ in 0..4 {
        backend.step();
    }

    // Every frame is presented before that iteration's drain starts
    let calls = harness.take_calls();
    let mut frame_open = false;
    for call in calls {
        match call {
            Call::Redraw => frame_open = true,
            Call::Swap => frame_open = false,
            Call::Drain => assert!(!frame_open, "drain ran inside a frame"),
            _ => {}
        }
    }
}
