use scalewatch::geometry::Rect;
use scalewatch::observer::{Intent, ObserverState, Restacking, ScalingEvent};
use scalewatch::session::SessionSnapshot;

#[path = "mock_props.rs"]
mod mock_props;
use mock_props::{win, MockProps};

fn sample_snapshot() -> SessionSnapshot {
    SessionSnapshot {
        source_window: Some(win(7)),
        windowed: true,
        src_rect: Rect::new(0, 0, 100, 50),
        dest_rect: Rect::new(10, 10, 210, 110),
    }
}

/// A stale snapshot must never survive the end of a session.
fn assert_consistent(state: &ObserverState) {
    if state.active_session.is_none() {
        assert_eq!(state.snapshot, SessionSnapshot::default());
    }
}

#[test]
fn session_started_from_idle() {
    let scaling = win(42);
    let props = MockProps::with(scaling, sample_snapshot());
    let mut state = ObserverState::new();

    let intents = state.handle_event(ScalingEvent::SessionStarted(scaling), &props);

    assert_eq!(state.active_session, Some(scaling));
    assert_eq!(state.snapshot, sample_snapshot());
    assert!(!state.polling_armed);
    assert_eq!(
        intents,
        vec![Intent::Restack(Restacking::Topmost), Intent::Redraw]
    );
    assert_consistent(&state);
}

#[test]
fn refocus_restacks_without_rereading() {
    let scaling = win(42);
    let mut props = MockProps::with(scaling, sample_snapshot());
    let mut state = ObserverState::new();
    state.handle_event(ScalingEvent::SessionStarted(scaling), &props);
    let reads_before = props.read_count();

    // The engine has since moved the destination, but a refocus alone must
    // not pick that up.
    let mut moved = sample_snapshot();
    moved.dest_rect = Rect::new(0, 0, 400, 200);
    props.insert(scaling, moved);

    let intents = state.handle_event(ScalingEvent::SessionStarted(scaling), &props);

    assert_eq!(props.read_count(), reads_before);
    assert_eq!(state.snapshot, sample_snapshot());
    assert_eq!(intents, vec![Intent::Restack(Restacking::Topmost)]);
    assert_consistent(&state);
}

#[test]
fn session_ended_clears_everything() {
    let scaling = win(42);
    let props = MockProps::with(scaling, sample_snapshot());
    let mut state = ObserverState::new();
    state.handle_event(ScalingEvent::SessionStarted(scaling), &props);

    let intents = state.handle_event(ScalingEvent::SessionEnded, &props);

    assert_eq!(state.active_session, None);
    assert_eq!(state.snapshot, SessionSnapshot::default());
    assert!(!state.polling_armed);
    assert_eq!(
        intents,
        vec![Intent::Restack(Restacking::Normal), Intent::Redraw]
    );
    assert_consistent(&state);
}

#[test]
fn focus_lost_retains_session() {
    let scaling = win(42);
    let props = MockProps::with(scaling, sample_snapshot());
    let mut state = ObserverState::new();
    state.handle_event(ScalingEvent::SessionStarted(scaling), &props);

    let intents = state.handle_event(ScalingEvent::SessionEndedFocusLost(win(7)), &props);

    assert_eq!(state.active_session, Some(scaling));
    assert_eq!(state.snapshot, sample_snapshot());
    assert_eq!(intents, vec![Intent::Restack(Restacking::Normal)]);
    assert_consistent(&state);
}

#[test]
fn geometry_changed_rereads_snapshot() {
    let scaling = win(42);
    let mut props = MockProps::with(scaling, sample_snapshot());
    let mut state = ObserverState::new();
    state.handle_event(ScalingEvent::SessionStarted(scaling), &props);

    let mut moved = sample_snapshot();
    moved.dest_rect = Rect::new(0, 0, 400, 200);
    props.insert(scaling, moved);

    let intents = state.handle_event(ScalingEvent::GeometryChanged, &props);

    assert_eq!(state.snapshot, moved);
    assert_eq!(intents, vec![Intent::Redraw]);
    assert_consistent(&state);
}

#[test]
fn geometry_changed_while_idle_is_ignored() {
    let props = MockProps::default();
    let mut state = ObserverState::new();

    let intents = state.handle_event(ScalingEvent::GeometryChanged, &props);

    assert_eq!(state, ObserverState::new());
    assert!(intents.is_empty());
    assert_eq!(props.read_count(), 0);
}

#[test]
fn attach_initial_adopts_discovered_session() {
    let scaling = win(42);
    let props = MockProps::with(scaling, sample_snapshot());
    let mut state = ObserverState::new();

    state.attach_initial(Some(scaling), &props);

    assert_eq!(state.active_session, Some(scaling));
    assert_eq!(state.snapshot, sample_snapshot());
    assert!(!state.polling_armed);
}

#[test]
fn attach_initial_without_target_stays_idle() {
    let props = MockProps::default();
    let mut state = ObserverState::new();

    state.attach_initial(None, &props);

    assert_eq!(state, ObserverState::new());
    assert_eq!(props.read_count(), 0);
}

#[test]
fn ending_an_idle_session_is_harmless() {
    let props = MockProps::default();
    let mut state = ObserverState::new();

    let intents = state.handle_event(ScalingEvent::SessionEnded, &props);

    assert_eq!(state.active_session, None);
    assert_eq!(
        intents,
        vec![Intent::Restack(Restacking::Normal), Intent::Redraw]
    );
    assert_consistent(&state);
}
