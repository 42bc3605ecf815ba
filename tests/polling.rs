use scalewatch::geometry::Rect;
use scalewatch::observer::{Intent, ObserverState, ScalingEvent};
use scalewatch::session::SessionSnapshot;

#[path = "mock_props.rs"]
mod mock_props;
use mock_props::{win, MockProps};

fn scaling_state(props: &MockProps) -> ObserverState {
    let mut state = ObserverState::new();
    state.handle_event(ScalingEvent::SessionStarted(win(42)), props);
    state
}

fn snapshot_with_dest(right: i32) -> SessionSnapshot {
    SessionSnapshot {
        source_window: Some(win(7)),
        windowed: false,
        src_rect: Rect::new(0, 0, 100, 100),
        dest_rect: Rect::new(0, 0, right, right),
    }
}

#[test]
fn drag_arms_polling_without_intents() {
    let props = MockProps::with(win(42), snapshot_with_dest(200));
    let mut state = scaling_state(&props);

    let intents = state.handle_event(ScalingEvent::DragStarted, &props);

    assert!(state.polling_armed);
    assert!(intents.is_empty());
}

#[test]
fn poll_ticks_reread_and_redraw() {
    let mut props = MockProps::with(win(42), snapshot_with_dest(200));
    let mut state = scaling_state(&props);
    state.handle_event(ScalingEvent::DragStarted, &props);

    props.insert(win(42), snapshot_with_dest(250));
    let first = state.handle_poll_tick(&props);
    assert_eq!(first, vec![Intent::Redraw]);
    assert_eq!(state.snapshot.dest_rect.width(), 250);

    props.insert(win(42), snapshot_with_dest(300));
    let second = state.handle_poll_tick(&props);
    assert_eq!(second, vec![Intent::Redraw]);
    assert_eq!(state.snapshot.dest_rect.width(), 300);

    assert!(state.polling_armed);
}

#[test]
fn definitive_events_disarm_polling() {
    let events = [
        ScalingEvent::SessionEnded,
        ScalingEvent::SessionEndedFocusLost(win(7)),
        ScalingEvent::SessionStarted(win(42)),
        ScalingEvent::GeometryChanged,
    ];
    for event in events {
        let props = MockProps::with(win(42), snapshot_with_dest(200));
        let mut state = scaling_state(&props);
        state.handle_event(ScalingEvent::DragStarted, &props);
        assert!(state.polling_armed);

        state.handle_event(event, &props);
        assert!(!state.polling_armed, "{event:?} must disarm polling");
    }
}

#[test]
fn geometry_after_drag_emits_exactly_one_redraw() {
    let props = MockProps::with(win(42), snapshot_with_dest(200));
    let mut state = scaling_state(&props);
    state.handle_event(ScalingEvent::DragStarted, &props);
    state.handle_poll_tick(&props);
    state.handle_poll_tick(&props);

    let intents = state.handle_event(ScalingEvent::GeometryChanged, &props);

    assert!(!state.polling_armed);
    assert_eq!(intents, vec![Intent::Redraw]);

    // The timer has been disarmed; a tick still in flight does nothing.
    let stray = state.handle_poll_tick(&props);
    assert!(stray.is_empty());
}

#[test]
fn tick_while_disarmed_is_silent() {
    let props = MockProps::with(win(42), snapshot_with_dest(200));
    let mut state = scaling_state(&props);
    let reads_before = props.read_count();

    let intents = state.handle_poll_tick(&props);

    assert!(intents.is_empty());
    assert_eq!(props.read_count(), reads_before);
}

#[test]
fn drag_while_idle_never_rereads() {
    let props = MockProps::default();
    let mut state = ObserverState::new();

    state.handle_event(ScalingEvent::DragStarted, &props);
    assert!(state.polling_armed);

    let intents = state.handle_poll_tick(&props);
    assert!(intents.is_empty());
    assert_eq!(props.read_count(), 0);
    assert_eq!(state.snapshot, SessionSnapshot::default());
}

#[test]
fn snapshot_defined_iff_session_active_over_mixed_sequence() {
    let mut props = MockProps::with(win(42), snapshot_with_dest(200));
    props.insert(win(43), snapshot_with_dest(400));
    let mut state = ObserverState::new();

    let sequence = [
        ScalingEvent::GeometryChanged,
        ScalingEvent::SessionStarted(win(42)),
        ScalingEvent::DragStarted,
        ScalingEvent::SessionEndedFocusLost(win(7)),
        ScalingEvent::SessionStarted(win(42)),
        ScalingEvent::GeometryChanged,
        ScalingEvent::SessionEnded,
        ScalingEvent::DragStarted,
        ScalingEvent::SessionStarted(win(43)),
        ScalingEvent::SessionEnded,
    ];
    for event in sequence {
        state.handle_event(event, &props);
        state.handle_poll_tick(&props);
        if state.active_session.is_none() {
            assert_eq!(state.snapshot, SessionSnapshot::default());
        }
    }
    assert!(!state.polling_armed);
}
