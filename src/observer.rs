use crate::session::{SessionProps, SessionSnapshot, WindowRef};

/// Lifecycle notification broadcast by the scaling engine.
///
/// The wire protocol is a pair of integers: a small event code and an
/// optional window handle. Codes 0 and 1 each carry two meanings (session
/// end vs. focus lost, session start vs. focus regained); the state machine
/// disambiguates them against its current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingEvent {
    /// Scaling stopped entirely (code 0, null payload).
    SessionEnded,
    /// The source window lost foreground focus but scaling continues
    /// (code 0, payload = source window).
    SessionEndedFocusLost(WindowRef),
    /// Scaling started, or the source window regained foreground focus
    /// (code 1, payload = the engine's scaling window).
    SessionStarted(WindowRef),
    /// Position, size or mode of the scaled output changed (code 2).
    GeometryChanged,
    /// The user began interactively moving or resizing the scaled window;
    /// no further discrete events arrive until the drag ends (code 3).
    DragStarted,
}

impl ScalingEvent {
    /// Decode the wire pair. Returns `None` for codes we do not understand
    /// and for a start notification without a window, both of which are
    /// ignored without a transition.
    pub fn decode(code: usize, window: Option<WindowRef>) -> Option<Self> {
        match (code, window) {
            (0, None) => Some(Self::SessionEnded),
            (0, Some(source)) => Some(Self::SessionEndedFocusLost(source)),
            (1, Some(scaling)) => Some(Self::SessionStarted(scaling)),
            (1, None) => None,
            (2, _) => Some(Self::GeometryChanged),
            (3, _) => Some(Self::DragStarted),
            _ => None,
        }
    }
}

/// Z-order the host should apply to the observer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restacking {
    Topmost,
    Normal,
}

/// Side effect requested from the host. Advisory and idempotent; order
/// between a `Restack` and a `Redraw` does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Restack(Restacking),
    Redraw,
}

/// The observer's belief about the current scaling session.
///
/// Owned explicitly and mutated only through [`handle_event`] and
/// [`handle_poll_tick`], so multiple independent instances behave
/// deterministically under test.
///
/// [`handle_event`]: ObserverState::handle_event
/// [`handle_poll_tick`]: ObserverState::handle_poll_tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserverState {
    /// The engine's scaling window while a session is active.
    pub active_session: Option<WindowRef>,
    /// Mirrored session state; holds its default value whenever
    /// `active_session` is `None`.
    pub snapshot: SessionSnapshot,
    /// True while the drag-fallback poll timer should be running.
    pub polling_armed: bool,
}

impl ObserverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scaling(&self) -> bool {
        self.active_session.is_some()
    }

    /// Adopt a session discovered at startup. No intents: the host decides
    /// the initial z-order itself, before the window is shown.
    pub fn attach_initial(&mut self, scaling: Option<WindowRef>, props: &impl SessionProps) {
        if let Some(scaling) = scaling {
            tracing::debug!(window = scaling.raw(), "adopting session found at startup");
            self.active_session = Some(scaling);
            self.snapshot = props.read(scaling);
        }
    }

    /// Apply one lifecycle notification and return the side effects the host
    /// should carry out.
    ///
    /// Every definitive event disarms the drag-poll flag, so a timer armed by
    /// `DragStarted` can never outlive the gesture it was armed for.
    pub fn handle_event(&mut self, event: ScalingEvent, props: &impl SessionProps) -> Vec<Intent> {
        tracing::debug!(?event, scaling = self.is_scaling(), "scaling notification");
        match event {
            ScalingEvent::SessionEnded => {
                self.polling_armed = false;
                self.active_session = None;
                self.snapshot = SessionSnapshot::default();
                vec![Intent::Restack(Restacking::Normal), Intent::Redraw]
            }
            ScalingEvent::SessionEndedFocusLost(_) => {
                // Still scaling, just not foreground. Session and snapshot
                // are retained; only the topmost status is released.
                self.polling_armed = false;
                vec![Intent::Restack(Restacking::Normal)]
            }
            ScalingEvent::SessionStarted(scaling) => {
                self.polling_armed = false;
                if self.active_session.is_none() {
                    self.active_session = Some(scaling);
                    self.snapshot = props.read(scaling);
                    vec![Intent::Restack(Restacking::Topmost), Intent::Redraw]
                } else {
                    // Refocus of the session we already track. The snapshot
                    // is deliberately not re-read; a geometry notification
                    // follows whenever anything actually changed.
                    vec![Intent::Restack(Restacking::Topmost)]
                }
            }
            ScalingEvent::GeometryChanged => {
                self.polling_armed = false;
                match self.active_session {
                    Some(scaling) => {
                        self.snapshot = props.read(scaling);
                        vec![Intent::Redraw]
                    }
                    None => Vec::new(),
                }
            }
            ScalingEvent::DragStarted => {
                self.polling_armed = true;
                Vec::new()
            }
        }
    }

    /// One tick of the drag-fallback timer. Re-reads the snapshot and asks
    /// for a repaint; a stray tick after disarming is ignored.
    pub fn handle_poll_tick(&mut self, props: &impl SessionProps) -> Vec<Intent> {
        if !self.polling_armed {
            return Vec::new();
        }
        match self.active_session {
            Some(scaling) => {
                self.snapshot = props.read(scaling);
                vec![Intent::Redraw]
            }
            None => Vec::new(),
        }
    }
}
