use crate::geometry::Rect;

/// Opaque reference to a native window. The raw value is never dereferenced
/// by the core; it only travels between the notification payload and the
/// property reader, so tests can fabricate handles freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowRef(isize);

impl WindowRef {
    /// Wrap a raw handle value. A null handle is not a window.
    pub fn new(raw: isize) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn raw(self) -> isize {
        self.0
    }
}

/// The engine's view of the current session, mirrored locally. Replaced
/// wholesale on every refresh; never patched field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Window being scaled. Absent when the engine has not published it yet.
    pub source_window: Option<WindowRef>,
    /// True when scaling is presented inside a window frame rather than
    /// fullscreen.
    pub windowed: bool,
    pub src_rect: Rect,
    pub dest_rect: Rect,
}

/// Read access to the shared properties the engine attaches to its scaling
/// window. The engine is the sole writer; we only ever read.
///
/// A read is always complete: all properties are fetched together and absent
/// values come back as zero/false. Callers are responsible for only reading
/// while they believe a session is active.
pub trait SessionProps {
    fn read(&self, scaling: WindowRef) -> SessionSnapshot;
}
