use std::cell::RefCell;
use std::collections::HashMap;

use scalewatch::session::{SessionProps, SessionSnapshot, WindowRef};

/// In-memory stand-in for the properties the engine attaches to its scaling
/// window. Unknown windows read as an all-zero snapshot, matching the real
/// reader's treatment of absent properties.
#[derive(Default)]
pub struct MockProps {
    snapshots: HashMap<WindowRef, SessionSnapshot>,
    reads: RefCell<Vec<WindowRef>>,
}

impl MockProps {
    pub fn with(window: WindowRef, snapshot: SessionSnapshot) -> Self {
        let mut props = Self::default();
        props.insert(window, snapshot);
        props
    }

    pub fn insert(&mut self, window: WindowRef, snapshot: SessionSnapshot) {
        self.snapshots.insert(window, snapshot);
    }

    pub fn read_count(&self) -> usize {
        self.reads.borrow().len()
    }
}

impl SessionProps for MockProps {
    fn read(&self, scaling: WindowRef) -> SessionSnapshot {
        self.reads.borrow_mut().push(scaling);
        self.snapshots.get(&scaling).copied().unwrap_or_default()
    }
}

/// Fabricate a window handle for tests.
pub fn win(raw: isize) -> WindowRef {
    WindowRef::new(raw).expect("non-null test handle")
}
