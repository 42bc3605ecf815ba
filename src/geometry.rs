/// Axis-aligned rectangle in screen coordinates, matching the layout the
/// scaling engine publishes through its window properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Display scale factor derived from the source and destination rectangles,
/// truncated to three decimal digits.
///
/// The engine's property writes are not atomic with respect to our reads, so
/// a zero-width source rectangle is a state we have to expect. It yields
/// `None` rather than a division by zero.
pub fn scale_factor(src: &Rect, dest: &Rect) -> Option<f64> {
    if src.width() <= 0 {
        return None;
    }
    let factor = dest.width() as f64 / src.width() as f64;
    Some((factor * 1000.0).trunc() / 1000.0)
}
