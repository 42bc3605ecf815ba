use crate::geometry::scale_factor;
use crate::observer::ObserverState;

/// Status text shown in the observer window.
///
/// `source_title` is the title of the window being scaled, looked up by the
/// host; the core never touches native handles. When the source rectangle
/// has no usable width the factor line degrades to `n/a` instead of failing.
pub fn status_text(state: &ObserverState, source_title: &str) -> String {
    if !state.is_scaling() {
        return "Not scaling".to_string();
    }

    let snapshot = &state.snapshot;
    let mode = if snapshot.windowed {
        "Windowed"
    } else {
        "Fullscreen"
    };
    let factor = match scale_factor(&snapshot.src_rect, &snapshot.dest_rect) {
        Some(factor) => format!("{factor:.3}"),
        None => "n/a".to_string(),
    };

    format!("{mode} scaling\n\nSource window: {source_title}\nScale factor: {factor}")
}
