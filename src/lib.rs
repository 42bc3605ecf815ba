//! Companion status window for an external screen-scaling engine.
//!
//! The engine broadcasts a small integer-coded lifecycle protocol and
//! publishes session geometry through properties on its own window; this
//! crate mirrors that state and shows it. The state machine in [`observer`]
//! is platform independent; everything touching Win32 lives in [`win_util`]
//! and [`watcher_window`].

pub mod display;
pub mod geometry;
pub mod logging;
pub mod observer;
pub mod session;
pub mod settings;
pub mod win_util;

#[cfg(target_os = "windows")]
pub mod watcher_window;
