//! Blitstream engine crate.
//!
//! Streams a CPU-rasterized image into GPU texture slots, one slot per
//! concurrently-in-flight frame, with per-slot dirty-region tracking and
//! minimal partial uploads. The `stream` module is the core; `device` and
//! `window` own the platform/presentation pieces that drive it.

pub mod device;
pub mod window;

pub mod logging;
pub mod coords;
pub mod source;
pub mod stream;
