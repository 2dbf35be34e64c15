//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer.
//! Redraws are demand-driven: the loop parks in `Wait` and only renders when
//! a frame has been requested through the presentation hooks.

mod app;
mod runtime;

pub use app::{App, AppControl, FrameCtx, WindowPresent};
pub use runtime::{Runtime, RuntimeConfig};
