//! Frame-synchronized texture streaming.
//!
//! The presentation engine may keep several frames in flight on the GPU
//! while the CPU prepares the next one; mutating a texture a previous frame
//! is still sampling is undefined behavior. Every concurrently-in-flight
//! frame therefore gets its own texture slot, and each slot accumulates the
//! dirty regions it has not yet absorbed. The cost is N-fold storage and
//! redundant partial copies, bounded by a small constant slot count.
//!
//! Components:
//! - [`DirtyTracker`] — pending dirty region per slot
//! - [`TextureSlotPool`] — N texture+view pairs plus the staging memory
//! - [`BindingManager`] — per-slot bind groups, rebuilt only on slot rebuild
//! - [`FramePipeline`] — the fixed textured-quad draw pipeline
//! - [`FrameDriver`] — per-frame orchestration entry point

mod bindings;
mod ctx;
mod dirty;
mod driver;
mod pipeline;
mod slots;
mod staging;

pub use bindings::BindingManager;
pub use ctx::{StreamCtx, StreamTarget};
pub use dirty::DirtyTracker;
pub use driver::{FrameDriver, PresentLayer};
pub use pipeline::FramePipeline;
pub use slots::{TextureSlotPool, SLOT_FORMAT};
pub use staging::StagingPool;
