//! Scene-source side of the pipeline.
//!
//! A [`SceneSource`] rasterizes on the CPU and reports what changed; the
//! streaming core only ever reads the produced [`RasterImage`]. How a source
//! becomes ready (polling, callback, future) is its own business — the core
//! relies solely on `is_ready`/`has_pending_change` being honest.

mod animated;
mod raster;
mod scene;

pub use animated::BouncingBoxSource;
pub use raster::{RasterImage, BYTES_PER_PIXEL};
pub use scene::SceneSource;
