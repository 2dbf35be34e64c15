//! Integer raster coordinates and the small matrix type used by the
//! streaming pipeline.
//!
//! Convention:
//! - raster space is top-left origin, +Y down, whole pixels (u32)
//! - `Region` is always a set of non-overlapping rectangles

mod matrix;
mod rect;
mod region;
mod size;

pub use matrix::Mat4;
pub use rect::PixelRect;
pub use region::Region;
pub use size::RasterSize;
