use crate::coords::Region;

use super::raster::RasterImage;

/// Contract between the streaming core and whatever rasterizes the scene.
///
/// Lifecycle: `start` is called lazily on the first frame and must be
/// idempotent. `produce` is only valid once `is_ready` reports true, and is
/// not called again until the next frame, so the returned image stays stable
/// for the whole mark/consume cycle.
pub trait SceneSource {
    /// Kicks off (possibly asynchronous) source initialization.
    fn start(&mut self);

    fn is_ready(&self) -> bool;

    /// Whether the scene changed since the last `produce`.
    fn has_pending_change(&self) -> bool;

    /// Re-renders the raster and reports the region that changed relative to
    /// the previous production. A dimension change implies the whole image
    /// is dirty.
    fn produce(&mut self) -> (&RasterImage, Region);

    /// The current raster, stable between `produce` calls.
    ///
    /// Slots lagging behind the producer re-upload their pending regions
    /// from this image.
    fn raster(&self) -> Option<&RasterImage>;
}
