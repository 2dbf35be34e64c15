use crate::coords::Mat4;
use crate::source::SceneSource;

use super::bindings::BindingManager;
use super::ctx::{StreamCtx, StreamTarget};
use super::dirty::DirtyTracker;
use super::pipeline::FramePipeline;
use super::slots::TextureSlotPool;

const QUAD_FOV_Y_DEG: f32 = 45.0;
const QUAD_Z_NEAR: f32 = 0.01;
const QUAD_Z_FAR: f32 = 100.0;
const QUAD_DISTANCE: f32 = 4.0;

/// What the driver needs from the presentation side each frame.
///
/// The windowing layer implements this; keeping it a trait lets the frame
/// logic stay ignorant of surfaces and event loops.
pub trait PresentLayer {
    /// Index of the frame slot the current frame renders into.
    fn slot_index(&self) -> usize;

    /// Physical size of the presentation target, in pixels.
    fn target_size(&self) -> (u32, u32);

    /// Blocks until the device has finished all in-flight work.
    fn device_wait_idle(&self);

    /// Asks for another frame to be scheduled.
    fn request_frame(&self);
}

/// Per-frame orchestration: pull from the source, keep the slot pool and
/// bindings in sync, upload the current slot's dirty region, draw.
pub struct FrameDriver<S: SceneSource> {
    source: S,
    started: bool,
    pipeline: FramePipeline,
    pool: TextureSlotPool,
    tracker: DirtyTracker,
    bindings: BindingManager,
    clear_phase: f32,
}

impl<S: SceneSource> FrameDriver<S> {
    pub fn new(ctx: &StreamCtx<'_>, slot_count: usize, source: S) -> Self {
        let bindings = BindingManager::new(ctx.device, slot_count);
        let pipeline = FramePipeline::new(ctx.device, ctx.target_format, bindings.layout());

        Self {
            source,
            started: false,
            pipeline,
            pool: TextureSlotPool::new(slot_count),
            tracker: DirtyTracker::new(slot_count),
            bindings,
            clear_phase: 0.0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one frame against the slot `present` names.
    ///
    /// Failures along the way degrade rather than abort: a failed pool
    /// rebuild skips the draw and schedules a retry, a failed upload draws
    /// the slot's previous (valid, stale) contents.
    pub fn on_frame(
        &mut self,
        ctx: &StreamCtx<'_>,
        target: &mut StreamTarget<'_>,
        present: &dyn PresentLayer,
    ) {
        let slot = present.slot_index();
        debug_assert!(slot < self.pool.slot_count());

        if !self.started {
            self.source.start();
            self.started = true;
        }

        if self.source.is_ready() && self.source.has_pending_change() {
            let (image, changed) = self.source.produce();
            let size = image.size();
            self.tracker.mark_changed(&changed);

            if self.pool.size() != size || !self.pool.is_allocated() {
                // Old slots may still be sampled by in-flight frames; drain
                // before the pool tears them down.
                present.device_wait_idle();
                match self.pool.ensure_size(ctx.device, size) {
                    Ok(true) => {
                        self.tracker.mark_all_full(size);
                        self.bindings.invalidate_all();
                    }
                    Ok(false) => {}
                    Err(err) => {
                        log::warn!("slot pool rebuild failed, skipping frame: {err:#}");
                        self.pipeline.clear(target, wgpu::Color::BLACK);
                        present.request_frame();
                        return;
                    }
                }
            }
        }

        // Nothing to sample until the source has produced at least once. The
        // frame is still presented, so clear it rather than show whatever
        // the acquired surface texture happened to contain.
        let Some(view) = self.pool.view(slot) else {
            self.pipeline.clear(target, wgpu::Color::BLACK);
            present.request_frame();
            return;
        };
        self.bindings.refresh(ctx.device, slot, view);

        let region = self.tracker.consume(slot);
        if !region.is_empty() {
            match self.source.raster() {
                Some(image) => {
                    if let Err(err) = self.pool.upload(ctx.queue, slot, image, &region) {
                        log::warn!("slot {slot} upload failed, drawing stale pixels: {err:#}");
                    }
                }
                None => log::warn!("slot {slot} is dirty but the source has no raster"),
            }
        }

        let (width, height) = present.target_size();
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let mvp = Mat4::perspective(QUAD_FOV_Y_DEG, aspect, QUAD_Z_NEAR, QUAD_Z_FAR)
            * Mat4::translation(0.0, 0.0, -QUAD_DISTANCE);
        self.bindings.write_transform(ctx.queue, &mvp);

        self.clear_phase += 0.01;
        if self.clear_phase > 1.0 {
            self.clear_phase = 0.0;
        }
        let clear = wgpu::Color {
            r: 0.0,
            g: self.clear_phase as f64,
            b: 0.0,
            a: 1.0,
        };

        match self.bindings.group(slot) {
            Some(group) => self.pipeline.draw(target, clear, group),
            // refresh() above makes this unreachable; degrade to a clear if
            // it ever regresses.
            None => log::warn!("slot {slot} has no bind group, skipping draw"),
        }

        present.request_frame();
    }
}
