use anyhow::{bail, Context, Result};

use crate::coords::{RasterSize, Region};
use crate::source::{RasterImage, BYTES_PER_PIXEL};

use super::staging::StagingPool;

/// Fixed slot texture format: 32-bit packed color, premultiplied alpha.
pub const SLOT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

struct SlotTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// N texture+view pairs, one per concurrently-in-flight frame, backed by a
/// shared staging pool.
///
/// All slots always have identical format and dimensions and are released
/// and reallocated together, never individually. The pool starts (and stays,
/// after a failed rebuild) in a defined empty state.
pub struct TextureSlotPool {
    slot_count: usize,
    slots: Vec<SlotTexture>,
    staging: Option<StagingPool>,
    size: RasterSize,
}

impl TextureSlotPool {
    pub fn new(slot_count: usize) -> Self {
        assert!(slot_count >= 1, "need at least one slot");
        Self {
            slot_count,
            slots: Vec::new(),
            staging: None,
            size: RasterSize::default(),
        }
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    #[inline]
    pub fn size(&self) -> RasterSize {
        self.size
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn view(&self, slot: usize) -> Option<&wgpu::TextureView> {
        self.slots.get(slot).map(|s| &s.view)
    }

    pub fn staging(&self) -> Option<&StagingPool> {
        self.staging.as_ref()
    }

    /// Drops all textures, views and staging memory.
    pub fn release(&mut self) {
        self.slots.clear();
        self.staging = None;
        self.size = RasterSize::default();
    }

    /// Makes every slot match `size`, reallocating all of them if needed.
    ///
    /// Returns `Ok(false)` when the pool already matches (no work done) and
    /// `Ok(true)` when it was rebuilt — the caller must then treat every
    /// slot as fully dirty and every binding as stale. On error the pool is
    /// left empty, never partially populated.
    ///
    /// The caller must have drained the device first: in-flight frames may
    /// still be sampling the old slots right up to that wait.
    pub fn ensure_size(&mut self, device: &wgpu::Device, size: RasterSize) -> Result<bool> {
        if self.is_allocated() && self.size == size {
            return Ok(false);
        }

        self.release();
        if size.is_empty() {
            bail!("refusing to allocate a zero-sized slot pool");
        }

        // wgpu reports allocation problems through error scopes rather than
        // return values; catch them here so a failed resize stays a skipped
        // frame instead of a device loss.
        let oom_scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut slots = Vec::with_capacity(self.slot_count);
        for _ in 0..self.slot_count {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("blitstream slot texture"),
                size: wgpu::Extent3d {
                    width: size.width,
                    height: size.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: SLOT_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            slots.push(SlotTexture { texture, view });
        }

        // Scopes resolve in reverse push order.
        let validation = pollster::block_on(validation_scope.pop());
        let out_of_memory = pollster::block_on(oom_scope.pop());
        if let Some(err) = out_of_memory.or(validation) {
            bail!(
                "allocating {} slot textures at {}x{} failed: {err}",
                self.slot_count,
                size.width,
                size.height
            );
        }

        let staging = StagingPool::new(self.slot_count, size);
        log::debug!(
            "allocated {} slot textures at {}x{} ({} staging bytes)",
            self.slot_count,
            size.width,
            size.height,
            staging.per_slot_size() * self.slot_count
        );

        self.slots = slots;
        self.staging = Some(staging);
        self.size = size;
        Ok(true)
    }

    /// Stages the dirty rows of `region` and uploads each disjoint
    /// rectangle into `slot`'s texture.
    ///
    /// A failure here leaves the slot with stale-but-valid pixels; the
    /// caller keeps drawing and retries on the next naturally scheduled
    /// frame.
    pub fn upload(
        &mut self,
        queue: &wgpu::Queue,
        slot: usize,
        image: &RasterImage,
        region: &Region,
    ) -> Result<()> {
        let staging = self.staging.as_mut().context("slot pool is not allocated")?;
        let target = self.slots.get(slot).context("slot index out of range")?;
        if image.size() != self.size {
            bail!(
                "raster is {}x{} but the slot pool holds {}x{}",
                image.width(),
                image.height(),
                self.size.width,
                self.size.height
            );
        }

        staging.write_region(slot, image, region);

        let row_pitch = staging.row_pitch();
        let slot_bytes = staging.slot_bytes(slot);
        for rect in region.iter() {
            let rect = rect.clamped(self.size.width, self.size.height);
            if rect.is_empty() {
                continue;
            }

            let start = rect.y as usize * row_pitch + rect.x as usize * BYTES_PER_PIXEL;
            let len = (rect.h as usize - 1) * row_pitch + rect.w as usize * BYTES_PER_PIXEL;
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &target.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: rect.x,
                        y: rect.y,
                        z: 0,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                &slot_bytes[start..start + len],
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(row_pitch as u32),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: rect.w,
                    height: rect.h,
                    depth_or_array_layers: 1,
                },
            );
        }

        Ok(())
    }
}
