use crate::coords::{RasterSize, Region};
use crate::source::{RasterImage, BYTES_PER_PIXEL};

/// Rounds `v` up to the next multiple of `align` (a power of two).
#[inline]
pub(crate) fn align_up(v: usize, align: usize) -> usize {
    (v + align - 1) & !(align - 1)
}

/// Single host-visible staging allocation backing all texture slots.
///
/// The buffer is sliced into N equal regions; slot `i` occupies offset
/// `i * per_slot_size`. Rows are stored at `row_pitch`, the tightly packed
/// row width rounded up to the GPU copy alignment — consumers must never
/// assume tight packing. Partial writes copy only the affected span of each
/// affected row, so a slot's slice always mirrors what its texture holds
/// after the corresponding upload.
#[derive(Debug)]
pub struct StagingPool {
    bytes: Vec<u8>,
    slot_count: usize,
    size: RasterSize,
    row_pitch: usize,
    per_slot_size: usize,
}

impl StagingPool {
    pub fn new(slot_count: usize, size: RasterSize) -> Self {
        let row_pitch = align_up(
            size.width as usize * BYTES_PER_PIXEL,
            wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize,
        );
        let per_slot_size = row_pitch * size.height as usize;

        Self {
            bytes: vec![0; per_slot_size * slot_count],
            slot_count,
            size,
            row_pitch,
            per_slot_size,
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

    /// Byte stride between consecutive rows of a slot slice.
    #[inline]
    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    #[inline]
    pub fn per_slot_size(&self) -> usize {
        self.per_slot_size
    }

    #[inline]
    pub fn slot_offset(&self, slot: usize) -> usize {
        slot * self.per_slot_size
    }

    /// The backing slice for one slot.
    pub fn slot_bytes(&self, slot: usize) -> &[u8] {
        let start = self.slot_offset(slot);
        &self.bytes[start..start + self.per_slot_size]
    }

    /// Copies the dirty rows of `region` from `image` into `slot`'s slice,
    /// honoring the row pitch. Rectangles are clipped to the pool extent.
    pub fn write_region(&mut self, slot: usize, image: &RasterImage, region: &Region) {
        debug_assert_eq!(image.size(), self.size);

        let slot_start = self.slot_offset(slot);
        for rect in region.iter() {
            let rect = rect.clamped(self.size.width, self.size.height);
            if rect.is_empty() {
                continue;
            }

            let preamble = rect.x as usize * BYTES_PER_PIXEL;
            let span = rect.w as usize * BYTES_PER_PIXEL;
            for y in rect.y..rect.bottom() {
                let src = &image.row(y)[preamble..preamble + span];
                let dst = slot_start + y as usize * self.row_pitch + preamble;
                self.bytes[dst..dst + span].copy_from_slice(src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelRect;

    fn pooled(slot_count: usize, w: u32, h: u32) -> StagingPool {
        StagingPool::new(slot_count, RasterSize::new(w, h))
    }

    /// Reads one pixel back from a slot slice, honoring the row pitch.
    fn read_pixel(pool: &StagingPool, slot: usize, x: u32, y: u32) -> [u8; 4] {
        let bytes = pool.slot_bytes(slot);
        let start = y as usize * pool.row_pitch() + x as usize * BYTES_PER_PIXEL;
        let mut px = [0; 4];
        px.copy_from_slice(&bytes[start..start + BYTES_PER_PIXEL]);
        px
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn row_pitch_is_copy_aligned_and_wide_enough() {
        let pool = pooled(2, 100, 10); // 100 * 4 = 400 → padded
        assert!(pool.row_pitch() >= 400);
        assert_eq!(
            pool.row_pitch() % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize,
            0
        );
    }

    #[test]
    fn tightly_alignable_width_needs_no_padding() {
        // 512 * 4 = 2048, already a multiple of the copy alignment.
        let pool = pooled(1, 512, 512);
        assert_eq!(pool.row_pitch(), 2048);
        assert_eq!(pool.per_slot_size(), 2048 * 512);
    }

    #[test]
    fn slots_are_contiguous_equal_slices() {
        let pool = pooled(3, 64, 64);
        assert_eq!(pool.slot_offset(0), 0);
        assert_eq!(pool.slot_offset(1), pool.per_slot_size());
        assert_eq!(pool.slot_offset(2), 2 * pool.per_slot_size());
        assert_eq!(pool.slot_bytes(2).len(), pool.per_slot_size());
    }

    // ── round trip ────────────────────────────────────────────────────────

    #[test]
    fn full_write_round_trips_through_the_pitch() {
        // Width chosen so the pitch is padded and a tight-packing bug would
        // shear the rows.
        let mut image = RasterImage::new(33, 7);
        for y in 0..7 {
            image.fill_rect(PixelRect::new(0, y, 33, 1), [y as u8, 7, 3, 255]);
        }

        let mut pool = pooled(2, 33, 7);
        pool.write_region(1, &image, &Region::full(image.size()));

        for y in 0..7 {
            for x in [0, 16, 32] {
                assert_eq!(read_pixel(&pool, 1, x, y), image.pixel(x, y));
            }
        }
    }

    #[test]
    fn partial_write_touches_only_the_rect() {
        let mut image = RasterImage::new(16, 16);
        image.fill(ic(1));
        let mut pool = pooled(1, 16, 16);
        pool.write_region(0, &image, &Region::from_rect(PixelRect::new(4, 4, 4, 4)));

        assert_eq!(read_pixel(&pool, 0, 5, 5), ic(1));
        // Outside the rect the staging memory is untouched.
        assert_eq!(read_pixel(&pool, 0, 0, 0), [0, 0, 0, 0]);
        assert_eq!(read_pixel(&pool, 0, 9, 5), [0, 0, 0, 0]);
    }

    // ── slot isolation ────────────────────────────────────────────────────

    #[test]
    fn writing_one_slot_never_touches_another() {
        let mut image = RasterImage::new(40, 40);
        image.fill(ic(9));

        let mut pool = pooled(3, 40, 40);
        pool.write_region(1, &image, &Region::full(image.size()));

        assert_eq!(read_pixel(&pool, 1, 39, 39), ic(9));
        for slot in [0, 2] {
            assert!(pool.slot_bytes(slot).iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn out_of_bounds_rect_is_clipped() {
        let mut image = RasterImage::new(8, 8);
        image.fill(ic(5));

        let mut pool = pooled(1, 8, 8);
        pool.write_region(0, &image, &Region::from_rect(PixelRect::new(6, 6, 50, 50)));

        assert_eq!(read_pixel(&pool, 0, 7, 7), ic(5));
        assert_eq!(read_pixel(&pool, 0, 0, 0), [0, 0, 0, 0]);
    }

    fn ic(v: u8) -> [u8; 4] {
        [v, v.wrapping_mul(2), v.wrapping_mul(3), 255]
    }
}
