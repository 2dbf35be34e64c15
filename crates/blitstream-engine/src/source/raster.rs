use crate::coords::{PixelRect, RasterSize};

/// Bytes per raster pixel (BGRA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// CPU raster image in premultiplied BGRA8, tightly packed rows.
///
/// Produced and owned by a scene source; the streaming core treats it as
/// read-only. `revision` is an identity token bumped on every production so
/// consumers can notice that the buffer behind a stable reference changed.
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
    revision: u64,
}

impl RasterImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            revision: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> RasterSize {
        RasterSize::new(self.width, self.height)
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// One tightly packed scanline.
    pub fn row(&self, y: u32) -> &[u8] {
        let pitch = self.width as usize * BYTES_PER_PIXEL;
        let start = y as usize * pitch;
        &self.bytes[start..start + pitch]
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut px = [0; 4];
        px.copy_from_slice(&self.bytes[start..start + BYTES_PER_PIXEL]);
        px
    }

    pub fn fill(&mut self, pixel: [u8; 4]) {
        for chunk in self.bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&pixel);
        }
    }

    /// Fills a rectangle, clipped to the image extent.
    pub fn fill_rect(&mut self, rect: PixelRect, pixel: [u8; 4]) {
        let rect = rect.clamped(self.width, self.height);
        if rect.is_empty() {
            return;
        }

        let pitch = self.width as usize * BYTES_PER_PIXEL;
        for y in rect.y..rect.bottom() {
            let start = y as usize * pitch + rect.x as usize * BYTES_PER_PIXEL;
            let row = &mut self.bytes[start..start + rect.w as usize * BYTES_PER_PIXEL];
            for chunk in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                chunk.copy_from_slice(&pixel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_is_clipped() {
        let mut img = RasterImage::new(8, 8);
        img.fill_rect(PixelRect::new(6, 6, 10, 10), [1, 2, 3, 4]);

        assert_eq!(img.pixel(7, 7), [1, 2, 3, 4]);
        assert_eq!(img.pixel(5, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn row_is_tightly_packed() {
        let mut img = RasterImage::new(4, 2);
        img.fill_rect(PixelRect::new(0, 1, 4, 1), [9, 9, 9, 9]);

        assert_eq!(img.row(0), &[0u8; 16][..]);
        assert_eq!(img.row(1), &[9u8; 16][..]);
    }

    #[test]
    fn revision_bumps() {
        let mut img = RasterImage::new(2, 2);
        let before = img.revision();
        img.bump_revision();
        assert_ne!(img.revision(), before);
    }
}
