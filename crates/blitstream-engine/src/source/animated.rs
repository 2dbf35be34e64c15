use crate::coords::{PixelRect, RasterSize, Region};

use super::raster::RasterImage;
use super::scene::SceneSource;

const BOX_SIZE: u32 = 64;

// Premultiplied BGRA.
const BACKGROUND: [u8; 4] = [40, 24, 16, 255];
const BOX_COLOR: [u8; 4] = [32, 128, 232, 255];

/// Reference scene source: a filled square bouncing around the raster.
///
/// Each `produce` moves the square one step and reports the union of its old
/// and new rectangles as dirty; the first production reports the whole
/// image. Useful both for the viewer and as a deterministic test source.
#[derive(Debug)]
pub struct BouncingBoxSource {
    image: RasterImage,
    size: RasterSize,
    pos: (i32, i32),
    vel: (i32, i32),
    prev_box: Option<PixelRect>,
    started: bool,
    pending: bool,
}

impl BouncingBoxSource {
    pub fn new(width: u32, height: u32) -> Self {
        let mut image = RasterImage::new(width, height);
        image.fill(BACKGROUND);

        Self {
            image,
            size: RasterSize::new(width, height),
            pos: (0, 0),
            vel: (3, 2),
            prev_box: None,
            started: false,
            pending: false,
        }
    }

    fn box_rect(&self) -> PixelRect {
        PixelRect::new(self.pos.0 as u32, self.pos.1 as u32, BOX_SIZE, BOX_SIZE)
    }

    fn advance(&mut self) {
        let max_x = self.size.width.saturating_sub(BOX_SIZE) as i32;
        let max_y = self.size.height.saturating_sub(BOX_SIZE) as i32;

        self.pos.0 += self.vel.0;
        self.pos.1 += self.vel.1;

        if self.pos.0 < 0 {
            self.pos.0 = 0;
            self.vel.0 = -self.vel.0;
        } else if self.pos.0 > max_x {
            self.pos.0 = max_x;
            self.vel.0 = -self.vel.0;
        }

        if self.pos.1 < 0 {
            self.pos.1 = 0;
            self.vel.1 = -self.vel.1;
        } else if self.pos.1 > max_y {
            self.pos.1 = max_y;
            self.vel.1 = -self.vel.1;
        }
    }
}

impl SceneSource for BouncingBoxSource {
    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.pending = true;
    }

    fn is_ready(&self) -> bool {
        self.started
    }

    fn has_pending_change(&self) -> bool {
        self.started && self.pending
    }

    fn produce(&mut self) -> (&RasterImage, Region) {
        let old_box = self.prev_box;
        self.advance();
        let new_box = self.box_rect();

        if let Some(old) = old_box {
            self.image.fill_rect(old, BACKGROUND);
        }
        self.image.fill_rect(new_box, BOX_COLOR);
        self.image.bump_revision();
        self.prev_box = Some(new_box);

        let mut dirty = Region::new();
        match old_box {
            // First production: nothing downstream has seen any of it.
            None => dirty.add(PixelRect::new(0, 0, self.size.width, self.size.height)),
            Some(old) => {
                dirty.add(old);
                dirty.add(new_box);
            }
        }

        // The square never stops moving, so another change is always due.
        self.pending = true;

        (&self.image, dirty)
    }

    fn raster(&self) -> Option<&RasterImage> {
        self.started.then_some(&self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_until_started() {
        let mut src = BouncingBoxSource::new(128, 128);
        assert!(!src.is_ready());
        assert!(!src.has_pending_change());
        assert!(src.raster().is_none());

        src.start();
        assert!(src.is_ready());
        assert!(src.has_pending_change());
        assert!(src.raster().is_some());
    }

    #[test]
    fn start_is_idempotent() {
        let mut src = BouncingBoxSource::new(128, 128);
        src.start();
        src.start();
        assert!(src.is_ready());
    }

    #[test]
    fn first_produce_reports_full_image() {
        let mut src = BouncingBoxSource::new(128, 128);
        src.start();
        let (image, dirty) = src.produce();
        assert_eq!(image.size(), RasterSize::new(128, 128));
        assert!(dirty.covers(0, 0));
        assert!(dirty.covers(127, 127));
    }

    #[test]
    fn later_produce_reports_old_and_new_boxes() {
        let mut src = BouncingBoxSource::new(256, 256);
        src.start();
        src.produce();
        let before = src.box_rect();

        let (image, dirty) = src.produce();
        let after = PixelRect::new(
            before.x + 3, // vel.0
            before.y + 2, // vel.1
            BOX_SIZE,
            BOX_SIZE,
        );

        assert!(dirty.covers(before.x, before.y));
        assert!(dirty.covers(after.right() - 1, after.bottom() - 1));
        // A far corner is untouched.
        assert!(!dirty.covers(255, 255));
        assert_eq!(image.pixel(after.x, after.y), BOX_COLOR);
    }

    #[test]
    fn box_bounces_off_edges() {
        let mut src = BouncingBoxSource::new(BOX_SIZE + 8, BOX_SIZE + 8);
        src.start();
        for _ in 0..64 {
            src.produce();
            let b = src.box_rect();
            assert!(b.right() <= BOX_SIZE + 8);
            assert!(b.bottom() <= BOX_SIZE + 8);
        }
    }
}
