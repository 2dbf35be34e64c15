use super::{PixelRect, RasterSize};

/// A set of non-overlapping rectangles in raster coordinates.
///
/// `Region` is the dirty-region currency of the streaming pipeline: the
/// scene source reports changes as a region, slots accumulate pending
/// regions, and uploads iterate the disjoint rectangles directly.
///
/// The empty region is the idle state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<PixelRect>,
}

impl Region {
    #[inline]
    pub fn new() -> Self {
        Self { rects: Vec::new() }
    }

    pub fn from_rect(rect: PixelRect) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }

    /// The region covering an entire image of the given size.
    pub fn full(size: RasterSize) -> Self {
        Self::from_rect(PixelRect::new(0, 0, size.width, size.height))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    #[inline]
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PixelRect> {
        self.rects.iter()
    }

    /// Returns the region and leaves this one empty.
    pub fn take(&mut self) -> Region {
        Region {
            rects: std::mem::take(&mut self.rects),
        }
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn covers(&self, x: u32, y: u32) -> bool {
        self.rects.iter().any(|r| r.contains(x, y))
    }

    /// Bounding box of the whole region, or `None` when empty.
    pub fn bounds(&self) -> Option<PixelRect> {
        self.rects
            .iter()
            .copied()
            .reduce(|a, b| a.union_bounds(b))
    }

    /// Unions a rectangle into the set, keeping the stored rectangles
    /// disjoint. Already-covered area is not duplicated.
    pub fn add(&mut self, rect: PixelRect) {
        if rect.is_empty() {
            return;
        }

        // Subtract existing coverage from the incoming rect; whatever is
        // left over is new area and can be appended as-is.
        let mut pending = vec![rect];
        for existing in &self.rects {
            let mut rest = Vec::new();
            for piece in pending {
                subtract(piece, *existing, &mut rest);
            }
            if rest.is_empty() {
                return;
            }
            pending = rest;
        }

        self.rects.append(&mut pending);
    }

    /// Unions another region into this one.
    pub fn merge(&mut self, other: &Region) {
        for rect in &other.rects {
            self.add(*rect);
        }
    }
}

/// Pushes `piece` minus `cut` onto `out` as up to four disjoint bands.
fn subtract(piece: PixelRect, cut: PixelRect, out: &mut Vec<PixelRect>) {
    let Some(overlap) = piece.intersect(cut) else {
        out.push(piece);
        return;
    };

    // Rows above the overlap.
    if overlap.y > piece.y {
        out.push(PixelRect::new(piece.x, piece.y, piece.w, overlap.y - piece.y));
    }
    // Rows below the overlap.
    if overlap.bottom() < piece.bottom() {
        out.push(PixelRect::new(
            piece.x,
            overlap.bottom(),
            piece.w,
            piece.bottom() - overlap.bottom(),
        ));
    }
    // Left and right remainders of the overlapped rows.
    if overlap.x > piece.x {
        out.push(PixelRect::new(
            piece.x,
            overlap.y,
            overlap.x - piece.x,
            overlap.h,
        ));
    }
    if overlap.right() < piece.right() {
        out.push(PixelRect::new(
            overlap.right(),
            overlap.y,
            piece.right() - overlap.right(),
            overlap.h,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: u32, y: u32, w: u32, h: u32) -> PixelRect {
        PixelRect::new(x, y, w, h)
    }

    fn assert_disjoint(region: &Region) {
        let rects: Vec<_> = region.iter().copied().collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(
                    a.intersect(*b).is_none(),
                    "rects {a:?} and {b:?} overlap"
                );
            }
        }
    }

    // ── add ───────────────────────────────────────────────────────────────

    #[test]
    fn add_empty_rect_is_noop() {
        let mut region = Region::new();
        region.add(r(5, 5, 0, 3));
        assert!(region.is_empty());
    }

    #[test]
    fn add_disjoint_keeps_both() {
        let mut region = Region::from_rect(r(0, 0, 4, 4));
        region.add(r(10, 10, 4, 4));
        assert_eq!(region.rect_count(), 2);
        assert_disjoint(&region);
    }

    #[test]
    fn add_contained_rect_is_noop() {
        let mut region = Region::from_rect(r(0, 0, 10, 10));
        region.add(r(2, 2, 3, 3));
        assert_eq!(region.rect_count(), 1);
    }

    #[test]
    fn add_overlapping_stays_disjoint_and_covers_both() {
        let mut region = Region::from_rect(r(0, 0, 10, 10));
        region.add(r(5, 5, 10, 10));
        assert_disjoint(&region);

        // Every pixel of both inputs is covered.
        for (x, y) in [(0, 0), (9, 9), (5, 5), (14, 14), (12, 6), (6, 12)] {
            assert!(region.covers(x, y), "({x},{y}) not covered");
        }
        // And nothing outside.
        assert!(!region.covers(14, 0));
        assert!(!region.covers(0, 14));
    }

    // ── merge (dirty accumulation) ────────────────────────────────────────

    #[test]
    fn merge_is_superset_of_both_changes() {
        let mut accumulated = Region::from_rect(r(0, 0, 8, 8));
        let second = Region::from_rect(r(4, 4, 8, 8));
        accumulated.merge(&second);

        assert_disjoint(&accumulated);
        for (x, y) in [(0, 0), (7, 7), (4, 4), (11, 11)] {
            assert!(accumulated.covers(x, y));
        }
    }

    // ── take ──────────────────────────────────────────────────────────────

    #[test]
    fn take_drains_the_region() {
        let mut region = Region::from_rect(r(1, 1, 2, 2));
        let taken = region.take();
        assert!(!taken.is_empty());
        assert!(region.is_empty());
        assert!(region.take().is_empty());
    }

    // ── bounds / full ─────────────────────────────────────────────────────

    #[test]
    fn bounds_spans_all_rects() {
        let mut region = Region::from_rect(r(2, 2, 2, 2));
        region.add(r(10, 1, 3, 3));
        assert_eq!(region.bounds(), Some(r(2, 1, 11, 3)));
    }

    #[test]
    fn bounds_of_empty_is_none() {
        assert_eq!(Region::new().bounds(), None);
    }

    #[test]
    fn full_covers_corners() {
        let region = Region::full(RasterSize::new(16, 8));
        assert!(region.covers(0, 0));
        assert!(region.covers(15, 7));
        assert!(!region.covers(16, 0));
    }
}
