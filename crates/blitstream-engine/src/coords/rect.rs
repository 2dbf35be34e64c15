/// Axis-aligned rectangle in raster pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(self) -> u32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(self) -> u32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px < self.right() && py < self.bottom()
    }

    #[inline]
    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// Bounding box of two rectangles. An empty operand contributes nothing.
    pub fn union_bounds(self, other: PixelRect) -> PixelRect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }

        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Clips the rectangle to a `width` x `height` extent at the origin.
    pub fn clamped(self, width: u32, height: u32) -> PixelRect {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.right().min(width);
        let y1 = self.bottom().min(height);
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: u32, y: u32, w: u32, h: u32) -> PixelRect {
        PixelRect::new(x, y, w, h)
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_interior_point() {
        assert!(r(0, 0, 10, 10).contains(5, 5));
    }

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(2, 3, 10, 10).contains(2, 3));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        // Half-open [min, max) — the max edge is not contained.
        assert!(!r(0, 0, 10, 10).contains(10, 10));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0, 0, 10, 10).intersect(r(5, 5, 10, 10)).unwrap();
        assert_eq!(i, r(5, 5, 5, 5));
    }

    #[test]
    fn intersect_contained() {
        let outer = r(0, 0, 100, 100);
        let inner = r(10, 10, 20, 20);
        assert_eq!(outer.intersect(inner).unwrap(), inner);
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_none());
    }

    #[test]
    fn intersect_disjoint_returns_none() {
        assert!(r(0, 0, 5, 5).intersect(r(20, 20, 5, 5)).is_none());
    }

    // ── union_bounds ──────────────────────────────────────────────────────

    #[test]
    fn union_bounds_covers_both() {
        let u = r(0, 0, 4, 4).union_bounds(r(10, 10, 2, 2));
        assert_eq!(u, r(0, 0, 12, 12));
    }

    #[test]
    fn union_bounds_with_empty_is_identity() {
        let a = r(3, 3, 5, 5);
        assert_eq!(a.union_bounds(r(0, 0, 0, 0)), a);
        assert_eq!(r(9, 9, 0, 4).union_bounds(a), a);
    }

    // ── clamped ───────────────────────────────────────────────────────────

    #[test]
    fn clamped_inside_is_identity() {
        let a = r(1, 2, 3, 4);
        assert_eq!(a.clamped(100, 100), a);
    }

    #[test]
    fn clamped_overhanging_is_clipped() {
        assert_eq!(r(8, 8, 10, 10).clamped(12, 10), r(8, 8, 4, 2));
    }

    #[test]
    fn clamped_fully_outside_is_empty() {
        assert!(r(20, 20, 5, 5).clamped(10, 10).is_empty());
    }
}
