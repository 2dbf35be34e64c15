use crate::coords::{RasterSize, Region};

/// Pending dirty region per texture slot.
///
/// Every reported change fans out to all slots: a slot may lag the producer
/// by any number of frames, so it has to accumulate every change since its
/// own last refresh, not just the latest one. Slots are consumed
/// independently; there is no ordering guarantee between them.
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    pending: Vec<Region>,
}

impl DirtyTracker {
    pub fn new(slot_count: usize) -> Self {
        assert!(slot_count >= 1, "need at least one slot");
        Self {
            pending: vec![Region::new(); slot_count],
        }
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.pending.len()
    }

    /// Unions `changed` into every slot's pending region.
    pub fn mark_changed(&mut self, changed: &Region) {
        if changed.is_empty() {
            return;
        }
        for region in &mut self.pending {
            region.merge(changed);
        }
    }

    /// Marks every slot as entirely dirty. Used after a slot-pool rebuild,
    /// where no slot holds any valid pixels.
    pub fn mark_all_full(&mut self, size: RasterSize) {
        for region in &mut self.pending {
            *region = Region::full(size);
        }
    }

    /// Returns and clears the given slot's pending region.
    pub fn consume(&mut self, slot: usize) -> Region {
        self.pending[slot].take()
    }

    pub fn pending(&self, slot: usize) -> &Region {
        &self.pending[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelRect;

    fn r(x: u32, y: u32, w: u32, h: u32) -> Region {
        Region::from_rect(PixelRect::new(x, y, w, h))
    }

    // ── fan-out ───────────────────────────────────────────────────────────

    #[test]
    fn mark_changed_reaches_every_slot() {
        let mut tracker = DirtyTracker::new(3);
        tracker.mark_changed(&r(0, 0, 4, 4));

        for slot in 0..3 {
            assert!(tracker.pending(slot).covers(0, 0));
        }
    }

    #[test]
    fn consume_clears_only_that_slot() {
        let mut tracker = DirtyTracker::new(3);
        tracker.mark_changed(&r(0, 0, 4, 4));

        assert!(!tracker.consume(1).is_empty());
        assert!(tracker.pending(1).is_empty());
        assert!(!tracker.pending(0).is_empty());
        assert!(!tracker.pending(2).is_empty());
    }

    // ── accumulation ──────────────────────────────────────────────────────

    #[test]
    fn unconsumed_slot_accumulates_both_changes() {
        let mut tracker = DirtyTracker::new(2);
        tracker.mark_changed(&r(0, 0, 8, 8));
        // Slot 0 is refreshed in between, slot 1 is not.
        tracker.consume(0);
        tracker.mark_changed(&r(20, 20, 8, 8));

        let lagging = tracker.consume(1);
        assert!(lagging.covers(0, 0));
        assert!(lagging.covers(20, 20));

        let fresh = tracker.consume(0);
        assert!(!fresh.covers(0, 0));
        assert!(fresh.covers(20, 20));
    }

    // ── idempotent consume ────────────────────────────────────────────────

    #[test]
    fn consume_twice_yields_empty_second() {
        let mut tracker = DirtyTracker::new(1);
        tracker.mark_changed(&r(1, 1, 2, 2));

        assert!(!tracker.consume(0).is_empty());
        assert!(tracker.consume(0).is_empty());
    }

    // ── steady state ──────────────────────────────────────────────────────

    #[test]
    fn unchanged_source_drains_after_one_pass_per_slot() {
        // One change, then ten frames cycling a 3-slot pool: exactly the
        // first visit of each slot sees work, the rest see nothing.
        let mut tracker = DirtyTracker::new(3);
        tracker.mark_changed(&r(0, 0, 16, 16));

        let mut non_empty = 0;
        for frame in 0..10 {
            if !tracker.consume(frame % 3).is_empty() {
                non_empty += 1;
            }
        }
        assert_eq!(non_empty, 3);
    }

    // ── rebuild fan-out ───────────────────────────────────────────────────

    #[test]
    fn mark_all_full_covers_everything() {
        let mut tracker = DirtyTracker::new(2);
        tracker.consume(0);
        tracker.mark_all_full(RasterSize::new(32, 16));

        for slot in 0..2 {
            let region = tracker.consume(slot);
            assert!(region.covers(0, 0));
            assert!(region.covers(31, 15));
        }
    }
}
