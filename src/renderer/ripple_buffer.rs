//! Fixed-capacity ring of recent ripples

use crate::consts::MAX_RIPPLES;

/// A ripple in normalized viewport space (y up) and its birth time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RippleEvent {
    pub center: [f32; 2],
    /// Seconds since the effect was mounted
    pub start_time: f32,
}

/// Read-only view handed to the renderer once per frame
#[derive(Debug, Clone, Copy)]
pub struct RippleSnapshot<'a> {
    /// All slots, including stale ones past `live_count`
    pub slots: &'a [RippleEvent; MAX_RIPPLES],
    pub live_count: usize,
}

/// Overwrite-oldest ring buffer.
///
/// Slots are never cleared; `live_count` says how many hold real events.
#[derive(Debug, Clone, Default)]
pub struct RippleBuffer {
    slots: [RippleEvent; MAX_RIPPLES],
    write_index: usize,
    live_count: usize,
}

impl RippleBuffer {
    pub const CAPACITY: usize = MAX_RIPPLES;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ripple at normalized (x, y) born at `now` seconds
    pub fn add_ripple(&mut self, norm_x: f32, norm_y: f32, now: f32) {
        self.slots[self.write_index] = RippleEvent {
            center: [norm_x, norm_y],
            start_time: now,
        };
        self.write_index = (self.write_index + 1) % MAX_RIPPLES;
        self.live_count = (self.live_count + 1).min(MAX_RIPPLES);
    }

    pub fn snapshot(&self) -> RippleSnapshot<'_> {
        RippleSnapshot {
            slots: &self.slots,
            live_count: self.live_count,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: usize = RippleBuffer::CAPACITY;

    fn event(i: usize) -> (f32, f32, f32) {
        (i as f32 / 100.0, 1.0 - i as f32 / 100.0, i as f32)
    }

    #[test]
    fn test_empty_snapshot_has_no_live_ripples() {
        let buffer = RippleBuffer::new();
        let snap = buffer.snapshot();
        assert_eq!(snap.live_count, 0);
        assert_eq!(snap.slots.len(), K);
    }

    #[test]
    fn test_fills_in_order() {
        let mut buffer = RippleBuffer::new();
        for i in 0..4 {
            let (x, y, t) = event(i);
            buffer.add_ripple(x, y, t);
        }
        let snap = buffer.snapshot();
        assert_eq!(snap.live_count, 4);
        assert_eq!(buffer.write_index(), 4);
        assert_eq!(snap.slots[2].start_time, 2.0);
        let (x, y, _) = event(2);
        assert_eq!(snap.slots[2].center, [x, y]);
    }

    #[test]
    fn test_overflow_overwrites_oldest_slots() {
        let mut buffer = RippleBuffer::new();
        for i in 0..K + 3 {
            let (x, y, t) = event(i);
            buffer.add_ripple(x, y, t);
        }
        let snap = buffer.snapshot();
        assert_eq!(snap.live_count, K);
        assert_eq!(buffer.write_index(), (K + 3) % K);

        // Slots 0..3 hold the three newest events
        for slot in 0..3 {
            assert_eq!(snap.slots[slot].start_time, (K + slot) as f32);
        }
        // The rest still hold events 3..K
        for slot in 3..K {
            assert_eq!(snap.slots[slot].start_time, slot as f32);
        }
    }

    #[test]
    fn test_twelve_events_leave_last_ten_live() {
        let mut buffer = RippleBuffer::new();
        for i in 0..12 {
            let (x, y, t) = event(i);
            buffer.add_ripple(x, y, t);
        }
        let snap = buffer.snapshot();
        assert_eq!(snap.live_count, 10);

        let mut times: Vec<f32> = snap.slots.iter().map(|r| r.start_time).collect();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f32> = (2..12).map(|i| i as f32).collect();
        assert_eq!(times, expected);
    }
}
