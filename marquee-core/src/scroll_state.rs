use std::num::NonZeroU32;

/// Horizontal scroll position of a marquee, in pixels.
///
/// `offset` never leaves `0..=max_offset`: a step that would move past
/// `max_offset` wraps back to the left edge instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: u32,
    max_offset: u32,
    step: NonZeroU32,
    paused: bool,
}

impl ScrollState {
    pub fn new(step: NonZeroU32) -> Self {
        Self {
            offset: 0,
            max_offset: 1,
            step,
            paused: false,
        }
    }

    /// Scrollable range for the given geometry, floored at 1 so a label that
    /// fits inside the viewport still has a (tiny) range to move in.
    pub fn max_offset_for(content_width: i32, viewport_width: i32) -> u32 {
        let overflow = i64::from(content_width) - i64::from(viewport_width);
        overflow.clamp(1, i64::from(u32::MAX)) as u32
    }

    /// Moves the marquee one step to the left, wrapping to 0 at the end.
    ///
    /// Returns the new offset, or `None` when paused (nothing changes).
    pub fn advance(&mut self, content_width: i32, viewport_width: i32) -> Option<u32> {
        if self.paused {
            return None;
        }
        self.max_offset = Self::max_offset_for(content_width, viewport_width);
        self.offset = match self.offset.checked_add(self.step.get()) {
            Some(next) if self.offset < self.max_offset && next <= self.max_offset => next,
            _ => 0,
        };
        Some(self.offset)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
    pub fn max_offset(&self) -> u32 {
        self.max_offset
    }
    pub fn step(&self) -> NonZeroU32 {
        self.step
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
    pub fn set_step(&mut self, step: NonZeroU32) {
        self.step = step;
    }

    /// Back to the left edge, keeping step and pause state.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.max_offset = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(step: u32) -> ScrollState {
        ScrollState::new(NonZeroU32::new(step).unwrap())
    }

    #[test]
    fn max_offset_is_overflow_of_content() {
        assert_eq!(ScrollState::max_offset_for(1500, 200), 1300);
        assert_eq!(ScrollState::max_offset_for(201, 200), 1);
    }

    #[test]
    fn max_offset_floors_at_one() {
        assert_eq!(ScrollState::max_offset_for(200, 200), 1);
        assert_eq!(ScrollState::max_offset_for(50, 200), 1);
        assert_eq!(ScrollState::max_offset_for(0, 0), 1);
        assert_eq!(ScrollState::max_offset_for(i32::MIN, i32::MAX), 1);
    }

    #[test]
    fn offset_stays_in_bounds() {
        for step in [1, 2, 3, 7, 64, 1299, 1300, 1301, u32::MAX] {
            let mut scroll = state(step);
            for _ in 0..5000 {
                let offset = scroll.advance(1500, 200).unwrap();
                assert!(offset <= scroll.max_offset(), "step {step}: {offset}");
            }
        }
    }

    #[test]
    fn wraps_from_max_offset_to_zero() {
        let mut scroll = state(3);
        while scroll.advance(1300 + 200, 200).unwrap() != 1299 {}
        // 1299 + 3 would overshoot
        assert_eq!(scroll.advance(1500, 200), Some(0));

        let mut scroll = state(4);
        while scroll.advance(1500, 200).unwrap() != 1300 {}
        assert_eq!(scroll.offset(), scroll.max_offset());
        assert_eq!(scroll.advance(1500, 200), Some(0));
    }

    #[test]
    fn long_run_resets_on_tick_434() {
        let mut scroll = state(3);
        for tick in 1..=433 {
            assert_eq!(scroll.advance(1500, 200), Some(tick * 3));
        }
        assert_eq!(scroll.max_offset(), 1300);
        assert_eq!(scroll.advance(1500, 200), Some(0));
        assert_eq!(scroll.advance(1500, 200), Some(3));
    }

    #[test]
    fn paused_does_not_move() {
        let mut scroll = state(5);
        scroll.advance(1000, 100);
        scroll.set_paused(true);
        for _ in 0..100 {
            assert_eq!(scroll.advance(1000, 100), None);
        }
        assert_eq!(scroll.offset(), 5);
        scroll.set_paused(false);
        assert_eq!(scroll.advance(1000, 100), Some(10));
    }

    #[test]
    fn content_narrower_than_viewport_oscillates() {
        let mut scroll = state(1);
        let offsets: Vec<u32> = (0..6).filter_map(|_| scroll.advance(120, 500)).collect();
        assert_eq!(scroll.max_offset(), 1);
        assert_eq!(offsets, vec![1, 0, 1, 0, 1, 0]);

        let mut scroll = state(3);
        for _ in 0..10 {
            assert_eq!(scroll.advance(120, 500), Some(0));
        }
    }

    #[test]
    fn shrinking_content_wraps_out_of_range_offset() {
        let mut scroll = state(10);
        for _ in 0..50 {
            scroll.advance(1000, 100);
        }
        assert_eq!(scroll.offset(), 500);
        assert_eq!(scroll.advance(300, 100), Some(0));
        assert_eq!(scroll.max_offset(), 200);
    }

    #[test]
    fn reset_keeps_pause_and_step() {
        let mut scroll = state(2);
        scroll.advance(1000, 100);
        scroll.set_paused(true);
        scroll.reset();
        assert_eq!(scroll.offset(), 0);
        assert!(scroll.is_paused());
        assert_eq!(scroll.step().get(), 2);
    }
}
