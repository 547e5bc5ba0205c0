use anyhow::Result;

use crate::{
    config::{MarqueeConfig, PauseMode},
    hover::HoverState,
    orientation::Orientation,
    scroll_state::ScrollState,
};

/// The scrollable area a [`Marquee`] moves.
pub trait ScrollSurface {
    /// Natural width of everything inside the scrollable area.
    fn content_width(&self) -> i32;
    /// Sets the horizontal scroll position.
    fn scroll_to(&self, offset: u32);
    fn set_orientation(&self, orientation: Orientation);
}

/// A running recurring timer. Cancelling consumes it, so it can only happen once.
pub trait TimerHandle {
    fn cancel(self);
}

/// Marquee controller: owns the scroll state and the timer driving it.
///
/// Every handler runs on the UI thread, one at a time. The timer is
/// cancelled on [`teardown`](Self::teardown) or, failing that, when the
/// controller is dropped.
pub struct Marquee<S: ScrollSurface, T: TimerHandle> {
    surface: S,
    scroll: ScrollState,
    hover: HoverState,
    pause_mode: PauseMode,
    viewport_width: i32,
    orientation: Orientation,
    timer: Option<T>,
    torn_down: bool,
}

impl<S: ScrollSurface, T: TimerHandle> Marquee<S, T> {
    pub fn new(config: &MarqueeConfig, surface: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            surface,
            scroll: ScrollState::new(config.step()?),
            hover: HoverState::new(config.labels.len()),
            pause_mode: config.pause_mode,
            viewport_width: config.viewport_width,
            orientation: Orientation::default(),
            timer: None,
            torn_down: false,
        })
    }

    /// Takes ownership of the timer calling [`tick`](Self::tick),
    /// cancelling the one it replaces.
    pub fn attach_timer(&mut self, timer: T) {
        if self.torn_down {
            log::warn!("timer attached after teardown, cancelling it");
            timer.cancel();
            return;
        }
        if let Some(old) = self.timer.replace(timer) {
            old.cancel();
        }
    }

    /// One timer interval. Returns whether the timer should keep running.
    pub fn tick(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        if let Some(offset) = self
            .scroll
            .advance(self.surface.content_width(), self.viewport_width)
        {
            self.surface.scroll_to(offset);
        }
        true
    }

    pub fn pointer_enter(&mut self, label: usize) {
        self.set_hovered(label, true);
    }

    pub fn pointer_leave(&mut self, label: usize) {
        self.set_hovered(label, false);
    }

    fn set_hovered(&mut self, label: usize, hovered: bool) {
        if self.torn_down {
            return;
        }
        let known = self.hover.set(label, hovered);
        match self.pause_mode {
            PauseMode::LastEvent => self.scroll.set_paused(hovered),
            PauseMode::AnyHovered => {
                if !known {
                    log::warn!("hover event for unknown label {label}");
                    return;
                }
                self.scroll.set_paused(self.hover.any_hovered());
            }
        }
    }

    pub fn orientation_changed(&mut self, orientation: Orientation) {
        if self.torn_down {
            return;
        }
        self.orientation = orientation;
        self.surface.set_orientation(orientation);
    }

    /// Applies a new configuration and restarts from the left edge.
    /// The timer is left alone, attach a new one if the interval changed.
    pub fn update_config(&mut self, config: &MarqueeConfig) -> Result<()> {
        config.validate()?;
        self.scroll.set_step(config.step()?);
        self.scroll.reset();
        self.scroll.set_paused(false);
        self.hover.reset(config.labels.len());
        self.pause_mode = config.pause_mode;
        self.viewport_width = config.viewport_width;
        Ok(())
    }

    /// Cancels the timer. Returns `false` if this already happened.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        log::debug!("marquee torn down at offset {}", self.scroll.offset());
        true
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }
    pub fn offset(&self) -> u32 {
        self.scroll.offset()
    }
    pub fn is_paused(&self) -> bool {
        self.scroll.is_paused()
    }
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<S: ScrollSurface, T: TimerHandle> Drop for Marquee<S, T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;

    #[derive(Default, Clone)]
    struct FakeSurface {
        content_width: Rc<Cell<i32>>,
        scrolled: Rc<RefCell<Vec<u32>>>,
        orientation: Rc<Cell<Option<Orientation>>>,
    }

    impl ScrollSurface for FakeSurface {
        fn content_width(&self) -> i32 {
            self.content_width.get()
        }
        fn scroll_to(&self, offset: u32) {
            self.scrolled.borrow_mut().push(offset);
        }
        fn set_orientation(&self, orientation: Orientation) {
            self.orientation.set(Some(orientation));
        }
    }

    struct FakeTimer(Rc<Cell<u32>>);

    impl TimerHandle for FakeTimer {
        fn cancel(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn marquee(
        viewport_width: i32,
        content_width: i32,
        step: u32,
    ) -> (Marquee<FakeSurface, FakeTimer>, FakeSurface, Rc<Cell<u32>>) {
        let config = MarqueeConfig {
            viewport_width,
            step,
            tick_interval_ms: 133,
            ..Default::default()
        };
        let surface = FakeSurface::default();
        surface.content_width.set(content_width);
        let mut marquee = Marquee::new(&config, surface.clone()).unwrap();
        let cancels = Rc::new(Cell::new(0));
        marquee.attach_timer(FakeTimer(cancels.clone()));
        (marquee, surface, cancels)
    }

    #[test]
    fn rejects_invalid_config() {
        let config = MarqueeConfig {
            step: 0,
            ..Default::default()
        };
        assert!(Marquee::<FakeSurface, FakeTimer>::new(&config, FakeSurface::default()).is_err());
    }

    #[test]
    fn tick_applies_offset_to_surface() {
        let (mut marquee, surface, _) = marquee(200, 1500, 3);
        assert!(marquee.tick());
        assert!(marquee.tick());
        assert_eq!(*surface.scrolled.borrow(), vec![3, 6]);
        assert_eq!(marquee.offset(), 6);
    }

    #[test]
    fn full_cycle_resets_on_tick_434() {
        let (mut marquee, surface, _) = marquee(200, 1500, 3);
        for _ in 0..433 {
            assert!(marquee.tick());
        }
        assert_eq!(marquee.offset(), 1299);
        assert_eq!(marquee.scroll_state().max_offset(), 1300);
        assert!(marquee.tick());
        assert_eq!(marquee.offset(), 0);
        assert_eq!(surface.scrolled.borrow().len(), 434);
    }

    #[test]
    fn hover_pauses_mid_run() {
        let (mut marquee, surface, _) = marquee(200, 1500, 3);
        for _ in 0..100 {
            marquee.tick();
        }
        assert_eq!(marquee.offset(), 300);
        marquee.pointer_enter(0);
        for _ in 101..=150 {
            assert!(marquee.tick());
            assert_eq!(marquee.offset(), 300);
        }
        assert_eq!(surface.scrolled.borrow().len(), 100);
        marquee.pointer_leave(0);
        marquee.tick();
        assert_eq!(marquee.offset(), 303);
    }

    #[test]
    fn repeated_hover_events_are_idempotent() {
        let (mut marquee, _, _) = marquee(200, 1500, 3);
        marquee.pointer_enter(1);
        marquee.pointer_enter(1);
        marquee.pointer_enter(2);
        assert!(marquee.is_paused());
        marquee.pointer_leave(1);
        marquee.pointer_leave(1);
        assert!(!marquee.is_paused());
    }

    #[test]
    fn last_event_wins_across_labels() {
        let (mut marquee, _, _) = marquee(200, 1500, 3);
        marquee.pointer_enter(0);
        marquee.pointer_enter(1);
        marquee.pointer_leave(0);
        assert!(!marquee.is_paused());
    }

    #[test]
    fn any_hovered_mode_waits_for_all_labels() {
        let config = MarqueeConfig {
            pause_mode: PauseMode::AnyHovered,
            labels: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let mut marquee: Marquee<FakeSurface, FakeTimer> =
            Marquee::new(&config, FakeSurface::default()).unwrap();
        marquee.pointer_enter(0);
        marquee.pointer_enter(1);
        marquee.pointer_leave(0);
        assert!(marquee.is_paused());
        marquee.pointer_leave(5);
        assert!(marquee.is_paused());
        marquee.pointer_leave(1);
        assert!(!marquee.is_paused());
    }

    #[test]
    fn narrow_content_oscillates() {
        let (mut marquee, surface, _) = marquee(500, 120, 1);
        for _ in 0..4 {
            marquee.tick();
        }
        assert_eq!(*surface.scrolled.borrow(), vec![1, 0, 1, 0]);
    }

    #[test]
    fn content_width_is_read_each_tick() {
        let (mut marquee, surface, _) = marquee(100, 100, 10);
        marquee.tick();
        assert_eq!(marquee.offset(), 0);
        surface.content_width.set(1000);
        marquee.tick();
        marquee.tick();
        assert_eq!(marquee.offset(), 20);
    }

    #[test]
    fn orientation_is_forwarded() {
        let (mut marquee, surface, _) = marquee(200, 1500, 3);
        marquee.orientation_changed(Orientation::Vertical);
        assert_eq!(surface.orientation.get(), Some(Orientation::Vertical));
        assert_eq!(marquee.orientation(), Orientation::Vertical);
        assert_eq!(marquee.offset(), 0);
    }

    #[test]
    fn teardown_cancels_once_and_stops_ticking() {
        let (mut marquee, surface, cancels) = marquee(200, 1500, 3);
        marquee.tick();
        assert!(marquee.teardown());
        assert_eq!(cancels.get(), 1);
        assert!(!marquee.teardown());
        assert_eq!(cancels.get(), 1);

        assert!(!marquee.tick());
        marquee.pointer_enter(0);
        assert_eq!(marquee.offset(), 3);
        assert!(!marquee.is_paused());
        assert_eq!(*surface.scrolled.borrow(), vec![3]);

        drop(marquee);
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn drop_cancels_running_timer() {
        let (marquee, _, cancels) = marquee(200, 1500, 3);
        drop(marquee);
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn replacing_timer_cancels_previous() {
        let (mut marquee, _, first) = marquee(200, 1500, 3);
        let second = Rc::new(Cell::new(0));
        marquee.attach_timer(FakeTimer(second.clone()));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        marquee.teardown();
        assert_eq!(second.get(), 1);

        let third = Rc::new(Cell::new(0));
        marquee.attach_timer(FakeTimer(third.clone()));
        assert_eq!(third.get(), 1);
        assert!(!marquee.has_timer());
    }

    #[test]
    fn update_config_restarts_from_left_edge() {
        let (mut marquee, _, _) = marquee(200, 1500, 3);
        for _ in 0..10 {
            marquee.tick();
        }
        marquee.pointer_enter(0);
        let config = MarqueeConfig {
            viewport_width: 1000,
            step: 5,
            ..Default::default()
        };
        marquee.update_config(&config).unwrap();
        assert_eq!(marquee.offset(), 0);
        assert!(!marquee.is_paused());
        marquee.tick();
        assert_eq!(marquee.offset(), 5);
        assert_eq!(marquee.scroll_state().max_offset(), 500);

        let bad = MarqueeConfig {
            viewport_width: -1,
            ..Default::default()
        };
        assert!(marquee.update_config(&bad).is_err());
        assert_eq!(marquee.offset(), 5);
    }
}
