use std::{cell::RefCell, rc::Rc, time::Duration};

use gtk::{prelude::*, EventControllerMotion};
use marquee_core::{Marquee, MarqueeConfig, Orientation, ScrollSurface, TimerHandle};

pub type TickerMarquee = Marquee<TickerSurface, TimerSource>;

/// The scrolled window and the strip of labels inside it.
#[derive(Clone, Debug)]
pub struct TickerSurface {
    scrolled: gtk::ScrolledWindow,
    strip: gtk::Box,
}

impl TickerSurface {
    pub fn new(config: &MarqueeConfig) -> Self {
        let strip = gtk::Box::new(gtk::Orientation::Horizontal, config.spacing);
        strip.add_css_class("marquee-strip");

        let viewport = gtk::Viewport::new(None::<&gtk::Adjustment>, None::<&gtk::Adjustment>);
        viewport.set_child(Some(&strip));

        let scrolled = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::External)
            .vscrollbar_policy(gtk::PolicyType::Never)
            .has_frame(false)
            .propagate_natural_height(true)
            .child(&viewport)
            .build();
        scrolled.add_css_class("marquee");
        let surface = Self { scrolled, strip };
        surface.resize(config);
        surface
    }

    pub fn scrolled(&self) -> &gtk::ScrolledWindow {
        &self.scrolled
    }

    pub fn resize(&self, config: &MarqueeConfig) {
        self.scrolled.set_width_request(config.viewport_width);
        self.scrolled.set_min_content_width(config.viewport_width);
        self.scrolled.set_max_content_width(config.viewport_width);
        self.strip.set_spacing(config.spacing);
    }

    /// Replaces the strip content with one label per markup string.
    ///
    /// `on_hover` is called with the label index and whether the pointer
    /// entered (`true`) or left it.
    pub fn set_labels<F>(&self, config: &MarqueeConfig, on_hover: F)
    where
        F: Fn(usize, bool) + Clone + 'static,
    {
        self.clear();
        if config.padding {
            self.strip.append(&spacer(config.viewport_width));
        }
        for (index, markup) in config.labels.iter().enumerate() {
            let label = markup_label(markup);

            let motion = EventControllerMotion::new();
            let enter = on_hover.clone();
            motion.connect_enter(move |_, _, _| enter(index, true));
            let leave = on_hover.clone();
            motion.connect_leave(move |_| leave(index, false));
            label.add_controller(motion);

            self.strip.append(&label);
        }
        if config.padding {
            self.strip.append(&spacer(config.viewport_width));
        }
        self.scrolled.hadjustment().set_value(0.0);
    }

    pub fn clear(&self) {
        while let Some(child) = self.strip.first_child() {
            self.strip.remove(&child);
        }
    }
}

impl ScrollSurface for TickerSurface {
    fn content_width(&self) -> i32 {
        self.scrolled.hadjustment().upper() as i32
    }

    fn scroll_to(&self, offset: u32) {
        let adjustment = self.scrolled.hadjustment();
        let freeze_guard = adjustment.freeze_notify();
        adjustment.set_value(f64::from(offset));
        drop(freeze_guard);
    }

    fn set_orientation(&self, orientation: Orientation) {
        let orientation = match orientation {
            Orientation::Horizontal => gtk::Orientation::Horizontal,
            Orientation::Vertical => gtk::Orientation::Vertical,
        };
        self.strip.set_orientation(orientation);
    }
}

fn spacer(width: i32) -> gtk::Box {
    let spacer = gtk::Box::new(gtk::Orientation::Horizontal, 0);
    spacer.set_width_request(width);
    spacer.add_css_class("marquee-spacer");
    spacer
}

fn markup_label(markup: &str) -> gtk::Label {
    let label = gtk::Label::new(None);
    if gtk::pango::parse_markup(markup, '\0').is_ok() {
        label.set_markup(markup);
    } else {
        log::warn!("invalid markup, showing it as plain text: {markup}");
        label.set_text(markup);
    }
    label.set_wrap(false);
    label.set_single_line_mode(true);
    label.add_css_class("marquee-label");
    label
}

/// A `glib` timeout source.
#[derive(Debug)]
pub struct TimerSource(glib::SourceId);

impl TimerHandle for TimerSource {
    fn cancel(self) {
        self.0.remove();
    }
}

/// Starts ticking `marquee` every `interval` on the default main context.
///
/// The timeout only holds a weak reference: once the marquee is gone it
/// stops itself.
pub fn start_timer(marquee: &Rc<RefCell<TickerMarquee>>, interval: Duration) {
    let weak = Rc::downgrade(marquee);
    let source = glib::timeout_add_local(interval, move || {
        let Some(marquee) = weak.upgrade() else {
            return glib::ControlFlow::Break;
        };
        let Ok(mut marquee) = marquee.try_borrow_mut() else {
            log::trace!("marquee busy, skipping tick");
            return glib::ControlFlow::Continue;
        };
        if marquee.tick() {
            glib::ControlFlow::Continue
        } else {
            glib::ControlFlow::Break
        }
    });
    marquee.borrow_mut().attach_timer(TimerSource(source));
}
