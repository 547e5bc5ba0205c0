//! Toolkit independent part of the marquee plugin.
//!
//! Holds the scroll state machine, the hover tracking, the configuration
//! and the [`Marquee`](marquee::Marquee) controller that ties them to a
//! scrollable surface and a recurring timer.

pub mod about;
pub mod config;
pub mod hover;
pub mod marquee;
pub mod orientation;
pub mod scroll_state;

pub use config::{MarqueeConfig, PauseMode};
pub use marquee::{Marquee, ScrollSurface, TimerHandle};
pub use orientation::Orientation;
pub use scroll_state::ScrollState;
