use std::num::NonZeroU32;

use anyhow::{bail, ensure, Context, Result};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

/// How hovering the labels pauses the marquee.
///
/// Written as a string in config files (`"AnyHovered"`), the panel passes
/// plugin sections around as `ron::Value` which drops unit variant names.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum PauseMode {
    /// Entering any label pauses, leaving any label resumes. Last event wins.
    #[default]
    LastEvent,
    /// Paused for as long as at least one label is hovered.
    AnyHovered,
}

impl TryFrom<String> for PauseMode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        match value.as_str() {
            "LastEvent" => Ok(PauseMode::LastEvent),
            "AnyHovered" => Ok(PauseMode::AnyHovered),
            other => bail!("unknown pause mode `{other}`, expected LastEvent or AnyHovered"),
        }
    }
}

impl From<PauseMode> for String {
    fn from(value: PauseMode) -> Self {
        match value {
            PauseMode::LastEvent => String::from("LastEvent"),
            PauseMode::AnyHovered => String::from("AnyHovered"),
        }
    }
}

fn viewport_width() -> i32 {
    500
}
fn tick_interval_ms() -> u64 {
    66
}
fn step() -> u32 {
    3
}
fn labels() -> Vec<String> {
    vec![
        String::from(r#"<a href="https://www.gtk.org" title="GTK">Scrolling with GTK</a>"#),
        String::from("<b>Breaking:</b> marquee learns to scroll"),
        String::from("<i>Hover a label to stop it</i>"),
        String::from("Right click for more"),
        String::from("<span foreground=\"#3584e4\">End of the line</span>"),
    ]
}
fn padding() -> bool {
    true
}
fn spacing() -> i32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MarqueeConfig {
    /// Width of the visible window onto the labels, in pixels.
    #[serde(default = "viewport_width")]
    pub viewport_width: i32,
    #[serde(default = "tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Pixels moved per tick.
    #[serde(default = "step")]
    pub step: u32,
    /// Pango markup, one entry per label.
    #[serde(default = "labels")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub pause_mode: PauseMode,
    /// Blank space of `viewport_width` before and after the labels.
    #[serde(default = "padding")]
    pub padding: bool,
    /// Space between labels, in pixels.
    #[serde(default = "spacing")]
    pub spacing: i32,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            viewport_width: viewport_width(),
            tick_interval_ms: tick_interval_ms(),
            step: step(),
            labels: labels(),
            pause_mode: PauseMode::default(),
            padding: padding(),
            spacing: spacing(),
        }
    }
}

impl MarqueeConfig {
    /// Parses either struct `(step: 3)` or map `{"step": 3}` syntax.
    pub fn from_ron(config: &str) -> Result<Self> {
        let value = ron::from_str::<ron::Value>(config)
            .with_context(|| "failed to parse config to value")?;
        let config: Self = value
            .into_rust()
            .with_context(|| "failed to parse config to struct")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, PrettyConfig::default())
            .with_context(|| "failed to serialize marquee config")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.viewport_width > 0,
            "viewport_width must be positive, got {}",
            self.viewport_width
        );
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        ensure!(self.step > 0, "step must be positive");
        ensure!(
            self.spacing >= 0,
            "spacing must not be negative, got {}",
            self.spacing
        );
        Ok(())
    }

    pub fn step(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.step).with_context(|| "step must be positive")
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}
