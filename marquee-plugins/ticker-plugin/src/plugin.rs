use std::{cell::RefCell, rc::Rc};

use abi_stable::{
    sabi_extern_fn,
    sabi_trait::TD_CanDowncast,
    std_types::{
        RBoxError,
        RResult::{self, RErr, ROk},
        RString,
    },
};
use anyhow::{bail, Context, Result};
use env_logger::Env;
use gtk::prelude::*;
use log::Level;
use marquee_abi::{
    PanelPluginType, SabiOrientation, SabiPanelPlugin, SabiPanelPlugin_TO, SabiWidget,
};
use marquee_core::{Marquee, MarqueeConfig};

use crate::{
    widget::{self, TickerMarquee, TickerSurface},
    ABOUT,
};

pub struct TickerPlugin {
    surface: TickerSurface,
    marquee: Rc<RefCell<TickerMarquee>>,
    config: MarqueeConfig,
    about_dialog: RefCell<Option<glib::WeakRef<gtk::AboutDialog>>>,
}

#[sabi_extern_fn]
pub fn new(config: RString) -> RResult<PanelPluginType, RBoxError> {
    // the panel or another plugin may already have installed a logger
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(Level::Warn.as_str()))
        .try_init();

    match TickerPlugin::build(&config) {
        Ok(plugin) => ROk(SabiPanelPlugin_TO::from_value(plugin, TD_CanDowncast)),
        Err(err) => {
            log::error!("failed to create ticker: {err:#}");
            RErr(RBoxError::from_fmt(&format_args!("{err:#}")))
        }
    }
}

impl TickerPlugin {
    pub fn build(config: &str) -> Result<Self> {
        if !gtk::is_initialized_main_thread() {
            bail!("gtk is not initialized on this thread");
        }
        let config = parse_config(config)?;

        let surface = TickerSurface::new(&config);
        let marquee = Rc::new(RefCell::new(Marquee::new(&config, surface.clone())?));
        surface.set_labels(&config, hover_handler(&marquee));
        widget::start_timer(&marquee, config.tick_interval());
        log::info!(
            "ticker started: {} labels, {}px every {}ms",
            config.labels.len(),
            config.step,
            config.tick_interval_ms
        );

        Ok(Self {
            surface,
            marquee,
            config,
            about_dialog: RefCell::new(None),
        })
    }

    fn apply_config(&mut self, config: MarqueeConfig) -> Result<()> {
        if self.marquee.borrow().is_torn_down() {
            bail!("ticker was already torn down");
        }
        self.marquee.borrow_mut().update_config(&config)?;
        self.surface.resize(&config);
        self.surface.set_labels(&config, hover_handler(&self.marquee));
        if config.tick_interval_ms != self.config.tick_interval_ms {
            widget::start_timer(&self.marquee, config.tick_interval());
        }
        self.config = config;
        Ok(())
    }

    fn present_about(&self) {
        let existing = self
            .about_dialog
            .borrow()
            .as_ref()
            .and_then(|dialog| dialog.upgrade());
        if let Some(dialog) = existing {
            dialog.present();
            return;
        }

        let dialog = gtk::AboutDialog::new();
        dialog.set_title(Some("About"));
        dialog.set_program_name(Some(ABOUT.name));
        dialog.set_version(Some(ABOUT.version));
        dialog.set_comments(Some(ABOUT.description));
        if let Some(website) = ABOUT.website() {
            dialog.set_website(Some(website));
        }
        dialog.set_authors(&ABOUT.authors());
        dialog.set_logo_icon_name(Some(ABOUT.icon));
        if !ABOUT.credits.is_empty() {
            dialog.add_credit_section("Thanks to", ABOUT.credits);
        }
        dialog.set_modal(true);
        dialog.set_destroy_with_parent(true);
        if let Some(window) = self.surface.scrolled().root().and_downcast::<gtk::Window>() {
            dialog.set_transient_for(Some(&window));
        }
        dialog.present();
        self.about_dialog.replace(Some(dialog.downgrade()));
    }

    fn close_about(&self) {
        if let Some(dialog) = self
            .about_dialog
            .take()
            .and_then(|dialog| dialog.upgrade())
        {
            dialog.close();
        }
    }
}

impl SabiPanelPlugin for TickerPlugin {
    fn widget(&self) -> SabiWidget {
        self.surface.scrolled().clone().upcast::<gtk::Widget>().into()
    }

    fn orientation_changed(&mut self, orientation: SabiOrientation) {
        self.marquee.borrow_mut().orientation_changed(orientation.into());
    }

    fn about(&self) {
        self.present_about();
    }

    fn update_config(&mut self, config: RString) -> RResult<(), RBoxError> {
        let result = parse_config(&config).and_then(|config| self.apply_config(config));
        match result {
            Ok(()) => ROk(()),
            Err(err) => {
                log::error!("keeping previous ticker config: {err:#}");
                RErr(RBoxError::from_fmt(&format_args!("{err:#}")))
            }
        }
    }

    fn teardown(&mut self) {
        if !self.marquee.borrow_mut().teardown() {
            log::debug!("ticker teardown requested twice");
            return;
        }
        self.close_about();
        self.surface.clear();
        log::info!("ticker torn down");
    }
}

fn parse_config(config: &str) -> Result<MarqueeConfig> {
    if config.trim().is_empty() {
        return Ok(MarqueeConfig::default());
    }
    MarqueeConfig::from_ron(config).with_context(|| "invalid ticker config")
}

fn hover_handler(
    marquee: &Rc<RefCell<TickerMarquee>>,
) -> impl Fn(usize, bool) + Clone + 'static {
    let weak = Rc::downgrade(marquee);
    move |label, entered| {
        let Some(marquee) = weak.upgrade() else {
            return;
        };
        let Ok(mut marquee) = marquee.try_borrow_mut() else {
            log::warn!("dropped hover event for label {label}, marquee busy");
            return;
        };
        if entered {
            marquee.pointer_enter(label);
        } else {
            marquee.pointer_leave(label);
        }
    }
}

#[cfg(test)]
mod tests {
    use marquee_core::PauseMode;

    use super::*;

    #[test]
    fn blank_config_is_default() {
        assert_eq!(parse_config("").unwrap(), MarqueeConfig::default());
        assert_eq!(parse_config("  \n").unwrap(), MarqueeConfig::default());
    }

    #[test]
    fn section_from_panel_config() {
        let config = parse_config(
            r#"{"labels": ["a", "b"], "step": 5, "pause_mode": "AnyHovered"}"#,
        )
        .unwrap();
        assert_eq!(config.labels, vec!["a", "b"]);
        assert_eq!(config.step, 5);
        assert_eq!(config.pause_mode, PauseMode::AnyHovered);
    }

    #[test]
    fn invalid_section_is_rejected() {
        let err = parse_config("(viewport_width: -1)").unwrap_err();
        assert!(format!("{err:#}").contains("invalid ticker config"));
    }

    #[test]
    fn about_lists_authors() {
        assert_eq!(crate::ABOUT.authors(), vec!["cr3eperall"]);
        assert_eq!(crate::ABOUT.name, "Marquee Ticker");
    }
}
