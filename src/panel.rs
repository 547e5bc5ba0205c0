use std::{cell::RefCell, path::PathBuf, rc::Rc};

use abi_stable::std_types::RResult::RErr;
use colored::Colorize;
use gtk::{prelude::*, CssProvider};
use marquee_abi::PanelPluginType;
use marquee_core::Orientation;

use crate::{
    config::{self, Config, STYLE_FILE_NAME},
    plugin_loading::{self, LoadedPlugin},
};

struct PanelEntry {
    name: String,
    plugin: Rc<RefCell<PanelPluginType>>,
    widget: gtk::Widget,
}

impl From<LoadedPlugin> for PanelEntry {
    fn from(loaded: LoadedPlugin) -> Self {
        Self {
            name: loaded.name,
            plugin: Rc::new(RefCell::new(loaded.plugin)),
            widget: loaded.widget,
        }
    }
}

/// The panel window and the plugins embedded in it.
pub struct Panel {
    window: gtk::ApplicationWindow,
    container: gtk::Box,
    plugins: Vec<PanelEntry>,
    config: Config,
    config_dir: PathBuf,
    orientation_override: Option<Orientation>,
    css_provider: CssProvider,
    torn_down: bool,
}

impl Panel {
    pub fn new(
        app: &gtk::Application,
        config_dir: PathBuf,
        orientation_override: Option<Orientation>,
    ) -> Self {
        let config = config::get_config(&config_dir);

        let container = gtk::Box::new(gtk::Orientation::Horizontal, config.panel.spacing);
        container.add_css_class("plugin-container");
        let window = gtk::ApplicationWindow::new(app);
        window.set_title(Some("marquee"));
        window.set_resizable(false);
        window.set_child(Some(&container));

        let css_provider = CssProvider::new();
        install_style_providers(&css_provider);

        let definitions = plugin_loading::get_plugin_definitions(&config_dir);
        let plugins: Vec<PanelEntry> = plugin_loading::build_plugins(&config, &definitions)
            .into_iter()
            .map(PanelEntry::from)
            .collect();
        for entry in plugins.iter() {
            entry.widget.add_css_class("plugin");
            entry.widget.add_controller(about_gesture(entry));
            container.append(&entry.widget);
        }

        let mut panel = Self {
            window,
            container,
            plugins,
            config,
            config_dir,
            orientation_override,
            css_provider,
            torn_down: false,
        };
        panel.configure_panel();
        panel.load_css();
        panel
    }

    pub fn window(&self) -> &gtk::ApplicationWindow {
        &self.window
    }

    pub fn present(&self) {
        self.window.present();
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// The `--orientation` override if given, the config value otherwise.
    pub fn orientation(&self) -> Orientation {
        self.orientation_override
            .unwrap_or(self.config.orientation)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.container.set_orientation(gtk_orientation(orientation));
        for entry in self.plugins.iter() {
            match entry.plugin.try_borrow_mut() {
                Ok(mut plugin) => plugin.orientation_changed(orientation.into()),
                Err(_) => log::warn!("{} is busy, orientation not forwarded", entry.name),
            }
        }
    }

    fn configure_panel(&mut self) {
        self.container.set_spacing(self.config.panel.spacing);
        self.set_orientation(self.orientation());
        gtk::Window::set_interactive_debugging(self.config.panel.debugging);
    }

    /// Re-reads `marquee.ron` and the user style, then hands every plugin its
    /// new section. Plugins rejecting their section keep the previous one.
    pub fn reload(&mut self) {
        if self.torn_down {
            return;
        }
        log::info!("reloading config from {}", self.config_dir.display());
        self.config = config::get_config(&self.config_dir);
        self.configure_panel();

        for entry in self.plugins.iter() {
            let plugin_config = match self.config.plugin_config_string(&entry.name) {
                Ok(conf) => conf,
                Err(err) => {
                    log::error!("{err:#}");
                    continue;
                }
            };
            let Ok(mut plugin) = entry.plugin.try_borrow_mut() else {
                log::warn!("{} is busy, config not updated", entry.name);
                continue;
            };
            if let RErr(err) = plugin.update_config(plugin_config.into()) {
                log::warn!(
                    "{} {}",
                    format!("{} rejected its config:", entry.name).red(),
                    err.to_string().red()
                );
            }
        }
        self.load_css();
    }

    pub fn load_css(&self) {
        let style_path = self.config_dir.join(STYLE_FILE_NAME);
        if !style_path.is_file() {
            log::debug!("no user style at {}", style_path.display());
            return;
        }
        match grass::from_path(&style_path, &grass::Options::default()) {
            Ok(content) => {
                self.css_provider.load_from_string(&content);
            }
            Err(err) => {
                log::warn!("{} {}", "failed to parse css:".red(), err.to_string().red());
            }
        }
    }

    /// Tears down every plugin and takes its widget out of the panel.
    /// Returns false if the panel was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        for entry in self.plugins.drain(..) {
            match entry.plugin.try_borrow_mut() {
                Ok(mut plugin) => plugin.teardown(),
                Err(_) => log::error!("{} is busy during teardown", entry.name),
            }
            self.container.remove(&entry.widget);
        }
        log::info!("panel torn down");
        true
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn about_gesture(entry: &PanelEntry) -> gtk::GestureClick {
    let gesture = gtk::GestureClick::new();
    gesture.set_button(gdk::BUTTON_SECONDARY);
    let plugin = Rc::downgrade(&entry.plugin);
    let name = entry.name.clone();
    gesture.connect_released(move |gesture, _, _, _| {
        gesture.set_state(gtk::EventSequenceState::Claimed);
        let Some(plugin) = plugin.upgrade() else {
            return;
        };
        match plugin.try_borrow() {
            Ok(plugin) => plugin.about(),
            Err(_) => log::warn!("{name} is busy, not showing about"),
        };
    });
    gesture
}

fn install_style_providers(user_provider: &CssProvider) {
    let Some(display) = gdk::Display::default() else {
        log::warn!("no display, styles not loaded");
        return;
    };
    let fallback_provider = CssProvider::new();
    fallback_provider.load_from_string(include_str!("../default.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &fallback_provider,
        gtk::STYLE_PROVIDER_PRIORITY_SETTINGS,
    );
    gtk::style_context_add_provider_for_display(
        &display,
        user_provider,
        gtk::STYLE_PROVIDER_PRIORITY_USER,
    );
}

pub fn gtk_orientation(orientation: Orientation) -> gtk::Orientation {
    match orientation {
        Orientation::Horizontal => gtk::Orientation::Horizontal,
        Orientation::Vertical => gtk::Orientation::Vertical,
    }
}
