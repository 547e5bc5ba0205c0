use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use marquee_core::Orientation;
use ron::{ser::PrettyConfig, Value};
use serde::{Deserialize, Serialize};

pub const CONFIG_REL_PATH: &str = "marquee/";
pub const CONFIG_FILE_NAME: &str = "marquee.ron";
pub const STYLE_FILE_NAME: &str = "marquee.scss";
pub const PLUGIN_DIR_NAME: &str = "plugins";

/// Loads every plugin found, in no particular order.
pub const ALL_PLUGINS: &str = "all";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "loaded_plugins")]
    pub loaded_plugins: Vec<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default = "HashMap::new")]
    pub plugin_config: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    #[serde(default = "spacing")]
    pub spacing: i32,
    #[serde(default = "bool_false")]
    pub debugging: bool,
}

fn loaded_plugins() -> Vec<String> {
    vec![ALL_PLUGINS.to_string()]
}
fn spacing() -> i32 {
    4
}
fn bool_false() -> bool {
    false
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            spacing: spacing(),
            debugging: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loaded_plugins: loaded_plugins(),
            orientation: Orientation::default(),
            panel: PanelConfig::default(),
            plugin_config: HashMap::new(),
        }
    }
}

impl Config {
    pub fn loads_all(&self) -> bool {
        self.loaded_plugins.iter().any(|name| name == ALL_PLUGINS)
    }

    /// The plugin's section of the config as RON text, empty if it has none.
    pub fn plugin_config_string(&self, plugin: &str) -> Result<String> {
        match self.plugin_config.get(plugin) {
            Some(value) => ron::ser::to_string_pretty(value, PrettyConfig::default())
                .with_context(|| format!("failed to serialize config for {plugin}")),
            None => Ok(String::new()),
        }
    }

    /// Default config, including the defaults of the plugins built into the panel.
    pub fn with_plugin_defaults() -> Result<Self> {
        #[allow(unused_mut)]
        let mut config = Self::default();
        #[cfg(feature = "embed_plugins")]
        {
            let ticker = marquee_core::MarqueeConfig::default().to_ron()?;
            let value = ron::from_str::<Value>(&ticker)
                .with_context(|| "failed to parse ticker config to value")?;
            config
                .plugin_config
                .insert(ticker_plugin::NAME.to_string(), value);
        }
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, PrettyConfig::default())
            .with_context(|| "failed to serialize config")
    }
}

pub fn get_default_config_path() -> PathBuf {
    glib::user_config_dir().join(CONFIG_REL_PATH)
}

pub fn parse_config(content: &str) -> Result<Config> {
    ron::de::from_str(content).with_context(|| "failed to parse config")
}

/// Reads `marquee.ron` from `config_dir`, falling back to the default
/// config if it is missing or broken.
pub fn get_config(config_dir: &Path) -> Config {
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("no config file at {}, using default", config_path.display());
            return Config::default();
        }
        Err(err) => {
            warn!("failed to read {}: {err}", config_path.display());
            return Config::default();
        }
    };
    parse_config(&content).unwrap_or_else(|err| {
        warn!(
            "{} {}",
            "failed to parse config, using default. Err:".red(),
            format!("{err:#}").red()
        );
        Config::default()
    })
}

pub fn write_default_config(config_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create {}", config_dir.display()))?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    std::fs::write(&config_path, Config::with_plugin_defaults()?.to_ron()?)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    Ok(config_path)
}
