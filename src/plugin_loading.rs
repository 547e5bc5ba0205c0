use std::{collections::HashMap, path::Path};

use abi_stable::{
    abi_stability::abi_checking::{check_layout_compatibility, AbiInstability},
    library::{lib_header_from_path, LibraryError},
    std_types::{
        RBoxError,
        RResult::{self, RErr, ROk},
        RString,
    },
    type_layout::TypeLayout,
    StableAbi,
};
use anyhow::{Context, Result};
use marquee_abi::{PanelPluginBuilderRef, PanelPluginType};

use crate::config::{Config, PLUGIN_DIR_NAME};

pub type PluginConstructor = extern "C" fn(RString) -> RResult<PanelPluginType, RBoxError>;

/// A constructed plugin and the widget it handed to the panel.
pub struct LoadedPlugin {
    pub name: String,
    pub plugin: PanelPluginType,
    pub widget: gtk::Widget,
}

/// Plugins built into the panel plus every `*plugin.so` in `<config_dir>/plugins`.
pub fn get_plugin_definitions(config_dir: &Path) -> HashMap<String, PluginConstructor> {
    let mut plugin_def_map = HashMap::<String, PluginConstructor>::new();

    #[cfg(feature = "embed_plugins")]
    plugin_def_map.insert(
        ticker_plugin::NAME.to_string(),
        ticker_plugin::new as PluginConstructor,
    );

    let plugin_path = config_dir.join(PLUGIN_DIR_NAME);
    let files = match std::fs::read_dir(&plugin_path) {
        Ok(files) => files,
        Err(err) => {
            log::debug!("not loading plugin files from {}: {err}", plugin_path.display());
            return plugin_def_map;
        }
    };
    for file in files.flatten() {
        let path = file.path();
        if !path.is_file() || !is_plugin_file(&path) {
            continue;
        }
        log::debug!("loading plugin file: {:#?}", path);

        let plugin_builder = match load_plugin_builder(&path) {
            Ok(builder) => builder,
            Err(err) => {
                log::error!("error while loading {}: {err:#}", path.display());
                continue;
            }
        };
        let name = plugin_builder.name().to_string();
        if plugin_def_map.contains_key(&name) {
            log::warn!("{} provides {name} again, ignoring it", path.display());
            continue;
        }
        plugin_def_map.insert(name, plugin_builder.new());
    }
    plugin_def_map
}

fn is_plugin_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_lowercase)
        .and_then(|name| name.strip_suffix(".so").map(|stem| stem.ends_with("plugin")))
        .unwrap_or(false)
}

fn load_plugin_builder(path: &Path) -> Result<PanelPluginBuilderRef> {
    let header = lib_header_from_path(path)?;
    let layout = header
        .layout()
        .with_context(|| "library does not export a type layout")?;
    ensure_compatibility(PanelPluginBuilderRef::LAYOUT, layout)?;
    let builder = unsafe {
        header
            .unchecked_layout::<PanelPluginBuilderRef>()
            .map_err(|err| err.into_library_error::<PanelPluginBuilderRef>())?
    };
    Ok(builder)
}

/// Names of the plugins to construct, in construction order.
///
/// `"all"` loads every available plugin sorted by name, otherwise the order
/// of `loaded_plugins` is kept and unknown names are skipped.
pub fn plugin_order<'a>(
    config: &Config,
    available: impl Iterator<Item = &'a String>,
) -> Vec<String> {
    let available: Vec<&String> = available.collect();
    if config.loads_all() {
        let mut names: Vec<String> = available.into_iter().cloned().collect();
        names.sort();
        return names;
    }
    config
        .loaded_plugins
        .iter()
        .filter(|name| {
            let found = available.contains(name);
            if !found {
                log::warn!("plugin {name} not found, skipping");
            }
            found
        })
        .cloned()
        .collect()
}

/// Constructs the plugins selected by `config`. Failing plugins are logged
/// and skipped.
pub fn build_plugins(
    config: &Config,
    definitions: &HashMap<String, PluginConstructor>,
) -> Vec<LoadedPlugin> {
    let mut plugins = Vec::new();
    for plugin_name in plugin_order(config, definitions.keys()) {
        let Some(constructor) = definitions.get(&plugin_name) else {
            continue;
        };
        let plugin_config = match config.plugin_config_string(&plugin_name) {
            Ok(conf) => conf,
            Err(err) => {
                log::error!("{err:#}, using defaults for {plugin_name}");
                String::new()
            }
        };
        let plugin = match constructor(plugin_config.into()) {
            ROk(plugin) => plugin,
            RErr(err) => {
                log::error!("error during creation of {plugin_name}: {err}");
                continue;
            }
        };
        let widget: gtk::Widget = match plugin.widget().try_into() {
            Ok(widget) => widget,
            Err(err) => {
                log::error!("{plugin_name} did not provide a usable widget: {err}");
                continue;
            }
        };
        plugins.push(LoadedPlugin {
            name: plugin_name,
            plugin,
            widget,
        });
    }
    log::info!(
        "loaded plugins: {:?}",
        plugins.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
    );
    plugins
}

/// Accepts libraries built against an older ABI that only miss trailing
/// fields, anything else is an error.
pub fn ensure_compatibility(
    interface: &'static TypeLayout,
    implementation: &'static TypeLayout,
) -> Result<(), LibraryError> {
    let compatibility = check_layout_compatibility(interface, implementation);
    if let Err(err) = compatibility {
        let incompatibilities = err.errors.iter().filter(|e| !e.errs.is_empty());
        let fatal_incompatibilities = incompatibilities.filter(|err| {
            err.errs.iter().any(|err| {
                !matches!(
                    err,
                    AbiInstability::FieldCountMismatch(assert) if assert.expected > assert.found
                )
            })
        });
        if fatal_incompatibilities.count() > 0 {
            return Err(LibraryError::AbiInstability(RBoxError::new(err)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn recognizes_plugin_files() {
        assert!(is_plugin_file(&PathBuf::from("/x/libticker_plugin.so")));
        assert!(is_plugin_file(&PathBuf::from("LIBCLOCKPLUGIN.SO")));
        assert!(!is_plugin_file(&PathBuf::from("/x/libticker_plugin.so.1")));
        assert!(!is_plugin_file(&PathBuf::from("/x/libticker.so")));
        assert!(!is_plugin_file(&PathBuf::from("/x/plugin.ron")));
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn all_loads_every_plugin_sorted() {
        let available = names(&["b", "c", "a"]);
        let order = plugin_order(&Config::default(), available.iter());
        assert_eq!(order, names(&["a", "b", "c"]));
    }

    #[test]
    fn explicit_list_keeps_order_and_skips_unknown() {
        let config = Config {
            loaded_plugins: names(&["c", "missing", "a"]),
            ..Default::default()
        };
        let available = names(&["a", "b", "c"]);
        assert_eq!(plugin_order(&config, available.iter()), names(&["c", "a"]));
    }

    #[test]
    fn ignores_non_plugin_files() {
        let dir = tempfile::tempdir().unwrap();
        let plugins = dir.path().join(PLUGIN_DIR_NAME);
        std::fs::create_dir(&plugins).unwrap();
        std::fs::write(plugins.join("notes.txt"), "not a library").unwrap();
        std::fs::write(plugins.join("libhelper.so"), "not a plugin").unwrap();

        let definitions = get_plugin_definitions(dir.path());
        #[cfg(feature = "embed_plugins")]
        assert_eq!(definitions.keys().collect::<Vec<_>>(), vec![ticker_plugin::NAME]);
        #[cfg(not(feature = "embed_plugins"))]
        assert!(definitions.is_empty());
    }
}
