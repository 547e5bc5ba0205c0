use abi_stable::{
    declare_root_module_statics,
    library::RootModule,
    package_version_strings, sabi_trait,
    sabi_types::VersionStrings,
    std_types::{RBox, RBoxError, RResult, RStr, RString},
    StableAbi,
};

use crate::{SabiOrientation, SabiWidget};

pub type PanelPluginType = SabiPanelPlugin_TO<'static, RBox<()>>;

/// The handle a panel holds for each loaded plugin.
///
/// Every method is called from the GTK main thread.
#[sabi_trait]
pub trait SabiPanelPlugin {
    /// Root widget of the plugin, to be embedded in the panel.
    ///
    /// The plugin keeps its own reference, the pointer stays valid until
    /// [`teardown`](SabiPanelPlugin::teardown) returns.
    fn widget(&self) -> SabiWidget;

    /// The panel switched between horizontal and vertical layout.
    fn orientation_changed(&mut self, orientation: SabiOrientation);

    /// Show information about the plugin, usually a dialog.
    fn about(&self);

    /// Replace the configuration with the RON section of the panel's config file.
    ///
    /// # Examples
    /// ```ignore
    /// fn update_config(&mut self, config: RString) -> RResult<(), RBoxError> {
    ///     let config = match MarqueeConfig::from_ron(&config) {
    ///         Ok(config) => config,
    ///         Err(err) => return RErr(RBoxError::from_fmt(&format_args!("{err:#}"))),
    ///     };
    ///     self.apply(config);
    ///     ROk(())
    /// }
    /// ```
    fn update_config(&mut self, config: RString) -> RResult<(), RBoxError>;

    /// Stop every timer and release the widget. Called once, before unloading.
    #[sabi(last_prefix_field)]
    fn teardown(&mut self);
}

#[repr(C)]
#[derive(StableAbi)]
#[sabi(kind(Prefix(prefix_ref = PanelPluginBuilderRef)))]
#[sabi(missing_field(panic))]
pub struct PanelPluginBuilder {
    /// Create a new instance of a plugin from its RON config
    /// (an empty string means default config).
    ///
    /// # Examples
    /// ```ignore
    /// #[sabi_extern_fn]
    /// pub fn new(config: RString) -> RResult<PanelPluginType, RBoxError> {
    ///     let plugin = match TickerPlugin::build(&config) {
    ///         Ok(plugin) => plugin,
    ///         Err(err) => return RErr(RBoxError::from_fmt(&format_args!("{err:#}"))),
    ///     };
    ///     ROk(SabiPanelPlugin_TO::from_value(plugin, TD_CanDowncast))
    /// }
    /// ```
    pub new: extern "C" fn(config: RString) -> RResult<PanelPluginType, RBoxError>,

    /// The name of the plugin
    #[sabi(last_prefix_field)]
    pub name: RStr<'static>,
}

impl RootModule for PanelPluginBuilderRef {
    declare_root_module_statics! {PanelPluginBuilderRef}
    const BASE_NAME: &'static str = "panel_plugin";
    const NAME: &'static str = "panel_plugin";
    const VERSION_STRINGS: VersionStrings = package_version_strings!();
}
