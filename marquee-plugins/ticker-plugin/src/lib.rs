use abi_stable::{export_root_module, prefix_type::PrefixTypeTrait};
use marquee_abi::{PanelPluginBuilder, PanelPluginBuilderRef};
use marquee_core::about::AboutInfo;

pub mod plugin;
pub mod widget;

pub use plugin::new;

pub const NAME: &str = "TickerPlugin";

pub const ABOUT: AboutInfo = AboutInfo {
    name: "Marquee Ticker",
    version: env!("CARGO_PKG_VERSION"),
    description: env!("CARGO_PKG_DESCRIPTION"),
    website: env!("CARGO_PKG_HOMEPAGE"),
    authors: env!("CARGO_PKG_AUTHORS"),
    icon: "marquee-ticker",
    credits: &[
        "Smooth scrolling marquees in GTK https://micolous.id.au/2010/04/19/smooth_scrolling_marquees_in_gtk_.html",
        "xfce4 panel sample plugin in Python https://gitlab.xfce.org/itsManjeet/sample-python-plugin",
    ],
};

#[export_root_module]
fn instantiate_root_module() -> PanelPluginBuilderRef {
    PanelPluginBuilder {
        new,
        name: NAME.into(),
    }
    .leak_into_prefix()
}
