use abi_stable::StableAbi;
use glib::translate::{FromGlibPtrNone, ToGlibPtr};
use gtk::Widget;
use marquee_core::Orientation;

pub mod plugin;

pub use plugin::*;

#[repr(C)]
#[derive(StableAbi)]
pub struct SabiWidget {
    #[sabi(last_prefix_field)]
    pub widget_ref: *mut core::ffi::c_void,
}

impl From<Widget> for SabiWidget {
    /// The plugin must keep its own reference to `widget` for as long as the
    /// host may convert the pointer back.
    fn from(widget: Widget) -> Self {
        let widget_ptr: *mut gtk::ffi::GtkWidget = widget.to_glib_none().0;
        Self {
            widget_ref: widget_ptr as *mut core::ffi::c_void,
        }
    }
}

impl TryInto<Widget> for SabiWidget {
    type Error = String;
    fn try_into(self) -> Result<Widget, Self::Error> {
        unsafe {
            let widget: *mut gtk::ffi::GtkWidget = self.widget_ref as _;
            if widget.is_null() {
                return Err(String::from("SabiWidget pointer is NULL"));
            }
            if !glib::types::instance_of::<gtk::Widget>(widget as *const _) {
                return Err(String::from(
                    "SabiWidget pointer is not a widget, maybe the plugin already released it",
                ));
            }
            Ok(gtk::Widget::from_glib_none(widget))
        }
    }
}

/// [`Orientation`] as it crosses the plugin boundary.
#[repr(u8)]
#[derive(StableAbi, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SabiOrientation {
    Horizontal,
    Vertical,
}

impl From<Orientation> for SabiOrientation {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Horizontal => SabiOrientation::Horizontal,
            Orientation::Vertical => SabiOrientation::Vertical,
        }
    }
}

impl From<SabiOrientation> for Orientation {
    fn from(value: SabiOrientation) -> Self {
        match value {
            SabiOrientation::Horizontal => Orientation::Horizontal,
            SabiOrientation::Vertical => Orientation::Vertical,
        }
    }
}
