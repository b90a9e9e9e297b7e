//! `lv2ui_descriptor` export: the editor as an embedded X11 UI.
//!
//! The host loads the UI from the plugin binary, hands it a parent window
//! (`ui:parent`) and a write function, and calls `port_event` and the idle
//! interface on its UI thread. Each instance pairs a [`PortUi`] with a
//! [`ReverbEditor`] parented into the host's window.
//!
//! The `LV2UI_*` structs are declared here with the layout of `lv2/ui/ui.h`.

use std::ffi::{CStr, c_char, c_int, c_ulong, c_void};
use std::ptr;

use raw_window_handle::{RawWindowHandle, XlibWindowHandle};
use reverie_core::{PluginConfig, factory_presets};
use reverie_gui::ReverbEditor;

use crate::ui::{FLOAT_PROTOCOL, PortUi, PortWrite};

/// UI URI, matching `bundle/reverie.ttl`.
pub const UI_URI: &str = "https://github.com/ampactor-labs/reverie#ui";

const UI_URI_C: &CStr = c"https://github.com/ampactor-labs/reverie#ui";
const PARENT_FEATURE: &CStr = c"http://lv2plug.in/ns/extensions/ui#parent";
const IDLE_INTERFACE: &CStr = c"http://lv2plug.in/ns/extensions/ui#idleInterface";

type UiHandle = *mut c_void;
type UiController = *mut c_void;
type UiWidget = *mut c_void;
type WriteFunction =
    Option<unsafe extern "C" fn(UiController, u32, u32, u32, *const c_void)>;

/// `LV2_Feature`.
#[repr(C)]
pub struct Feature {
    uri: *const c_char,
    data: *mut c_void,
}

/// `LV2UI_Descriptor`.
#[repr(C)]
pub struct UiDescriptor {
    uri: *const c_char,
    instantiate: Option<
        unsafe extern "C" fn(
            *const UiDescriptor,
            *const c_char,
            *const c_char,
            WriteFunction,
            UiController,
            *mut UiWidget,
            *const *const Feature,
        ) -> UiHandle,
    >,
    cleanup: Option<unsafe extern "C" fn(UiHandle)>,
    port_event: Option<unsafe extern "C" fn(UiHandle, u32, u32, u32, *const c_void)>,
    extension_data: Option<unsafe extern "C" fn(*const c_char) -> *const c_void>,
}

// SAFETY: the only pointer is to a 'static C string literal.
unsafe impl Sync for UiDescriptor {}

/// `LV2UI_Idle_Interface`.
#[repr(C)]
struct IdleInterface {
    idle: Option<unsafe extern "C" fn(UiHandle) -> c_int>,
}

static DESCRIPTOR: UiDescriptor = UiDescriptor {
    uri: UI_URI_C.as_ptr(),
    instantiate: Some(instantiate),
    cleanup: Some(cleanup),
    port_event: Some(port_event),
    extension_data: Some(extension_data),
};

static IDLE: IdleInterface = IdleInterface { idle: Some(idle) };

/// LV2 UI entry point.
#[unsafe(no_mangle)]
pub extern "C" fn lv2ui_descriptor(index: u32) -> *const UiDescriptor {
    if index == 0 {
        &raw const DESCRIPTOR
    } else {
        ptr::null()
    }
}

/// One UI instance behind an opaque host handle.
struct UiInstance {
    // Declared first so the window closes before the link goes away.
    editor: Option<ReverbEditor>,
    ports: PortUi,
}

impl UiInstance {
    fn into_handle(self) -> UiHandle {
        Box::into_raw(Box::new(self)).cast()
    }
}

/// Wrap the host's write function as a float-protocol port writer.
fn host_writer(
    write: unsafe extern "C" fn(UiController, u32, u32, u32, *const c_void),
    controller: UiController,
) -> PortWrite {
    Box::new(move |port, value: f32| {
        // SAFETY: the host keeps `controller` valid for the UI's lifetime and
        // reads exactly `size_of::<f32>()` bytes during the call.
        unsafe {
            write(
                controller,
                port,
                size_of::<f32>() as u32,
                FLOAT_PROTOCOL,
                (&raw const value).cast(),
            );
        }
    })
}

/// Data pointer of the feature named `uri` in a null-terminated array.
///
/// # Safety
///
/// `features` must be null or a host-provided, null-terminated feature array.
unsafe fn feature_data(features: *const *const Feature, uri: &CStr) -> Option<*mut c_void> {
    if features.is_null() {
        return None;
    }
    let mut cursor = features;
    loop {
        // SAFETY: the array is null-terminated, so every slot up to the
        // terminator is readable.
        let feature = unsafe { *cursor };
        if feature.is_null() {
            return None;
        }
        // SAFETY: non-null entries point at valid features with C-string URIs.
        let feature = unsafe { &*feature };
        if !feature.uri.is_null() && unsafe { CStr::from_ptr(feature.uri) } == uri {
            return Some(feature.data);
        }
        // SAFETY: not past the terminator yet.
        cursor = unsafe { cursor.add(1) };
    }
}

unsafe extern "C" fn instantiate(
    _descriptor: *const UiDescriptor,
    plugin_uri: *const c_char,
    _bundle_path: *const c_char,
    write_function: WriteFunction,
    controller: UiController,
    widget: *mut UiWidget,
    features: *const *const Feature,
) -> UiHandle {
    if !cfg!(target_os = "linux") || plugin_uri.is_null() || widget.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: the host passes a NUL-terminated URI.
    let plugin_uri = unsafe { CStr::from_ptr(plugin_uri) };
    if plugin_uri.to_bytes() != crate::PLUGIN_URI.as_bytes() {
        tracing::warn!(uri = ?plugin_uri, "UI instantiated for a foreign plugin");
        return ptr::null_mut();
    }
    let Some(write_function) = write_function else {
        tracing::warn!("host gave the UI no write function");
        return ptr::null_mut();
    };
    // SAFETY: `features` comes straight from the host.
    let Some(parent) = (unsafe { feature_data(features, PARENT_FEATURE) }) else {
        tracing::warn!("host offers no ui:parent; editor unavailable");
        return ptr::null_mut();
    };

    let config = PluginConfig::from_env();
    let presets = factory_presets().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "factory presets unavailable");
        Vec::new()
    });

    let mut ports = PortUi::new(
        host_writer(write_function, controller),
        (config.gui.width, config.gui.height),
    );
    let Some(surface) = ports.take_surface() else {
        return ptr::null_mut();
    };

    let mut parent_handle = XlibWindowHandle::empty();
    parent_handle.window = parent as c_ulong;
    let editor = ReverbEditor::open(RawWindowHandle::Xlib(parent_handle), surface, presets, 1.0);
    let RawWindowHandle::Xlib(child) = editor.raw_window_handle() else {
        tracing::error!("editor window is not an X11 window");
        return ptr::null_mut();
    };

    ports.show();
    // SAFETY: checked non-null above; the host reads it after we return.
    unsafe {
        *widget = child.window as UiWidget;
    }

    tracing::debug!("LV2 UI instantiated");
    UiInstance {
        editor: Some(editor),
        ports,
    }
    .into_handle()
}

unsafe extern "C" fn cleanup(handle: UiHandle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: `handle` came from `UiInstance::into_handle` and the host
    // calls cleanup once.
    drop(unsafe { Box::from_raw(handle.cast::<UiInstance>()) });
    tracing::debug!("LV2 UI cleaned up");
}

unsafe extern "C" fn port_event(
    handle: UiHandle,
    port_index: u32,
    buffer_size: u32,
    format: u32,
    buffer: *const c_void,
) {
    if handle.is_null() || buffer.is_null() {
        return;
    }
    // SAFETY: a live instance, only touched from the host's UI thread.
    let instance = unsafe { &mut *handle.cast::<UiInstance>() };
    // SAFETY: the host guarantees `buffer_size` readable bytes.
    let bytes = unsafe { std::slice::from_raw_parts(buffer.cast::<u8>(), buffer_size as usize) };
    instance.ports.port_event(port_index, buffer_size, format, bytes);
}

unsafe extern "C" fn idle(handle: UiHandle) -> c_int {
    if handle.is_null() {
        return 1;
    }
    // SAFETY: a live instance, only touched from the host's UI thread.
    let instance = unsafe { &mut *handle.cast::<UiInstance>() };
    instance.ports.idle();
    0
}

unsafe extern "C" fn extension_data(uri: *const c_char) -> *const c_void {
    if uri.is_null() {
        return ptr::null();
    }
    // SAFETY: the host passes a NUL-terminated URI.
    if unsafe { CStr::from_ptr(uri) } == IDLE_INTERFACE {
        (&raw const IDLE).cast()
    } else {
        ptr::null()
    }
}
