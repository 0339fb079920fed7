use marquee_core::device::DeviceSignals;
use wasm_bindgen::prelude::*;

/// Read a property, treating any failure or non-object receiver as absent.
fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    if !target.is_object() {
        return None;
    }
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Read `navigator.deviceMemory`, `navigator.hardwareConcurrency` and
/// `navigator.connection.saveData`. None of these are universally supported;
/// missing ones come back as `None` and nothing here throws.
pub fn read_device_signals() -> DeviceSignals {
    let Some(window) = web_sys::window() else {
        log::info!("No window; device signals unknown");
        return DeviceSignals::default();
    };
    let navigator: JsValue = window.navigator().into();

    let memory_gb = property(&navigator, "deviceMemory")
        .and_then(|v| v.as_f64());
    let cpu_cores = property(&navigator, "hardwareConcurrency")
        .and_then(|v| v.as_f64())
        .filter(|c| c.is_finite() && *c >= 1.0)
        .map(|c| c as u32);
    let save_data = property(&navigator, "connection")
        .and_then(|connection| property(&connection, "saveData"))
        .and_then(|v| v.as_bool());

    DeviceSignals {
        memory_gb,
        cpu_cores,
        save_data,
    }
}
