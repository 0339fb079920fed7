use wasm_bindgen::prelude::*;

/// A DOM event listener removed when dropped.
///
/// Unlike app-lifetime listeners, component listeners must not be leaked with
/// `Closure::forget`: components are mounted and unmounted repeatedly.
pub struct EventListener {
    target: web_sys::EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    /// Attach `callback` for `event_type`. Returns `None` if the browser
    /// refuses the registration.
    pub fn new(
        target: &web_sys::EventTarget,
        event_type: &'static str,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(callback);
        let cb: &js_sys::Function = closure.as_ref().unchecked_ref();
        match target.add_event_listener_with_callback(event_type, cb) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event_type,
                closure,
            }),
            Err(e) => {
                log::warn!("Failed to add {event_type} listener: {e:?}");
                None
            }
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let cb: &js_sys::Function = self.closure.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, cb);
    }
}
