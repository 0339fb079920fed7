use std::collections::HashMap;
use std::rc::Rc;

use marquee_core::lifecycle::{IntersectionHost, ObserverHandle};
use marquee_core::visibility::RootMargin;
use wasm_bindgen::prelude::*;

type EntryClosure = Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>;

/// Receives `(handle, is_intersecting)` for every reported entry.
pub type IntersectionSink = Rc<dyn Fn(ObserverHandle, bool)>;

struct LiveObserver {
    observer: web_sys::IntersectionObserver,
    _callback: EntryClosure,
}

/// `IntersectionObserver`-backed host. One browser observer per
/// registration so that every registration keeps its own root margin.
pub struct WebIntersectionHost {
    sink: IntersectionSink,
    next_id: u32,
    live: HashMap<u32, LiveObserver>,
}

impl WebIntersectionHost {
    pub fn new(sink: IntersectionSink) -> Self {
        Self {
            sink,
            next_id: 0,
            live: HashMap::new(),
        }
    }
}

impl IntersectionHost for WebIntersectionHost {
    type Target = web_sys::Element;

    fn observe(&mut self, target: &web_sys::Element, margin: RootMargin) -> Option<ObserverHandle> {
        // Detached elements never intersect; let the caller retry later.
        if !target.is_connected() {
            return None;
        }

        self.next_id += 1;
        let handle = ObserverHandle(self.next_id);
        let sink = self.sink.clone();
        let callback = EntryClosure::new(
            move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<web_sys::IntersectionObserverEntry>() {
                        sink(handle, entry.is_intersecting());
                    }
                }
            },
        );

        let options = web_sys::IntersectionObserverInit::new();
        options.set_root_margin(&margin.to_css());
        let observer = match web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(observer) => observer,
            Err(e) => {
                log::debug!("IntersectionObserver unavailable: {e:?}");
                return None;
            }
        };
        observer.observe(target);

        self.live.insert(
            handle.0,
            LiveObserver {
                observer,
                _callback: callback,
            },
        );
        Some(handle)
    }

    fn unobserve(&mut self, handle: ObserverHandle) {
        if let Some(live) = self.live.remove(&handle.0) {
            live.observer.disconnect();
        }
    }
}

impl Drop for WebIntersectionHost {
    fn drop(&mut self) {
        for (_, live) in self.live.drain() {
            live.observer.disconnect();
        }
    }
}
