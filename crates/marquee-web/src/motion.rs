use marquee_core::constants::REDUCED_MOTION_QUERY;
use wasm_bindgen::prelude::*;

use crate::events::EventListener;

/// Subscription to the platform reduced-motion media query.
///
/// The listener is removed when this is dropped.
pub struct ReducedMotionQuery {
    query: web_sys::MediaQueryList,
    _listener: Option<EventListener>,
}

impl ReducedMotionQuery {
    /// Subscribe; `on_change` receives the new "reduced" value synchronously
    /// from the change event. Returns `None` where `matchMedia` is missing.
    pub fn subscribe(
        window: &web_sys::Window,
        mut on_change: impl FnMut(bool) + 'static,
    ) -> Option<Self> {
        let query = match window.match_media(REDUCED_MOTION_QUERY) {
            Ok(Some(query)) => query,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("matchMedia failed: {e:?}");
                return None;
            }
        };

        let listener = EventListener::new(query.as_ref(), "change", move |event| {
            if let Some(event) = event.dyn_ref::<web_sys::MediaQueryListEvent>() {
                on_change(event.matches());
            }
        });

        Some(Self {
            query,
            _listener: listener,
        })
    }

    pub fn matches(&self) -> bool {
        self.query.matches()
    }
}
