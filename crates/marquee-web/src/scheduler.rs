use marquee_core::lifecycle::{FrameHandle, FrameScheduler};
use wasm_bindgen::prelude::*;

/// `requestAnimationFrame` scheduler around a single closure created once,
/// so no closure is allocated or leaked per frame.
pub struct RafScheduler {
    window: web_sys::Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl RafScheduler {
    pub fn new(window: web_sys::Window, callback: impl FnMut(f64) + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut(f64)>::new(callback),
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("rAF registration failed: {e:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}
