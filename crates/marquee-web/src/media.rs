use std::cell::RefCell;
use std::rc::{Rc, Weak};

use marquee_core::config::AdaptiveConfig;
use marquee_core::device::DeviceProfile;
use marquee_core::lifecycle::ObserverHandle;
use marquee_core::media::{MediaCommand, MediaController, MediaEvent};
use marquee_core::visibility::{MediaLayer, ViewportActivation, VisibilityTransition};
use wasm_bindgen::prelude::*;

use crate::events::EventListener;
use crate::observer::WebIntersectionHost;

/// One `<video>`/`<audio>` element whose autoplay, loop and controls follow
/// the device profile, the motion gate and its visibility.
pub struct AdaptiveMedia {
    element: web_sys::HtmlMediaElement,
    layer: MediaLayer,
    controller: MediaController,
    activation: ViewportActivation<WebIntersectionHost>,
    handle: Option<ObserverHandle>,
    listeners: Vec<EventListener>,
}

impl AdaptiveMedia {
    pub fn mount(
        element: web_sys::HtmlMediaElement,
        config: &AdaptiveConfig,
        profile: &DeviceProfile,
        prefers_reduced_motion: bool,
    ) -> Rc<RefCell<Self>> {
        let layer = MediaLayer::from_attr(element.get_attribute("data-layer").as_deref());

        let media = Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            let sink_target = weak.clone();
            let host = WebIntersectionHost::new(Rc::new(
                move |handle: ObserverHandle, intersecting: bool| {
                    if let Some(media) = sink_target.upgrade() {
                        media.borrow_mut().on_intersection(handle, intersecting);
                    }
                },
            ));

            let target: &web_sys::EventTarget = element.as_ref();
            let mut listeners = Vec::new();
            for (event_type, event) in [
                ("play", MediaEvent::PlaybackStarted),
                ("pause", MediaEvent::PlaybackStopped),
                ("ended", MediaEvent::PlaybackStopped),
            ] {
                let weak = weak.clone();
                if let Some(listener) = EventListener::new(target, event_type, move |_| {
                    if let Some(media) = weak.upgrade() {
                        media.borrow_mut().dispatch(event);
                    }
                }) {
                    listeners.push(listener);
                }
            }

            RefCell::new(Self {
                element: element.clone(),
                layer,
                controller: MediaController::new(),
                activation: ViewportActivation::new(host),
                handle: None,
                listeners,
            })
        });

        {
            let mut this = media.borrow_mut();
            this.dispatch(MediaEvent::CapabilityResolved {
                is_low_end: profile.is_low_end,
            });
            this.dispatch(MediaEvent::MotionPreferenceChanged {
                reduced: prefers_reduced_motion,
            });
            let commands = this.controller.sync();
            this.run(&commands);
            this.observe(config);
        }
        media
    }

    /// Register with the viewport observer. An element that cannot be
    /// observed is treated as always onscreen.
    fn observe(&mut self, config: &AdaptiveConfig) {
        let target: &web_sys::Element = self.element.as_ref();
        let margin = config.margin_for(self.layer);
        self.handle = self.activation.register(target, margin);
        if self.handle.is_none() {
            self.dispatch(MediaEvent::ObserverUnavailable);
        }
    }

    pub fn set_prefers_reduced_motion(&mut self, reduced: bool) {
        self.dispatch(MediaEvent::MotionPreferenceChanged { reduced });
    }

    /// Pause, disconnect the observer and drop the element listeners.
    pub fn unmount(&mut self) {
        self.activation.dispose_all();
        self.handle = None;
        self.listeners.clear();
        if !self.element.paused() {
            let _ = self.element.pause();
        }
    }

    fn on_intersection(&mut self, handle: ObserverHandle, intersecting: bool) {
        if let Some(transition) = self.activation.on_intersection(handle, intersecting) {
            let onscreen = transition == VisibilityTransition::Entered;
            self.dispatch(MediaEvent::VisibilityChanged { onscreen });
        }
    }

    fn dispatch(&mut self, event: MediaEvent) {
        let commands = self.controller.apply(event);
        self.run(&commands);
    }

    fn run(&self, commands: &[MediaCommand]) {
        for command in commands {
            match command {
                MediaCommand::Apply(d) => {
                    // Browsers only autoplay muted media.
                    if d.autoplay {
                        self.element.set_muted(true);
                    }
                    self.element.set_autoplay(d.autoplay);
                    self.element.set_loop(d.loop_playback);
                    self.element.set_controls(d.show_controls);
                }
                MediaCommand::Play => match self.element.play() {
                    Ok(promise) => {
                        wasm_bindgen_futures::spawn_local(async move {
                            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                                log::debug!("play() rejected: {e:?}");
                            }
                        });
                    }
                    Err(e) => log::debug!("play() threw: {e:?}"),
                },
                MediaCommand::Pause => {
                    if let Err(e) = self.element.pause() {
                        log::debug!("pause() threw: {e:?}");
                    }
                }
            }
        }
    }
}

/// Collect every `[data-marquee-media]` element that is a media element.
pub fn find_media(document: &web_sys::Document) -> Vec<web_sys::HtmlMediaElement> {
    let Ok(nodes) = document.query_selector_all("[data-marquee-media]") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlMediaElement>().ok())
        .collect()
}
