use std::cell::RefCell;
use std::rc::{Rc, Weak};

use marquee_core::config::AdaptiveConfig;
use marquee_core::lifecycle::ObserverHandle;
use marquee_core::visibility::{MediaLayer, ViewportActivation, VisibilityTransition};
use marquee_physics::config::{TextEffectConfig, MIN_BODY_EDGE_PX};
use marquee_physics::driver::EffectDriver;
use marquee_physics::effect::{EffectPhase, TextEffect};
use marquee_physics::fragment::{FragmentSize, TapeColor, TextFragment};
use marquee_physics::spawn::ContainerSize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::observer::WebIntersectionHost;
use crate::scheduler::RafScheduler;

/// Falling-word heading bound to a `[data-marquee-gravity]` container.
///
/// The effect is created the first time the container enters the viewport.
/// After that the observer stays registered (and ignored) until unmount.
pub struct GravityText {
    container: web_sys::HtmlElement,
    nodes: Vec<web_sys::HtmlElement>,
    driver: EffectDriver<RafScheduler>,
    activation: ViewportActivation<WebIntersectionHost>,
    handle: Option<ObserverHandle>,
    motion_allowed: bool,
}

impl GravityText {
    pub fn mount(
        window: &web_sys::Window,
        container: web_sys::HtmlElement,
        effect_config: &TextEffectConfig,
        adaptive_config: &AdaptiveConfig,
        motion_allowed: bool,
    ) -> Rc<RefCell<Self>> {
        let nodes = fragment_nodes(&container);
        let fragments: Vec<TextFragment> = nodes.iter().map(read_fragment).collect();
        for (node, fragment) in nodes.iter().zip(&fragments) {
            decorate(node, fragment);
        }

        let text = Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            let frame_target = weak.clone();
            let scheduler = RafScheduler::new(window.clone(), move |timestamp: f64| {
                if let Some(text) = frame_target.upgrade() {
                    text.borrow_mut().on_frame(timestamp);
                }
            });

            let sink_target = weak.clone();
            let host = WebIntersectionHost::new(Rc::new(
                move |handle: ObserverHandle, intersecting: bool| {
                    if let Some(text) = sink_target.upgrade() {
                        text.borrow_mut().on_intersection(handle, intersecting);
                    }
                },
            ));

            RefCell::new(Self {
                container: container.clone(),
                nodes,
                driver: EffectDriver::new(
                    TextEffect::new(fragments, effect_config.clone()),
                    scheduler,
                ),
                activation: ViewportActivation::new(host),
                handle: None,
                motion_allowed,
            })
        });

        {
            let mut this = text.borrow_mut();
            let target: &web_sys::Element = this.container.as_ref();
            let target = target.clone();
            let margin = adaptive_config.margin_for(MediaLayer::Foreground);
            this.handle = this.activation.register(&target, margin);
            if this.handle.is_none() {
                // No observer support: activate right away.
                this.activate();
            }
        }
        text
    }

    /// Motion permission changed. Before activation this only decides the
    /// mode used on entry; a running simulation is frozen where it stands.
    pub fn set_motion_allowed(&mut self, allowed: bool) {
        self.motion_allowed = allowed;
        if !allowed && self.driver.phase() == EffectPhase::Simulating {
            self.driver.freeze();
            self.render();
        }
    }

    /// Cancel the frame loop, disconnect the observer and clear transforms.
    pub fn unmount(&mut self) {
        self.driver.unmount();
        self.activation.dispose_all();
        self.handle = None;
        for node in &self.nodes {
            let _ = node.style().remove_property("transform");
        }
    }

    fn on_intersection(&mut self, handle: ObserverHandle, intersecting: bool) {
        let transition = self.activation.on_intersection(handle, intersecting);
        if transition == Some(VisibilityTransition::Entered)
            && self.driver.phase() == EffectPhase::Uninitialized
        {
            self.activate();
        }
    }

    fn activate(&mut self) {
        let sizes: Vec<FragmentSize> = self
            .nodes
            .iter()
            .map(|node| {
                FragmentSize {
                    width: node.offset_width() as f32,
                    height: node.offset_height() as f32,
                }
                .sanitized(MIN_BODY_EDGE_PX)
            })
            .collect();
        let container = ContainerSize {
            width: self.container.client_width() as f32,
            height: self.container.client_height() as f32,
        }
        .sanitized();

        let mut rng = StdRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64);
        let allowed = self.motion_allowed;
        match self.driver.mount(allowed, container, &sizes, &mut rng) {
            Ok(phase) => {
                log::debug!("Gravity text activated in {phase:?}");
                self.render();
            }
            Err(e) => log::error!("Gravity text failed to mount: {e}"),
        }
    }

    fn on_frame(&mut self, timestamp: f64) {
        self.driver.on_frame(timestamp);
        self.render();
    }

    /// Copy body transforms (or the static layout) onto the fragment nodes.
    fn render(&self) {
        let effect = self.driver.effect();
        if let Some(placements) = effect.static_placements() {
            for placement in placements {
                if let Some(node) = self.nodes.get(placement.index) {
                    set_transform(node, &placement.css_transform());
                }
            }
            return;
        }
        effect.for_each_body(|index, body| {
            if let Some(node) = self.nodes.get(index) {
                set_transform(node, &body.css_transform());
            }
        });
    }
}

fn set_transform(node: &web_sys::HtmlElement, transform: &str) {
    let _ = node.style().set_property("transform", transform);
}

fn fragment_nodes(container: &web_sys::HtmlElement) -> Vec<web_sys::HtmlElement> {
    let Ok(nodes) = container.query_selector_all("[data-fragment]") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .collect()
}

fn read_fragment(node: &web_sys::HtmlElement) -> TextFragment {
    let text = node.text_content().unwrap_or_default();
    let tape = TapeColor::from_attr(node.get_attribute("data-tape").as_deref());
    let mut fragment = TextFragment::new(text.trim()).with_tape(tape);
    if let Some(href) = node.get_attribute("data-href").filter(|h| !h.is_empty()) {
        fragment = fragment.with_link(href);
    }
    fragment
}

/// Absolute positioning from the container origin plus the tape class and
/// link target.
fn decorate(node: &web_sys::HtmlElement, fragment: &TextFragment) {
    let style = node.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("left", "0");
    let _ = style.set_property("top", "0");
    let _ = style.set_property("will-change", "transform");
    let _ = node.class_list().add_1(fragment.tape.css_class());

    if let Some(href) = &fragment.href {
        match node.dyn_ref::<web_sys::HtmlAnchorElement>() {
            Some(anchor) => anchor.set_href(href),
            None => log::debug!(
                "Fragment {:?} has data-href but is not an <a>",
                fragment.text
            ),
        }
    }
}

/// Collect every `[data-marquee-gravity]` container.
pub fn find_gravity_containers(document: &web_sys::Document) -> Vec<web_sys::HtmlElement> {
    let Ok(nodes) = document.query_selector_all("[data-marquee-gravity]") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .collect()
}
