use std::cell::RefCell;
use std::rc::{Rc, Weak};

use marquee_core::config::AdaptiveConfig;
use marquee_core::device::{DeviceProfile, SessionProfile};
use marquee_core::error::MarqueeError;
use marquee_core::motion::{AnimationLevel, MotionGate};
use marquee_physics::config::TextEffectConfig;

use crate::gravity_text::{find_gravity_containers, GravityText};
use crate::media::{find_media, AdaptiveMedia};
use crate::motion::ReducedMotionQuery;
use crate::probe;

/// Everything mounted on one page: the session profile, the motion gate and
/// the components that follow them.
pub struct Site {
    session: SessionProfile,
    gate: MotionGate,
    media: Vec<Rc<RefCell<AdaptiveMedia>>>,
    texts: Vec<Rc<RefCell<GravityText>>>,
    motion_query: Option<ReducedMotionQuery>,
}

impl Site {
    pub fn mount(
        adaptive_config: AdaptiveConfig,
        effect_config: TextEffectConfig,
        level: AnimationLevel,
    ) -> Result<Rc<RefCell<Self>>, MarqueeError> {
        let window = web_sys::window().ok_or(MarqueeError::NoWindow)?;
        let document = window.document().ok_or(MarqueeError::NoDocument)?;

        let session = SessionProfile::new(adaptive_config.clone());
        let profile = session.get_or_probe(probe::read_device_signals);

        let site = Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            let target = weak.clone();
            let motion_query = ReducedMotionQuery::subscribe(&window, move |reduced| {
                if let Some(site) = target.upgrade() {
                    site.borrow_mut().on_os_preference(reduced);
                }
            });
            let os_reduced = motion_query
                .as_ref()
                .is_some_and(ReducedMotionQuery::matches);
            let gate = MotionGate::new(os_reduced, level);
            log::info!(
                "Motion gate: os_reduced={os_reduced} level={level:?} allows_motion={}",
                gate.allows_motion(&profile)
            );

            let media = find_media(&document)
                .into_iter()
                .map(|element| {
                    AdaptiveMedia::mount(
                        element,
                        &adaptive_config,
                        &profile,
                        gate.prefers_reduced_motion(),
                    )
                })
                .collect();
            let texts = find_gravity_containers(&document)
                .into_iter()
                .map(|container| {
                    GravityText::mount(
                        &window,
                        container,
                        &effect_config,
                        &adaptive_config,
                        gate.allows_motion(&profile),
                    )
                })
                .collect();

            RefCell::new(Self {
                session,
                gate,
                media,
                texts,
                motion_query,
            })
        });

        {
            let this = site.borrow();
            log::info!(
                "Mounted {} media element(s), {} gravity text(s)",
                this.media.len(),
                this.texts.len()
            );
        }
        Ok(site)
    }

    pub fn profile(&self) -> Option<DeviceProfile> {
        self.session.get()
    }

    pub fn set_animation_level(&mut self, level: AnimationLevel) {
        if let Some(reduced) = self.gate.set_animation_level(level) {
            self.propagate(reduced);
        }
    }

    /// Tear down every component and the media query subscription.
    pub fn unmount(&mut self) {
        self.motion_query = None;
        for media in self.media.drain(..) {
            media.borrow_mut().unmount();
        }
        for text in self.texts.drain(..) {
            text.borrow_mut().unmount();
        }
        log::info!("Site unmounted");
    }

    fn on_os_preference(&mut self, reduced: bool) {
        if let Some(reduced) = self.gate.set_os_preference(reduced) {
            self.propagate(reduced);
        }
    }

    fn propagate(&mut self, reduced: bool) {
        log::info!("Reduced motion now {reduced}");
        let allowed = self
            .session
            .get()
            .is_some_and(|profile| self.gate.allows_motion(&profile));
        for media in &self.media {
            media.borrow_mut().set_prefers_reduced_motion(reduced);
        }
        for text in &self.texts {
            text.borrow_mut().set_motion_allowed(allowed);
        }
    }
}
