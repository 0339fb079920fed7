//! Browser bindings for the adaptive rendering core.

mod events;
pub mod gravity_text;
pub mod media;
pub mod motion;
pub mod observer;
pub mod probe;
pub mod scheduler;
pub mod site;

use std::cell::RefCell;
use std::rc::Rc;

use marquee_core::config::AdaptiveConfig;
use marquee_core::motion::AnimationLevel;
use marquee_physics::config::TextEffectConfig;
use wasm_bindgen::prelude::*;

use crate::site::Site;

const ADAPTIVE_CONFIG_RON: &str = include_str!("../assets/adaptive.ron");
const GRAVITY_TEXT_CONFIG_RON: &str = include_str!("../assets/gravity_text.ron");

/// WASM entry point. Sets the panic hook and initializes logging.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Marquee starting...");
}

fn load_adaptive_config() -> AdaptiveConfig {
    AdaptiveConfig::from_ron_str(ADAPTIVE_CONFIG_RON).unwrap_or_else(|e| {
        log::error!("{e}; using built-in defaults");
        AdaptiveConfig::default()
    })
}

fn load_effect_config() -> TextEffectConfig {
    TextEffectConfig::from_ron_str(GRAVITY_TEXT_CONFIG_RON).unwrap_or_else(|e| {
        log::error!("{e}; using built-in defaults");
        TextEffectConfig::default()
    })
}

/// Handle returned to the page script.
#[wasm_bindgen]
pub struct MarqueeSite {
    site: Option<Rc<RefCell<Site>>>,
    level: AnimationLevel,
}

#[wasm_bindgen]
impl MarqueeSite {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            site: None,
            level: AnimationLevel::default(),
        }
    }

    /// Probe the device, bind media and gravity text, subscribe to the
    /// reduced-motion query. Mounting twice is a no-op.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.site.is_some() {
            log::debug!("Site already mounted");
            return Ok(());
        }
        match Site::mount(load_adaptive_config(), load_effect_config(), self.level) {
            Ok(site) => {
                self.site = Some(site);
                Ok(())
            }
            Err(e) => {
                log::error!("Mount failed: {e}");
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    pub fn unmount(&mut self) {
        if let Some(site) = self.site.take() {
            site.borrow_mut().unmount();
        }
    }

    /// Accepts `full`, `reduced` or `off`.
    #[wasm_bindgen(js_name = setAnimationLevel)]
    pub fn set_animation_level(&mut self, level: &str) -> Result<(), JsValue> {
        let level = level
            .parse::<AnimationLevel>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.level = level;
        if let Some(site) = &self.site {
            site.borrow_mut().set_animation_level(level);
        }
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = isLowEnd)]
    pub fn is_low_end(&self) -> bool {
        self.site
            .as_ref()
            .and_then(|site| site.borrow().profile())
            .is_some_and(|profile| profile.is_low_end)
    }
}

impl Default for MarqueeSite {
    fn default() -> Self {
        Self::new()
    }
}
