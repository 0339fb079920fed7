use serde::{Deserialize, Serialize};

use crate::lifecycle::{IntersectionHost, ObserverHandle};

/// Distance in CSS pixels before the viewport edge at which an element
/// counts as visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RootMargin(pub u32);

impl RootMargin {
    /// CSS `rootMargin` string, e.g. `"100px"`.
    pub fn to_css(self) -> String {
        format!("{}px", self.0)
    }
}

/// Which kind of media an observer serves. Background media pre-triggers
/// further out than foreground media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaLayer {
    #[default]
    Foreground,
    Background,
}

impl MediaLayer {
    /// Parse the `data-layer` attribute. Anything but `background` is foreground.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("background") => MediaLayer::Background,
            _ => MediaLayer::Foreground,
        }
    }
}

/// Per-element visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Unobserved,
    Offscreen,
    Onscreen,
}

/// A change between offscreen and onscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTransition {
    Entered,
    Left,
}

/// Turns raw intersection reports into de-duplicated transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityTracker {
    state: VisibilityState,
}

impl VisibilityTracker {
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Feed one intersection report. The first "not intersecting" report
    /// after registration only establishes the baseline and yields nothing.
    pub fn report(&mut self, intersecting: bool) -> Option<VisibilityTransition> {
        let next = if intersecting {
            VisibilityState::Onscreen
        } else {
            VisibilityState::Offscreen
        };
        let previous = std::mem::replace(&mut self.state, next);
        if previous == next {
            None
        } else if intersecting {
            Some(VisibilityTransition::Entered)
        } else if previous == VisibilityState::Onscreen {
            Some(VisibilityTransition::Left)
        } else {
            None
        }
    }
}

struct Registration<T> {
    handle: ObserverHandle,
    target: T,
    margin: RootMargin,
    tracker: VisibilityTracker,
}

/// Owns the intersection registrations of one component.
///
/// At most one registration per target. Every registration is released on
/// [`ViewportActivation::dispose`], [`ViewportActivation::dispose_all`] or drop.
pub struct ViewportActivation<H: IntersectionHost> {
    host: H,
    registrations: Vec<Registration<H::Target>>,
}

impl<H> ViewportActivation<H>
where
    H: IntersectionHost,
    H::Target: Clone + PartialEq,
{
    pub fn new(host: H) -> Self {
        Self {
            host,
            registrations: Vec::new(),
        }
    }

    /// Register `target` with `margin`. Re-registering a target returns its
    /// existing handle. Host refusal is a silent `None`; callers retry on
    /// their next render.
    pub fn register(&mut self, target: &H::Target, margin: RootMargin) -> Option<ObserverHandle> {
        if let Some(existing) = self.registrations.iter().find(|r| r.target == *target) {
            return Some(existing.handle);
        }
        let Some(handle) = self.host.observe(target, margin) else {
            log::debug!(
                "Intersection registration refused (margin {})",
                margin.to_css()
            );
            return None;
        };
        self.registrations.push(Registration {
            handle,
            target: target.clone(),
            margin,
            tracker: VisibilityTracker::default(),
        });
        Some(handle)
    }

    /// Route a host report to its registration. Reports for disposed or
    /// unknown handles are ignored.
    pub fn on_intersection(
        &mut self,
        handle: ObserverHandle,
        intersecting: bool,
    ) -> Option<VisibilityTransition> {
        self.registrations
            .iter_mut()
            .find(|r| r.handle == handle)
            .and_then(|r| r.tracker.report(intersecting))
    }

    pub fn state(&self, handle: ObserverHandle) -> VisibilityState {
        self.registrations
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.tracker.state())
            .unwrap_or_default()
    }

    pub fn margin(&self, handle: ObserverHandle) -> Option<RootMargin> {
        self.registrations
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.margin)
    }

    /// Release one registration.
    pub fn dispose(&mut self, handle: ObserverHandle) {
        if let Some(idx) = self.registrations.iter().position(|r| r.handle == handle) {
            let reg = self.registrations.swap_remove(idx);
            self.host.unobserve(reg.handle);
        }
    }

    /// Release every registration.
    pub fn dispose_all(&mut self) {
        for reg in self.registrations.drain(..) {
            self.host.unobserve(reg.handle);
        }
    }

    /// Number of live registrations.
    pub fn pending(&self) -> usize {
        self.registrations.len()
    }
}

impl<H: IntersectionHost> Drop for ViewportActivation<H> {
    fn drop(&mut self) {
        for reg in self.registrations.drain(..) {
            self.host.unobserve(reg.handle);
        }
    }
}
