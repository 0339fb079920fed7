//! Host seams for work that must be torn down on unmount.
//!
//! The web crate implements these over `IntersectionObserver` and
//! `requestAnimationFrame`; tests implement them with counters so that
//! "nothing left pending after unmount" can be asserted directly.

use crate::visibility::RootMargin;

/// Opaque id of a host intersection registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u32);

/// Opaque id of a scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Viewport intersection reporting.
pub trait IntersectionHost {
    /// The element type being observed.
    type Target;

    /// Start observing `target`, pre-triggering `margin` pixels before it
    /// reaches the viewport. Returns `None` if the host could not register
    /// (e.g. the element is not in the document yet).
    fn observe(&mut self, target: &Self::Target, margin: RootMargin) -> Option<ObserverHandle>;

    /// Stop observing. Must tolerate handles whose element was already removed.
    fn unobserve(&mut self, handle: ObserverHandle);
}

/// Per-frame callback scheduling (one outstanding frame at a time).
pub trait FrameScheduler {
    /// Ask for the frame callback to run before the next repaint.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a frame that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}
