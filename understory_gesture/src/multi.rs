// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-touch gesture recognition: pinch and twist.
//!
//! Hosts deliver two-point gestures in one of two shapes, chosen once per
//! platform ([`GesturePlatform`]):
//!
//! - **Native**: the platform recognizes the gesture itself and reports a
//!   cumulative `scale` and `rotation` ([`NativeGestureEvent`]). The
//!   [`NativeGestureTracker`] turns these into incremental [`Pinch`] and
//!   [`Twist`] steps.
//! - **Two-finger fallback**: only raw touches are available. The
//!   [`TwoFingerTracker`] derives a pinch step from how the separation between
//!   exactly two touches changes. No rotation is reported on this path.
//!
//! Independently of the platform, a mouse-wheel tick is a discrete pinch of
//! plus or minus the configured increment (see [`wheel_pinch`]).
//!
//! [`MultiTouchTracker`] bundles the selected backend with the wheel
//! increment and ignores input meant for the other backend.
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::event::PointerEvent;
//! use understory_gesture::multi::{GesturePlatform, MultiTouchTracker};
//!
//! let mut multi: MultiTouchTracker<u32> =
//!     MultiTouchTracker::new(GesturePlatform::TwoFingerFallback, 0.1);
//!
//! let down = PointerEvent::touch(1, [Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 0);
//! assert!(multi.touch_start(&down));
//!
//! // Fingers spread apart: positive scale.
//! let spread = PointerEvent::touch(1, [Point::new(-10.0, 0.0), Point::new(110.0, 0.0)], 16);
//! let pinch = multi.touch_change(&spread).unwrap();
//! assert!(pinch.scale > 0.0);
//! ```

use kurbo::Point;

use crate::event::{NativeGestureEvent, PointerEvent, WheelEvent};
use crate::types::{Pinch, Twist};

/// How the host reports two-point gestures.
///
/// Selected once when the coordinator is built, never per event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePlatform {
    /// The host emits gesture start/change/end events with `scale` and `rotation`.
    Native,
    /// The host only emits touches; pinch is derived from two of them.
    #[default]
    TwoFingerFallback,
}

/// Scale and rotation as last reported by a native gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRotation {
    /// Cumulative scale.
    pub scale: f64,
    /// Cumulative rotation.
    pub rotation: f64,
}

/// Start state of a native gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeOrigin<K> {
    /// Scale and rotation at gesture start.
    pub sample: ScaleRotation,
    /// Element the gesture started on.
    pub target: K,
}

/// Turns cumulative native gesture samples into incremental steps.
#[derive(Clone, Debug)]
pub struct NativeGestureTracker<K> {
    origin: Option<NativeOrigin<K>>,
    progression: Option<ScaleRotation>,
}

impl<K: Clone> NativeGestureTracker<K> {
    /// An idle tracker.
    pub fn new() -> Self {
        Self {
            origin: None,
            progression: None,
        }
    }

    /// Begin a gesture.
    pub fn start(&mut self, event: &NativeGestureEvent<K>) {
        let sample = ScaleRotation {
            scale: event.scale,
            rotation: event.rotation,
        };
        self.origin = Some(NativeOrigin {
            sample,
            target: event.pointer.target.clone(),
        });
        self.progression = Some(sample);
    }

    /// Report the pinch and twist steps since the previous sample.
    pub fn change(&mut self, event: &NativeGestureEvent<K>) -> Option<(Pinch<K>, Twist<K>)> {
        let origin = self.origin.as_ref()?;
        let previous = self.progression.unwrap_or(origin.sample);
        let position = event.pointer.point();
        let pinch = Pinch {
            position,
            scale: event.scale - previous.scale,
            target: origin.target.clone(),
        };
        let twist = Twist {
            position,
            rotation: event.rotation - previous.rotation,
            target: origin.target.clone(),
        };
        self.progression = Some(ScaleRotation {
            scale: event.scale,
            rotation: event.rotation,
        });
        Some((pinch, twist))
    }

    /// End the gesture. Safe to call when idle.
    pub fn end(&mut self) {
        self.origin = None;
        self.progression = None;
    }

    /// The active gesture's start state.
    pub fn origin(&self) -> Option<&NativeOrigin<K>> {
        self.origin.as_ref()
    }

    /// The most recent sample of the active gesture.
    pub fn progression(&self) -> Option<ScaleRotation> {
        self.progression
    }
}

impl<K: Clone> Default for NativeGestureTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Start state of a two-finger gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchPairOrigin<K> {
    /// Both touches at gesture start, in page coordinates.
    pub touches: [Point; 2],
    /// Element the gesture started on.
    pub target: K,
}

/// Derives pinch steps from exactly two raw touches.
#[derive(Clone, Debug)]
pub struct TwoFingerTracker<K> {
    origin: Option<TouchPairOrigin<K>>,
    progression: Option<[Point; 2]>,
}

impl<K: Clone> TwoFingerTracker<K> {
    /// An idle tracker.
    pub fn new() -> Self {
        Self {
            origin: None,
            progression: None,
        }
    }

    /// Begin a gesture if the event carries exactly two touches.
    ///
    /// Returns `true` if a gesture started.
    pub fn start(&mut self, event: &PointerEvent<K>) -> bool {
        let Some(touches) = touch_pair(event) else {
            return false;
        };
        self.origin = Some(TouchPairOrigin {
            touches,
            target: event.target.clone(),
        });
        self.progression = Some(touches);
        true
    }

    /// Report the pinch step since the previous sample.
    ///
    /// Ignored unless a gesture is active and the event still carries exactly
    /// two touches.
    pub fn change(&mut self, event: &PointerEvent<K>) -> Option<Pinch<K>> {
        let origin = self.origin.as_ref()?;
        let current = touch_pair(event)?;
        let previous = self.progression.unwrap_or(origin.touches);
        let pinch = Pinch {
            position: event.point(),
            scale: pair_scale(previous, current),
            target: origin.target.clone(),
        };
        self.progression = Some(current);
        Some(pinch)
    }

    /// End the gesture. Safe to call when idle.
    pub fn end(&mut self) {
        self.origin = None;
        self.progression = None;
    }

    /// The active gesture's start state.
    pub fn origin(&self) -> Option<&TouchPairOrigin<K>> {
        self.origin.as_ref()
    }

    /// The most recent pair of touches of the active gesture.
    pub fn progression(&self) -> Option<[Point; 2]> {
        self.progression
    }
}

impl<K: Clone> Default for TwoFingerTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn touch_pair<K>(event: &PointerEvent<K>) -> Option<[Point; 2]> {
    match event.touches.as_slice() {
        [a, b] => Some([*a, *b]),
        _ => None,
    }
}

/// Scale step between two samples of a two-finger gesture.
///
/// Sums the per-axis ratios of the current to the previous finger separation
/// and subtracts 2, so an unchanged separation yields `0.0`, spreading yields
/// a positive value and pinching a negative one. An axis whose previous
/// separation is zero contributes the neutral ratio `1.0`.
///
/// Two touches that start on the same point therefore report `0.0` for their
/// first spread; later samples measure against the separation reached.
pub fn pair_scale(previous: [Point; 2], current: [Point; 2]) -> f64 {
    let before = previous[0] - previous[1];
    let after = current[0] - current[1];
    axis_ratio(after.x, before.x) + axis_ratio(after.y, before.y) - 2.0
}

fn axis_ratio(after: f64, before: f64) -> f64 {
    if before == 0.0 { 1.0 } else { after / before }
}

/// Translate a wheel tick into a discrete pinch of `±increment`.
///
/// Wheeling away from the user zooms in; anything else, including a zero
/// delta, zooms out.
pub fn wheel_pinch<K: Clone>(event: &WheelEvent<K>, increment: f64) -> Pinch<K> {
    Pinch {
        position: event.pointer.point(),
        scale: if event.delta > 0.0 {
            increment
        } else {
            -increment
        },
        target: event.pointer.target.clone(),
    }
}

#[derive(Clone, Debug)]
enum Backend<K> {
    Native(NativeGestureTracker<K>),
    TwoFinger(TwoFingerTracker<K>),
}

/// Pinch/twist recognition for one platform, plus wheel zoom.
#[derive(Clone, Debug)]
pub struct MultiTouchTracker<K> {
    backend: Backend<K>,
    increment: f64,
}

impl<K: Clone> MultiTouchTracker<K> {
    /// Create a tracker for `platform`. `increment` is the wheel zoom step.
    pub fn new(platform: GesturePlatform, increment: f64) -> Self {
        let backend = match platform {
            GesturePlatform::Native => Backend::Native(NativeGestureTracker::new()),
            GesturePlatform::TwoFingerFallback => Backend::TwoFinger(TwoFingerTracker::new()),
        };
        Self { backend, increment }
    }

    /// The platform this tracker was built for.
    pub fn platform(&self) -> GesturePlatform {
        match self.backend {
            Backend::Native(_) => GesturePlatform::Native,
            Backend::TwoFinger(_) => GesturePlatform::TwoFingerFallback,
        }
    }

    /// Wheel zoom step.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Begin a native gesture. Returns `false` on the fallback platform.
    pub fn gesture_start(&mut self, event: &NativeGestureEvent<K>) -> bool {
        match &mut self.backend {
            Backend::Native(native) => {
                native.start(event);
                true
            }
            Backend::TwoFinger(_) => false,
        }
    }

    /// Report native pinch and twist steps.
    pub fn gesture_change(&mut self, event: &NativeGestureEvent<K>) -> Option<(Pinch<K>, Twist<K>)> {
        match &mut self.backend {
            Backend::Native(native) => native.change(event),
            Backend::TwoFinger(_) => None,
        }
    }

    /// End a native gesture.
    pub fn gesture_end(&mut self) {
        if let Backend::Native(native) = &mut self.backend {
            native.end();
        }
    }

    /// Begin a two-finger gesture. Returns `false` on the native platform or
    /// when the event does not carry exactly two touches.
    pub fn touch_start(&mut self, event: &PointerEvent<K>) -> bool {
        match &mut self.backend {
            Backend::TwoFinger(pair) => pair.start(event),
            Backend::Native(_) => false,
        }
    }

    /// Report a two-finger pinch step.
    pub fn touch_change(&mut self, event: &PointerEvent<K>) -> Option<Pinch<K>> {
        match &mut self.backend {
            Backend::TwoFinger(pair) => pair.change(event),
            Backend::Native(_) => None,
        }
    }

    /// End a two-finger gesture.
    pub fn touch_end(&mut self) {
        if let Backend::TwoFinger(pair) = &mut self.backend {
            pair.end();
        }
    }

    /// Translate a wheel tick into a pinch step.
    pub fn wheel(&self, event: &WheelEvent<K>) -> Pinch<K> {
        wheel_pinch(event, self.increment)
    }

    /// Whether a gesture is in progress on either backend.
    pub fn is_active(&self) -> bool {
        match &self.backend {
            Backend::Native(native) => native.origin().is_some(),
            Backend::TwoFinger(pair) => pair.origin().is_some(),
        }
    }

    /// Element the active gesture started on.
    pub fn active_target(&self) -> Option<&K> {
        match &self.backend {
            Backend::Native(native) => native.origin().map(|o| &o.target),
            Backend::TwoFinger(pair) => pair.origin().map(|o| &o.target),
        }
    }
}
