// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture configuration: partial options in, validated configuration out.
//!
//! Callers describe what they want with [`GestureOptions`], setting only the
//! fields and callbacks they care about. [`GestureConfig::new`] fills in the
//! defaults, validates the numeric fields and derives the [`Capability`] that
//! decides which trackers the coordinator builds.
//!
//! | field                 | default                                  |
//! |-----------------------|------------------------------------------|
//! | `threshold`           | 50.0 px                                  |
//! | `increment`           | 0.1                                      |
//! | `cancel_touch`        | `true`                                   |
//! | `cancel_gesture`      | `true`                                   |
//! | `double_tap_window`   | [`DoubleTapWindow::default`]             |
//! | callbacks             | no-op                                    |
//!
//! ```
//! use understory_gesture::config::{Capability, GestureConfig, GestureOptions};
//!
//! let options = GestureOptions::<u32>::new()
//!     .threshold(30.0)
//!     .on_swipe_left(|swipe, _event| assert!(swipe.distance > 30.0));
//! let config = GestureConfig::new(options).unwrap();
//!
//! assert_eq!(config.threshold(), 30.0);
//! assert_eq!(config.increment(), 0.1);
//! assert_eq!(config.capability(), Capability::SingleOnly);
//! ```

use alloc::boxed::Box;
use core::fmt;

use crate::event::PointerEvent;
use crate::types::{DoubleTap, Drag, Pinch, Release, Swipe, SwipeDirection, Twist};

/// Default swipe distance in pixels.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Default wheel-driven zoom step.
pub const DEFAULT_INCREMENT: f64 = 0.1;

/// A gesture callback: the recognized payload and the event that completed it.
pub type Callback<T, K> = Box<dyn FnMut(&T, &PointerEvent<K>)>;

/// Errors raised while normalizing [`GestureOptions`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The swipe threshold must be finite and strictly positive.
    #[error("swipe threshold must be finite and positive, got {0}")]
    InvalidThreshold(f64),
    /// The wheel increment must be finite and strictly positive.
    #[error("wheel increment must be finite and positive, got {0}")]
    InvalidIncrement(f64),
    /// The double-tap radius must be finite and strictly positive.
    #[error("double-tap radius must be finite and positive, got {0}")]
    InvalidDoubleTapRadius(f64),
    /// The double-tap interval bounds must satisfy `min < max`.
    #[error("double-tap interval is empty: {min}ms..{max}ms")]
    EmptyDoubleTapInterval {
        /// Lower bound, exclusive, in milliseconds.
        min: u64,
        /// Upper bound, exclusive, in milliseconds.
        max: u64,
    },
}

/// Spatial and temporal tolerance for recognizing a double tap.
///
/// A tap is a double tap when it starts less than `radius` away from the
/// previous tap on both axes, and the time between the previous release and
/// this release lies strictly between `min_interval` and `max_interval`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleTapWindow {
    /// Per-axis distance in pixels, exclusive.
    pub radius: f64,
    /// Shortest accepted interval in milliseconds, exclusive.
    pub min_interval: u64,
    /// Longest accepted interval in milliseconds, exclusive.
    pub max_interval: u64,
}

impl Default for DoubleTapWindow {
    fn default() -> Self {
        Self {
            radius: 10.0,
            min_interval: 100,
            max_interval: 500,
        }
    }
}

impl DoubleTapWindow {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidDoubleTapRadius(self.radius));
        }
        if self.min_interval >= self.max_interval {
            return Err(ConfigError::EmptyDoubleTapInterval {
                min: self.min_interval,
                max: self.max_interval,
            });
        }
        Ok(())
    }
}

bitflags::bitflags! {
    /// Callback slots supplied by the caller.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GestureKinds: u8 {
        /// `drag`
        const DRAG        = 0b0000_0001;
        /// `swipe_up`
        const SWIPE_UP    = 0b0000_0010;
        /// `swipe_down`
        const SWIPE_DOWN  = 0b0000_0100;
        /// `swipe_left`
        const SWIPE_LEFT  = 0b0000_1000;
        /// `swipe_right`
        const SWIPE_RIGHT = 0b0001_0000;
        /// `double_tap`
        const DOUBLE_TAP  = 0b0010_0000;
        /// `pinch`
        const PINCH       = 0b0100_0000;
        /// `twist`
        const TWIST       = 0b1000_0000;
        /// Anything recognized by the single-pointer tracker.
        const SINGLE = Self::DRAG.bits()
            | Self::SWIPE_UP.bits()
            | Self::SWIPE_DOWN.bits()
            | Self::SWIPE_LEFT.bits()
            | Self::SWIPE_RIGHT.bits()
            | Self::DOUBLE_TAP.bits();
        /// Anything recognized by the multi-touch tracker.
        const MULTI = Self::PINCH.bits() | Self::TWIST.bits();
    }
}

/// Which trackers a coordinator runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// No callbacks were supplied; every event is ignored.
    Neither,
    /// Only single-pointer callbacks were supplied.
    SingleOnly,
    /// Only pinch/twist callbacks were supplied.
    MultiOnly,
    /// Both kinds were supplied.
    Both,
}

impl Capability {
    /// Derive the capability from the supplied callback slots.
    pub fn from_kinds(kinds: GestureKinds) -> Self {
        match (kinds.intersects(GestureKinds::SINGLE), kinds.intersects(GestureKinds::MULTI)) {
            (false, false) => Self::Neither,
            (true, false) => Self::SingleOnly,
            (false, true) => Self::MultiOnly,
            (true, true) => Self::Both,
        }
    }

    /// Whether the single-pointer tracker runs.
    pub const fn allow_single(self) -> bool {
        matches!(self, Self::SingleOnly | Self::Both)
    }

    /// Whether the multi-touch tracker runs.
    pub const fn allow_multi(self) -> bool {
        matches!(self, Self::MultiOnly | Self::Both)
    }
}

/// Partial, caller-supplied gesture options.
///
/// Every field is optional; see the [module docs](self) for defaults.
pub struct GestureOptions<K> {
    /// Minimum travel in pixels for a release to count as a swipe.
    pub threshold: Option<f64>,
    /// Zoom step reported for each wheel tick.
    pub increment: Option<f64>,
    /// Suppress the host's default handling of pointer moves.
    pub cancel_touch: Option<bool>,
    /// Suppress the host's default handling of gesture and wheel events.
    pub cancel_gesture: Option<bool>,
    /// Double-tap tolerance.
    pub double_tap_window: Option<DoubleTapWindow>,
    /// Callback slots.
    pub callbacks: Callbacks<K>,
}

impl<K> GestureOptions<K> {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self {
            threshold: None,
            increment: None,
            cancel_touch: None,
            cancel_gesture: None,
            double_tap_window: None,
            callbacks: Callbacks::new(),
        }
    }

    /// Set the swipe threshold in pixels.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the wheel zoom step.
    pub fn increment(mut self, increment: f64) -> Self {
        self.increment = Some(increment);
        self
    }

    /// Set whether pointer moves suppress the host default.
    pub fn cancel_touch(mut self, cancel: bool) -> Self {
        self.cancel_touch = Some(cancel);
        self
    }

    /// Set whether gesture and wheel events suppress the host default.
    pub fn cancel_gesture(mut self, cancel: bool) -> Self {
        self.cancel_gesture = Some(cancel);
        self
    }

    /// Set the double-tap tolerance.
    pub fn double_tap_window(mut self, window: DoubleTapWindow) -> Self {
        self.double_tap_window = Some(window);
        self
    }

    /// Handle incremental drags.
    pub fn on_drag(mut self, f: impl FnMut(&Drag<K>, &PointerEvent<K>) + 'static) -> Self {
        self.callbacks.drag = Some(Box::new(f));
        self
    }

    /// Handle upward swipes.
    pub fn on_swipe_up(mut self, f: impl FnMut(&Swipe<K>, &PointerEvent<K>) + 'static) -> Self {
        self.callbacks.swipe_up = Some(Box::new(f));
        self
    }

    /// Handle downward swipes.
    pub fn on_swipe_down(mut self, f: impl FnMut(&Swipe<K>, &PointerEvent<K>) + 'static) -> Self {
        self.callbacks.swipe_down = Some(Box::new(f));
        self
    }

    /// Handle leftward swipes.
    pub fn on_swipe_left(mut self, f: impl FnMut(&Swipe<K>, &PointerEvent<K>) + 'static) -> Self {
        self.callbacks.swipe_left = Some(Box::new(f));
        self
    }

    /// Handle rightward swipes.
    pub fn on_swipe_right(
        mut self,
        f: impl FnMut(&Swipe<K>, &PointerEvent<K>) + 'static,
    ) -> Self {
        self.callbacks.swipe_right = Some(Box::new(f));
        self
    }

    /// Handle double taps.
    pub fn on_double_tap(
        mut self,
        f: impl FnMut(&DoubleTap<K>, &PointerEvent<K>) + 'static,
    ) -> Self {
        self.callbacks.double_tap = Some(Box::new(f));
        self
    }

    /// Handle incremental zoom steps from gestures, two-finger touches and the wheel.
    pub fn on_pinch(mut self, f: impl FnMut(&Pinch<K>, &PointerEvent<K>) + 'static) -> Self {
        self.callbacks.pinch = Some(Box::new(f));
        self
    }

    /// Handle incremental rotation steps from native gestures.
    pub fn on_twist(mut self, f: impl FnMut(&Twist<K>, &PointerEvent<K>) + 'static) -> Self {
        self.callbacks.twist = Some(Box::new(f));
        self
    }
}

impl<K> Default for GestureOptions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for GestureOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureOptions")
            .field("threshold", &self.threshold)
            .field("increment", &self.increment)
            .field("cancel_touch", &self.cancel_touch)
            .field("cancel_gesture", &self.cancel_gesture)
            .field("double_tap_window", &self.double_tap_window)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

/// Callback slots. An empty slot behaves as a no-op.
pub struct Callbacks<K> {
    drag: Option<Callback<Drag<K>, K>>,
    swipe_up: Option<Callback<Swipe<K>, K>>,
    swipe_down: Option<Callback<Swipe<K>, K>>,
    swipe_left: Option<Callback<Swipe<K>, K>>,
    swipe_right: Option<Callback<Swipe<K>, K>>,
    double_tap: Option<Callback<DoubleTap<K>, K>>,
    pinch: Option<Callback<Pinch<K>, K>>,
    twist: Option<Callback<Twist<K>, K>>,
}

impl<K> Callbacks<K> {
    /// All slots empty.
    pub fn new() -> Self {
        Self {
            drag: None,
            swipe_up: None,
            swipe_down: None,
            swipe_left: None,
            swipe_right: None,
            double_tap: None,
            pinch: None,
            twist: None,
        }
    }

    /// The slots that hold a callback.
    pub fn kinds(&self) -> GestureKinds {
        let mut kinds = GestureKinds::empty();
        kinds.set(GestureKinds::DRAG, self.drag.is_some());
        kinds.set(GestureKinds::SWIPE_UP, self.swipe_up.is_some());
        kinds.set(GestureKinds::SWIPE_DOWN, self.swipe_down.is_some());
        kinds.set(GestureKinds::SWIPE_LEFT, self.swipe_left.is_some());
        kinds.set(GestureKinds::SWIPE_RIGHT, self.swipe_right.is_some());
        kinds.set(GestureKinds::DOUBLE_TAP, self.double_tap.is_some());
        kinds.set(GestureKinds::PINCH, self.pinch.is_some());
        kinds.set(GestureKinds::TWIST, self.twist.is_some());
        kinds
    }

    pub(crate) fn drag(&mut self, drag: &Drag<K>, event: &PointerEvent<K>) {
        if let Some(f) = self.drag.as_mut() {
            f(drag, event);
        }
    }

    pub(crate) fn release(&mut self, release: &Release<K>, event: &PointerEvent<K>) {
        match release {
            Release::DoubleTap(tap) => {
                if let Some(f) = self.double_tap.as_mut() {
                    f(tap, event);
                }
            }
            Release::Swipe(swipe) => {
                let slot = match swipe.direction {
                    SwipeDirection::Up => &mut self.swipe_up,
                    SwipeDirection::Down => &mut self.swipe_down,
                    SwipeDirection::Left => &mut self.swipe_left,
                    SwipeDirection::Right => &mut self.swipe_right,
                };
                if let Some(f) = slot.as_mut() {
                    f(swipe, event);
                }
            }
        }
    }

    pub(crate) fn pinch(&mut self, pinch: &Pinch<K>, event: &PointerEvent<K>) {
        if let Some(f) = self.pinch.as_mut() {
            f(pinch, event);
        }
    }

    pub(crate) fn twist(&mut self, twist: &Twist<K>, event: &PointerEvent<K>) {
        if let Some(f) = self.twist.as_mut() {
            f(twist, event);
        }
    }
}

impl<K> Default for Callbacks<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Callbacks<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("kinds", &self.kinds())
            .finish_non_exhaustive()
    }
}

/// Validated gesture configuration.
///
/// Numeric settings are fixed at construction. The default-action policy is
/// only the initial value; [`Gestures`](crate::gestures::Gestures) can toggle
/// it at runtime.
pub struct GestureConfig<K> {
    threshold: f64,
    increment: f64,
    cancel_touch: bool,
    cancel_gesture: bool,
    double_tap_window: DoubleTapWindow,
    kinds: GestureKinds,
    pub(crate) callbacks: Callbacks<K>,
}

impl<K> GestureConfig<K> {
    /// Apply defaults to `options` and validate them.
    pub fn new(options: GestureOptions<K>) -> Result<Self, ConfigError> {
        let threshold = options.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        let increment = options.increment.unwrap_or(DEFAULT_INCREMENT);
        if !(increment.is_finite() && increment > 0.0) {
            return Err(ConfigError::InvalidIncrement(increment));
        }
        let double_tap_window = options.double_tap_window.unwrap_or_default();
        double_tap_window.validate()?;

        Ok(Self {
            threshold,
            increment,
            cancel_touch: options.cancel_touch.unwrap_or(true),
            cancel_gesture: options.cancel_gesture.unwrap_or(true),
            double_tap_window,
            kinds: options.callbacks.kinds(),
            callbacks: options.callbacks,
        })
    }

    /// Minimum release distance for a swipe, in pixels.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Zoom step per wheel tick.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Initial pointer-move default-action policy.
    pub fn cancel_touch(&self) -> bool {
        self.cancel_touch
    }

    /// Initial gesture/wheel default-action policy.
    pub fn cancel_gesture(&self) -> bool {
        self.cancel_gesture
    }

    /// Double-tap tolerance.
    pub fn double_tap_window(&self) -> DoubleTapWindow {
        self.double_tap_window
    }

    /// Callback slots supplied by the caller.
    pub fn kinds(&self) -> GestureKinds {
        self.kinds
    }

    /// Trackers required by the supplied callbacks.
    pub fn capability(&self) -> Capability {
        Capability::from_kinds(self.kinds)
    }
}

impl<K> fmt::Debug for GestureConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureConfig")
            .field("threshold", &self.threshold)
            .field("increment", &self.increment)
            .field("cancel_touch", &self.cancel_touch)
            .field("cancel_gesture", &self.cancel_gesture)
            .field("double_tap_window", &self.double_tap_window)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}
