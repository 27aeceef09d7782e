// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture coordinator: one handler per host event, callbacks out.
//!
//! [`Gestures`] owns a validated [`GestureConfig`], the trackers its callbacks
//! need, and the runtime controls (pause, default-action policy). Hosts call
//! the handler matching each native event and apply the returned
//! [`DefaultAction`].
//!
//! | host event        | single-pointer tracker        | multi-touch tracker                    |
//! |-------------------|-------------------------------|----------------------------------------|
//! | [`mouse_down`]    | start, then move              | -                                      |
//! | [`mouse_move`]    | move                          | -                                      |
//! | [`mouse_up`]      | end                           | -                                      |
//! | [`touch_start`]   | start, then move              | two-finger start, then change          |
//! | [`touch_move`]    | move                          | two-finger change                      |
//! | [`touch_end`]     | end                           | two-finger end                         |
//! | [`gesture_start`] | -                             | native start, then change              |
//! | [`gesture_change`]| -                             | native change                          |
//! | [`gesture_end`]   | -                             | native end                             |
//! | [`wheel`]         | -                             | discrete pinch                         |
//!
//! Because a press runs "start, then move", every interaction opens with a
//! zero-length drag (and every native gesture with a zero pinch and twist).
//!
//! ## Pausing
//!
//! While paused, new interactions do not start. An interaction that is
//! already in flight keeps reporting drags and is still classified on
//! release; pausing never cuts a gesture short. Wheel ticks are not starts and
//! are reported regardless.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Point;
//! use understory_gesture::config::GestureOptions;
//! use understory_gesture::event::PointerEvent;
//! use understory_gesture::gestures::Gestures;
//! use understory_gesture::multi::GesturePlatform;
//! use understory_gesture::types::DefaultAction;
//!
//! let swiped = Rc::new(RefCell::new(Vec::new()));
//! let sink = swiped.clone();
//! let options = GestureOptions::new().on_swipe_right(move |swipe, _| {
//!     sink.borrow_mut().push(swipe.distance);
//! });
//! let mut gestures = Gestures::new(options, GesturePlatform::TwoFingerFallback).unwrap();
//!
//! let _ = gestures.mouse_down(&PointerEvent::mouse("photo", Point::new(0.0, 0.0), 0));
//! let action = gestures.mouse_move(&PointerEvent::mouse("photo", Point::new(120.0, 4.0), 16));
//! assert_eq!(action, DefaultAction::Prevent);
//! let _ = gestures.mouse_up(&PointerEvent::mouse("photo", Point::new(120.0, 4.0), 32));
//!
//! assert_eq!(*swiped.borrow(), [120.0]);
//! ```
//!
//! [`mouse_down`]: Gestures::mouse_down
//! [`mouse_move`]: Gestures::mouse_move
//! [`mouse_up`]: Gestures::mouse_up
//! [`touch_start`]: Gestures::touch_start
//! [`touch_move`]: Gestures::touch_move
//! [`touch_end`]: Gestures::touch_end
//! [`gesture_start`]: Gestures::gesture_start
//! [`gesture_change`]: Gestures::gesture_change
//! [`gesture_end`]: Gestures::gesture_end
//! [`wheel`]: Gestures::wheel

use tracing::{debug, trace};

use crate::config::{Capability, ConfigError, GestureConfig, GestureOptions};
use crate::event::{NativeGestureEvent, PointerEvent, WheelEvent};
use crate::multi::{GesturePlatform, MultiTouchTracker};
use crate::single::SingleTouchTracker;
use crate::types::{DefaultAction, Release, SwipeDirection};

/// Normalizes mouse, touch, native gesture and wheel input into gesture callbacks.
#[derive(Debug)]
pub struct Gestures<K> {
    config: GestureConfig<K>,
    platform: GesturePlatform,
    paused: bool,
    cancel_touch: bool,
    cancel_gesture: bool,
    single: Option<SingleTouchTracker<K>>,
    multi: Option<MultiTouchTracker<K>>,
}

impl<K: Clone> Gestures<K> {
    /// Validate `options` and build the trackers its callbacks need.
    ///
    /// `platform` is the host's two-point gesture support, probed once.
    pub fn new(options: GestureOptions<K>, platform: GesturePlatform) -> Result<Self, ConfigError> {
        Ok(Self::from_config(GestureConfig::new(options)?, platform))
    }

    /// Build the trackers required by an already validated configuration.
    pub fn from_config(config: GestureConfig<K>, platform: GesturePlatform) -> Self {
        let capability = config.capability();
        let single = capability
            .allow_single()
            .then(|| SingleTouchTracker::new(config.threshold(), config.double_tap_window()));
        let multi = capability
            .allow_multi()
            .then(|| MultiTouchTracker::new(platform, config.increment()));
        debug!(?capability, ?platform, "gesture coordinator ready");
        Self {
            platform,
            paused: false,
            cancel_touch: config.cancel_touch(),
            cancel_gesture: config.cancel_gesture(),
            single,
            multi,
            config,
        }
    }

    // --- mouse ---

    /// Handle a mouse press.
    pub fn mouse_down(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        self.start_single(event);
        DefaultAction::Allow
    }

    /// Handle mouse movement.
    pub fn mouse_move(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        decided("mouse_move", self.move_single(event))
    }

    /// Handle a mouse release.
    pub fn mouse_up(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        self.end_single(event);
        DefaultAction::Allow
    }

    // --- touch ---

    /// Handle a touch start.
    pub fn touch_start(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        self.start_single(event);
        if let Some(multi) = self.multi.as_mut() {
            if self.platform == GesturePlatform::TwoFingerFallback {
                if self.paused {
                    trace!("two-finger start ignored while paused");
                } else {
                    multi.touch_start(event);
                }
                self.change_pair(event);
            }
        }
        DefaultAction::Allow
    }

    /// Handle touch movement.
    pub fn touch_move(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        let action = self.move_single(event);
        if self.multi.is_none() || self.platform != GesturePlatform::TwoFingerFallback {
            return decided("touch_move", action);
        }
        self.change_pair(event);
        decided("touch_move", action.or(DefaultAction::prevent_if(self.cancel_gesture)))
    }

    /// Handle a touch end.
    pub fn touch_end(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        self.end_single(event);
        if let Some(multi) = self.multi.as_mut() {
            multi.touch_end();
        }
        DefaultAction::Allow
    }

    // --- native gestures ---

    /// Handle a native gesture start.
    pub fn gesture_start(&mut self, event: &NativeGestureEvent<K>) -> DefaultAction {
        if !self.listens_for_native() {
            return DefaultAction::Allow;
        }
        if let Some(multi) = self.multi.as_mut() {
            if self.paused {
                trace!("native gesture start ignored while paused");
            } else {
                multi.gesture_start(event);
            }
        }
        self.change_native(event);
        decided("gesture_start", DefaultAction::prevent_if(self.cancel_gesture))
    }

    /// Handle a native gesture change.
    pub fn gesture_change(&mut self, event: &NativeGestureEvent<K>) -> DefaultAction {
        if !self.listens_for_native() {
            return DefaultAction::Allow;
        }
        self.change_native(event);
        decided("gesture_change", DefaultAction::prevent_if(self.cancel_gesture))
    }

    /// Handle a native gesture end.
    pub fn gesture_end(&mut self, _event: &NativeGestureEvent<K>) -> DefaultAction {
        if let Some(multi) = self.multi.as_mut() {
            multi.gesture_end();
        }
        DefaultAction::Allow
    }

    // --- wheel ---

    /// Handle a mouse-wheel tick as a discrete pinch.
    pub fn wheel(&mut self, event: &WheelEvent<K>) -> DefaultAction {
        let Some(multi) = self.multi.as_ref() else {
            return DefaultAction::Allow;
        };
        let pinch = multi.wheel(event);
        trace!(scale = pinch.scale, "wheel pinch");
        self.config.callbacks.pinch(&pinch, &event.pointer);
        decided("wheel", DefaultAction::prevent_if(self.cancel_gesture))
    }

    // --- runtime controls ---

    /// Stop new interactions from starting. Interactions in flight continue.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Allow new interactions to start again.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether new interactions are currently blocked.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Let the host's default pointer-move handling run (no `preventDefault`).
    pub fn enable_default_touch(&mut self) {
        self.cancel_touch = false;
    }

    /// Suppress the host's default pointer-move handling.
    pub fn disable_default_touch(&mut self) {
        self.cancel_touch = true;
    }

    /// Let the host's default gesture and wheel handling run.
    pub fn enable_default_gesture(&mut self) {
        self.cancel_gesture = false;
    }

    /// Suppress the host's default gesture and wheel handling.
    pub fn disable_default_gesture(&mut self) {
        self.cancel_gesture = true;
    }

    /// Whether pointer moves currently suppress the host default.
    pub fn cancels_touch(&self) -> bool {
        self.cancel_touch
    }

    /// Whether gesture and wheel events currently suppress the host default.
    pub fn cancels_gesture(&self) -> bool {
        self.cancel_gesture
    }

    // --- accessors ---

    /// The validated configuration.
    pub fn config(&self) -> &GestureConfig<K> {
        &self.config
    }

    /// Which trackers are running.
    pub fn capability(&self) -> Capability {
        self.config.capability()
    }

    /// The two-point gesture platform selected at construction.
    pub fn platform(&self) -> GesturePlatform {
        self.platform
    }

    /// The single-pointer tracker, if any single-pointer callback was supplied.
    pub fn single(&self) -> Option<&SingleTouchTracker<K>> {
        self.single.as_ref()
    }

    /// The multi-touch tracker, if a pinch or twist callback was supplied.
    pub fn multi(&self) -> Option<&MultiTouchTracker<K>> {
        self.multi.as_ref()
    }

    // --- internals ---

    fn start_single(&mut self, event: &PointerEvent<K>) {
        let Some(single) = self.single.as_mut() else {
            return;
        };
        if self.paused {
            trace!("pointer start ignored while paused");
        } else {
            single.start(event.target.clone(), event.point());
        }
        let _ = self.move_single(event);
    }

    fn move_single(&mut self, event: &PointerEvent<K>) -> DefaultAction {
        let Some(single) = self.single.as_mut() else {
            return DefaultAction::Allow;
        };
        if let Some(drag) = single.on_move(event.point()) {
            self.config.callbacks.drag(&drag, event);
        }
        DefaultAction::prevent_if(self.cancel_touch)
    }

    fn end_single(&mut self, event: &PointerEvent<K>) {
        let Some(single) = self.single.as_mut() else {
            return;
        };
        if let Some(release) = single.end(event.timestamp) {
            trace!(kind = release_kind(&release), "single-pointer release classified");
            self.config.callbacks.release(&release, event);
        }
    }

    fn change_pair(&mut self, event: &PointerEvent<K>) {
        let Some(multi) = self.multi.as_mut() else {
            return;
        };
        if let Some(pinch) = multi.touch_change(event) {
            self.config.callbacks.pinch(&pinch, event);
        }
    }

    fn change_native(&mut self, event: &NativeGestureEvent<K>) {
        let Some(multi) = self.multi.as_mut() else {
            return;
        };
        if let Some((pinch, twist)) = multi.gesture_change(event) {
            self.config.callbacks.pinch(&pinch, &event.pointer);
            self.config.callbacks.twist(&twist, &event.pointer);
        }
    }

    fn listens_for_native(&self) -> bool {
        self.multi.is_some() && self.platform == GesturePlatform::Native
    }
}

fn decided(handler: &'static str, action: DefaultAction) -> DefaultAction {
    trace!(handler, prevented = action.is_prevented(), "default action decided");
    action
}

fn release_kind<K>(release: &Release<K>) -> &'static str {
    match release {
        Release::DoubleTap(_) => "double_tap",
        Release::Swipe(swipe) => match swipe.direction {
            SwipeDirection::Up => "swipe_up",
            SwipeDirection::Down => "swipe_down",
            SwipeDirection::Left => "swipe_left",
            SwipeDirection::Right => "swipe_right",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;

    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use std::sync::Mutex;

    use tracing::field::{Field, Visit};
    use tracing::{Metadata, Subscriber, span};

    use kurbo::Point;

    use crate::types::{DoubleTap, Drag, Pinch, Swipe, Twist};

    #[derive(Clone, Debug, PartialEq)]
    enum Seen {
        Drag(f64, f64),
        Swipe(SwipeDirection, f64),
        DoubleTap(Point),
        Pinch(f64),
        Twist(f64),
    }

    type Log = Rc<RefCell<Vec<Seen>>>;

    fn record<T: 'static>(
        log: &Log,
        f: fn(&T) -> Seen,
    ) -> impl FnMut(&T, &PointerEvent<u32>) + 'static {
        let log = log.clone();
        move |payload: &T, _: &PointerEvent<u32>| log.borrow_mut().push(f(payload))
    }

    fn single_options(log: &Log) -> GestureOptions<u32> {
        GestureOptions::new()
            .on_drag(record(log, |d: &Drag<u32>| Seen::Drag(d.horizontal, d.vertical)))
            .on_swipe_up(record(log, |s: &Swipe<u32>| Seen::Swipe(s.direction, s.distance)))
            .on_swipe_down(record(log, |s: &Swipe<u32>| Seen::Swipe(s.direction, s.distance)))
            .on_swipe_left(record(log, |s: &Swipe<u32>| Seen::Swipe(s.direction, s.distance)))
            .on_swipe_right(record(log, |s: &Swipe<u32>| Seen::Swipe(s.direction, s.distance)))
            .on_double_tap(record(log, |t: &DoubleTap<u32>| Seen::DoubleTap(t.origin)))
    }

    fn multi_options(log: &Log) -> GestureOptions<u32> {
        GestureOptions::new()
            .on_pinch(record(log, |p: &Pinch<u32>| Seen::Pinch(p.scale)))
            .on_twist(record(log, |t: &Twist<u32>| Seen::Twist(t.rotation)))
    }

    fn build(options: GestureOptions<u32>, platform: GesturePlatform) -> Gestures<u32> {
        Gestures::new(options, platform).unwrap()
    }

    fn mouse(x: f64, y: f64, t: u64) -> PointerEvent<u32> {
        PointerEvent::mouse(1, Point::new(x, y), t)
    }

    fn touches(points: &[(f64, f64)], t: u64) -> PointerEvent<u32> {
        PointerEvent::touch(1, points.iter().map(|&(x, y)| Point::new(x, y)), t)
    }

    fn gesture(scale: f64, rotation: f64) -> NativeGestureEvent<u32> {
        NativeGestureEvent::new(mouse(50.0, 50.0, 0), scale, rotation)
    }

    fn wheel(delta: f64) -> WheelEvent<u32> {
        WheelEvent::new(mouse(10.0, 10.0, 0), delta)
    }

    fn drain(log: &Log) -> Vec<Seen> {
        log.borrow_mut().drain(..).collect()
    }

    #[test]
    fn capability_selects_trackers() {
        let log = Log::default();

        let g = build(GestureOptions::new().on_drag(|_, _| {}), GesturePlatform::Native);
        assert_eq!(g.capability(), Capability::SingleOnly);
        assert!(g.single().is_some());
        assert!(g.multi().is_none());

        let g = build(multi_options(&log), GesturePlatform::Native);
        assert_eq!(g.capability(), Capability::MultiOnly);
        assert!(g.single().is_none());
        assert_eq!(g.multi().map(|m| m.platform()), Some(GesturePlatform::Native));

        let mut g = build(GestureOptions::new(), GesturePlatform::TwoFingerFallback);
        assert_eq!(g.capability(), Capability::Neither);
        // Nothing is listening, so nothing is prevented.
        assert_eq!(g.mouse_move(&mouse(1.0, 1.0, 0)), DefaultAction::Allow);
        assert_eq!(g.wheel(&wheel(1.0)), DefaultAction::Allow);
        assert_eq!(g.touch_move(&touches(&[(0.0, 0.0)], 0)), DefaultAction::Allow);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = Gestures::<u32>::new(
            GestureOptions::new().threshold(-1.0),
            GesturePlatform::Native,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidThreshold(-1.0));
    }

    #[test]
    fn press_opens_with_zero_drag_then_incremental_steps() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        let _ = g.mouse_down(&mouse(0.0, 0.0, 0));
        let _ = g.mouse_move(&mouse(10.0, 0.0, 10));
        let _ = g.mouse_move(&mouse(25.0, 0.0, 20));

        assert_eq!(
            drain(&log),
            [Seen::Drag(0.0, 0.0), Seen::Drag(10.0, 0.0), Seen::Drag(15.0, 0.0)]
        );
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        let _ = g.mouse_move(&mouse(10.0, 0.0, 10));
        let _ = g.mouse_up(&mouse(200.0, 0.0, 20));
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn release_reports_one_swipe() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        let _ = g.touch_start(&touches(&[(200.0, 100.0)], 0));
        let _ = g.touch_move(&touches(&[(120.0, 110.0)], 10));
        let _ = g.touch_end(&touches(&[], 20));

        assert_eq!(
            drain(&log),
            [
                Seen::Drag(0.0, 0.0),
                Seen::Drag(-80.0, 10.0),
                Seen::Swipe(SwipeDirection::Left, 80.0),
            ]
        );
    }

    #[test]
    fn second_quick_tap_is_a_double_tap() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        let _ = g.mouse_down(&mouse(30.0, 30.0, 0));
        let _ = g.mouse_up(&mouse(30.0, 30.0, 10));
        let _ = g.mouse_down(&mouse(32.0, 28.0, 100));
        let _ = g.mouse_up(&mouse(32.0, 28.0, 160));

        let seen = drain(&log);
        assert_eq!(seen.last(), Some(&Seen::DoubleTap(Point::new(32.0, 28.0))));
        assert!(!seen.iter().any(|s| matches!(s, Seen::Swipe(..))));
    }

    #[test]
    fn pause_before_start_suppresses_interaction() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        g.pause();
        assert!(g.is_paused());
        let _ = g.mouse_down(&mouse(0.0, 0.0, 0));
        let _ = g.mouse_move(&mouse(100.0, 0.0, 10));
        let _ = g.mouse_up(&mouse(100.0, 0.0, 20));

        assert!(drain(&log).is_empty());
        assert!(!g.single().unwrap().is_active());
        assert!(g.single().unwrap().last_touch().is_none());
    }

    #[test]
    fn pause_during_interaction_lets_it_finish() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        let _ = g.mouse_down(&mouse(0.0, 0.0, 0));
        g.pause();
        let _ = g.mouse_move(&mouse(0.0, 70.0, 10));
        let _ = g.mouse_up(&mouse(0.0, 70.0, 20));

        assert_eq!(
            drain(&log),
            [
                Seen::Drag(0.0, 0.0),
                Seen::Drag(0.0, 70.0),
                Seen::Swipe(SwipeDirection::Down, 70.0),
            ]
        );

        // The next interaction is blocked until resumed.
        let _ = g.mouse_down(&mouse(0.0, 0.0, 1000));
        assert!(drain(&log).is_empty());
        g.resume();
        let _ = g.mouse_down(&mouse(0.0, 0.0, 2000));
        assert_eq!(drain(&log), [Seen::Drag(0.0, 0.0)]);
    }

    #[test]
    fn second_release_is_a_noop() {
        let log = Log::default();
        let mut g = build(single_options(&log), GesturePlatform::TwoFingerFallback);

        let _ = g.mouse_down(&mouse(0.0, 0.0, 0));
        let _ = g.mouse_move(&mouse(0.0, -90.0, 10));
        let _ = g.mouse_up(&mouse(0.0, -90.0, 20));
        assert_eq!(drain(&log).last(), Some(&Seen::Swipe(SwipeDirection::Up, 90.0)));

        let _ = g.mouse_up(&mouse(0.0, -90.0, 200));
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn default_touch_toggle_is_live() {
        let mut g = build(GestureOptions::new().on_drag(|_, _| {}), GesturePlatform::Native);

        assert!(g.cancels_touch());
        assert_eq!(g.mouse_move(&mouse(0.0, 0.0, 0)), DefaultAction::Prevent);
        g.enable_default_touch();
        assert_eq!(g.mouse_move(&mouse(0.0, 0.0, 0)), DefaultAction::Allow);
        g.disable_default_touch();
        assert_eq!(g.touch_move(&touches(&[(0.0, 0.0)], 0)), DefaultAction::Prevent);
        // Presses and releases never prevent.
        assert_eq!(g.mouse_down(&mouse(0.0, 0.0, 0)), DefaultAction::Allow);
        assert_eq!(g.mouse_up(&mouse(0.0, 0.0, 0)), DefaultAction::Allow);
    }

    #[test]
    fn configured_cancel_flags_seed_runtime_policy() {
        let options = GestureOptions::new()
            .cancel_touch(false)
            .on_drag(|_, _| {})
            .on_pinch(|_, _| {});
        let mut g = build(options, GesturePlatform::TwoFingerFallback);
        assert!(!g.cancels_touch());
        assert!(g.cancels_gesture());

        // The two-finger listener still prevents on touch moves.
        assert_eq!(g.touch_move(&touches(&[(0.0, 0.0)], 0)), DefaultAction::Prevent);
        g.enable_default_gesture();
        assert_eq!(g.touch_move(&touches(&[(0.0, 0.0)], 0)), DefaultAction::Allow);
    }

    #[test]
    fn wheel_ticks_are_discrete_pinches() {
        let log = Log::default();
        let mut g = build(
            multi_options(&log).increment(0.25),
            GesturePlatform::TwoFingerFallback,
        );

        assert_eq!(g.wheel(&wheel(120.0)), DefaultAction::Prevent);
        assert_eq!(g.wheel(&wheel(-120.0)), DefaultAction::Prevent);
        g.enable_default_gesture();
        assert_eq!(g.wheel(&wheel(3.0)), DefaultAction::Allow);

        // Pausing does not affect the wheel.
        g.pause();
        let _ = g.wheel(&wheel(-1.0));

        assert_eq!(
            drain(&log),
            [
                Seen::Pinch(0.25),
                Seen::Pinch(-0.25),
                Seen::Pinch(0.25),
                Seen::Pinch(-0.25),
            ]
        );
    }

    #[test]
    fn native_gesture_reports_pinch_and_twist() {
        let log = Log::default();
        let mut g = build(multi_options(&log), GesturePlatform::Native);

        assert_eq!(g.gesture_start(&gesture(1.0, 0.0)), DefaultAction::Prevent);
        let _ = g.gesture_change(&gesture(1.5, 30.0));
        let _ = g.gesture_change(&gesture(1.25, 45.0));
        let _ = g.gesture_end(&gesture(1.25, 45.0));
        let _ = g.gesture_change(&gesture(3.0, 90.0));

        assert_eq!(
            drain(&log),
            [
                Seen::Pinch(0.0),
                Seen::Twist(0.0),
                Seen::Pinch(0.5),
                Seen::Twist(30.0),
                Seen::Pinch(-0.25),
                Seen::Twist(15.0),
            ]
        );
    }

    #[test]
    fn native_platform_ignores_two_finger_touches() {
        let log = Log::default();
        let mut g = build(multi_options(&log), GesturePlatform::Native);

        let _ = g.touch_start(&touches(&[(0.0, 0.0), (100.0, 0.0)], 0));
        let action = g.touch_move(&touches(&[(-50.0, 0.0), (150.0, 0.0)], 10));
        let _ = g.touch_end(&touches(&[], 20));

        assert_eq!(action, DefaultAction::Allow);
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn fallback_platform_pinches_from_two_touches() {
        let log = Log::default();
        let mut g = build(multi_options(&log), GesturePlatform::TwoFingerFallback);

        // Native gesture events are not listened to on this platform.
        assert_eq!(g.gesture_start(&gesture(1.0, 0.0)), DefaultAction::Allow);

        let _ = g.touch_start(&touches(&[(0.0, 0.0), (100.0, 100.0)], 0));
        assert_eq!(
            g.touch_move(&touches(&[(-50.0, -50.0), (150.0, 150.0)], 10)),
            DefaultAction::Prevent
        );
        let _ = g.touch_move(&touches(&[(0.0, 0.0), (100.0, 100.0)], 20));
        let _ = g.touch_end(&touches(&[], 30));
        let _ = g.touch_move(&touches(&[(0.0, 0.0), (300.0, 300.0)], 40));

        assert_eq!(drain(&log), [Seen::Pinch(0.0), Seen::Pinch(2.0), Seen::Pinch(-1.0)]);
    }

    #[test]
    fn pause_blocks_new_multi_touch_gestures() {
        let log = Log::default();
        let mut g = build(multi_options(&log), GesturePlatform::Native);

        g.pause();
        let _ = g.gesture_start(&gesture(1.0, 0.0));
        let _ = g.gesture_change(&gesture(2.0, 10.0));
        assert!(drain(&log).is_empty());
        assert!(!g.multi().unwrap().is_active());

        g.resume();
        let _ = g.gesture_start(&gesture(1.0, 0.0));
        g.pause();
        let _ = g.gesture_change(&gesture(2.0, 10.0));
        assert_eq!(
            drain(&log),
            [Seen::Pinch(0.0), Seen::Twist(0.0), Seen::Pinch(1.0), Seen::Twist(10.0)]
        );
    }

    #[test]
    fn pause_blocks_new_two_finger_pinches() {
        let log = Log::default();
        let mut g = build(multi_options(&log), GesturePlatform::TwoFingerFallback);

        g.pause();
        let _ = g.touch_start(&touches(&[(0.0, 0.0), (100.0, 0.0)], 0));
        let _ = g.touch_move(&touches(&[(-50.0, 0.0), (150.0, 0.0)], 16));
        assert!(drain(&log).is_empty());
        assert!(!g.multi().unwrap().is_active());

        // A pinch that started before the pause runs to completion.
        g.resume();
        let _ = g.touch_start(&touches(&[(0.0, 0.0), (100.0, 0.0)], 100));
        g.pause();
        let _ = g.touch_move(&touches(&[(-50.0, 0.0), (150.0, 0.0)], 116));
        let _ = g.touch_end(&touches(&[], 132));
        assert_eq!(drain(&log), [Seen::Pinch(0.0), Seen::Pinch(1.0)]);
        assert!(!g.multi().unwrap().is_active());
    }

    #[test]
    fn default_action_decisions_are_traced() {
        let decisions = Arc::new(Mutex::new(Vec::new()));
        tracing::subscriber::with_default(Decisions(decisions.clone()), || {
            let log = Log::default();
            let mut g = build(single_options(&log), GesturePlatform::Native);
            let _ = g.mouse_down(&mouse(0.0, 0.0, 0));
            let _ = g.mouse_move(&mouse(5.0, 0.0, 10));
            g.enable_default_touch();
            let _ = g.mouse_move(&mouse(9.0, 0.0, 20));
        });
        assert_eq!(
            *decisions.lock().unwrap(),
            [
                (String::from("mouse_move"), true),
                (String::from("mouse_move"), false),
            ]
        );
    }

    /// Collects `(handler, prevented)` pairs from default-action traces.
    struct Decisions(Arc<Mutex<Vec<(String, bool)>>>);

    #[derive(Default)]
    struct DecisionFields {
        handler: Option<String>,
        prevented: Option<bool>,
    }

    impl Visit for DecisionFields {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "handler" {
                self.handler = Some(value.into());
            }
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            if field.name() == "prevented" {
                self.prevented = Some(value);
            }
        }

        fn record_debug(&mut self, _: &Field, _: &dyn core::fmt::Debug) {}
    }

    impl Subscriber for Decisions {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            let mut fields = DecisionFields::default();
            event.record(&mut fields);
            if let (Some(handler), Some(prevented)) = (fields.handler, fields.prevented) {
                self.0.lock().unwrap().push((handler, prevented));
            }
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    #[test]
    fn twist_only_options_leave_pinch_silent() {
        let log = Log::default();
        let options = GestureOptions::new()
            .on_twist(record(&log, |t: &Twist<u32>| Seen::Twist(t.rotation)));
        let mut g = build(options, GesturePlatform::Native);

        let _ = g.gesture_start(&gesture(1.0, 0.0));
        let _ = g.gesture_change(&gesture(2.0, 5.0));
        let _ = g.wheel(&wheel(1.0));

        assert_eq!(drain(&log), [Seen::Twist(0.0), Seen::Twist(5.0)]);
    }
}
