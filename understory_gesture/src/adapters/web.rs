// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers for browser hosts built on `web-sys`.
//!
//! Two levels are offered:
//!
//! - [`attach`] binds every listener a [`Gestures`] coordinator needs to an
//!   element and the document body, applies the returned [`DefaultAction`] to
//!   each DOM event, and unbinds everything when the returned [`Listeners`] is
//!   dropped.
//! - The conversion functions ([`mouse_event`], [`touch_event`],
//!   [`native_gesture_event`], [`wheel_event`], [`legacy_wheel_event`]) for
//!   hosts that route DOM events themselves.
//!
//! Events are keyed by their [`EventTarget`].
//!
//! ## Bindings
//!
//! [`bindings`] computes the listener table from the coordinator's capability
//! and platform:
//!
//! | listener | scope | bound when |
//! |---|---|---|
//! | `mousedown`, `mousemove` | element | single-pointer callbacks |
//! | `mouseup` | body | single-pointer callbacks |
//! | `touchstart`, `touchmove` | element | single-pointer callbacks, or pinch/twist on the two-finger fallback |
//! | `touchend` | body | as above |
//! | `gesturestart`, `gesturechange`, `gestureend` (or the `msgesture*` family) | element | pinch/twist on the native platform |
//! | `mousewheel`, plus `DOMMouseScroll` on Firefox | element | pinch/twist |
//!
//! Releases are caught on the body so an interaction that leaves the element
//! still ends. A `touchend` on the element bubbles there too.
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_gesture::adapters::web;
//! use understory_gesture::config::GestureOptions;
//! use understory_gesture::gestures::Gestures;
//! use understory_gesture::multi::GesturePlatform;
//!
//! # fn mount(element: &web_sys::EventTarget) -> Result<web::Listeners, wasm_bindgen::JsValue> {
//! let zoom = Rc::new(RefCell::new(1.0));
//! let z = zoom.clone();
//! let options = GestureOptions::new().on_pinch(move |pinch, _| *z.borrow_mut() += pinch.scale);
//! let gestures = Gestures::new(options, GesturePlatform::detect())
//!     .map_err(|err| wasm_bindgen::JsValue::from_str(&err.to_string()))?;
//! // Keep the listeners alive for as long as the element should respond.
//! web::attach(element, Rc::new(RefCell::new(gestures)))
//! # }
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use js_sys::Reflect;
use kurbo::{Point, Vec2};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, MouseEvent, TouchEvent};

use crate::config::Capability;
use crate::event::{NativeGestureEvent, PointerEvent, TouchList, WheelEvent};
use crate::gestures::Gestures;
use crate::multi::GesturePlatform;
use crate::types::DefaultAction;

/// Which family of native gesture events the browser fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeEvents {
    /// WebKit's `gesturestart`, `gesturechange` and `gestureend`.
    WebKit,
    /// The prefixed `msgesturestart`, `msgesturechange` and `msgestureend`.
    Microsoft,
}

impl NativeEvents {
    /// Probe the current window: `ongesturestart` first, then `msgesturestart`.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let has = |key: &str| Reflect::has(&window, &JsValue::from_str(key)).unwrap_or(false);
        if has("ongesturestart") {
            Some(Self::WebKit)
        } else if has("msgesturestart") {
            Some(Self::Microsoft)
        } else {
            None
        }
    }

    /// Start, change and end event names.
    pub fn names(self) -> [&'static str; 3] {
        match self {
            Self::WebKit => ["gesturestart", "gesturechange", "gestureend"],
            Self::Microsoft => ["msgesturestart", "msgesturechange", "msgestureend"],
        }
    }
}

impl GesturePlatform {
    /// Probe the current browser window for native gesture events.
    ///
    /// Any [`NativeEvents`] family selects [`GesturePlatform::Native`]; anything
    /// else, including running outside a window, selects
    /// [`GesturePlatform::TwoFingerFallback`].
    pub fn detect() -> Self {
        if NativeEvents::detect().is_some() {
            Self::Native
        } else {
            Self::TwoFingerFallback
        }
    }
}

impl DefaultAction {
    /// Call `preventDefault` on the DOM event when this action says so.
    pub fn apply(self, event: &Event) {
        if self.is_prevented() {
            event.prevent_default();
        }
    }
}

/// Convert a DOM mouse event.
///
/// Returns `None` when the event has no target.
pub fn mouse_event(event: &MouseEvent) -> Option<PointerEvent<EventTarget>> {
    let target = event.target()?;
    let page = Point::new(f64::from(event.page_x()), f64::from(event.page_y()));
    let client = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
    let time = millis(event.time_stamp());
    let mut pointer = PointerEvent::client(target, client, scroll_offset(), time);
    pointer.page = Some(page);
    Some(pointer)
}

/// Convert a DOM touch event, carrying its active touches in page coordinates.
///
/// `touchend` events usually arrive with an empty touch list.
pub fn touch_event(event: &TouchEvent) -> Option<PointerEvent<EventTarget>> {
    let target = event.target()?;
    let list = event.touches();
    let touches: TouchList = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.page_x()), f64::from(t.page_y())))
        .collect();
    let time = millis(event.time_stamp());
    Some(PointerEvent::touch(target, touches, time).with_scroll(scroll_offset()))
}

/// Convert any DOM event that is a touch or mouse event.
pub fn pointer_event(event: &Event) -> Option<PointerEvent<EventTarget>> {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        touch_event(touch)
    } else {
        event.dyn_ref::<MouseEvent>().and_then(mouse_event)
    }
}

/// Convert a DOM wheel event.
///
/// The DOM's `deltaY` grows toward the user, so it is negated.
pub fn wheel_event(event: &web_sys::WheelEvent) -> Option<WheelEvent<EventTarget>> {
    let pointer = mouse_event(event)?;
    Some(WheelEvent::new(pointer, wheel_delta(event.delta_y())))
}

/// Convert a legacy `mousewheel` or `DOMMouseScroll` event.
///
/// `wheelDelta` is read when present and non-zero, otherwise `detail`.
pub fn legacy_wheel_event(event: &MouseEvent) -> Option<WheelEvent<EventTarget>> {
    let pointer = mouse_event(event)?;
    let wheel_delta = number(event, "wheelDelta").unwrap_or(0.0);
    let delta = legacy_wheel_delta(wheel_delta, f64::from(event.detail()));
    Some(WheelEvent::new(pointer, delta))
}

/// Convert a native `gesturestart`/`gesturechange`/`gestureend` event.
///
/// `web-sys` has no binding for these, so `scale`, `rotation` and the position
/// are read reflectively. Missing `scale` reads as `1.0` and missing `rotation`
/// as `0.0`.
pub fn native_gesture_event(event: &Event) -> Option<NativeGestureEvent<EventTarget>> {
    let target = event.target()?;
    let scale = number(event, "scale").unwrap_or(1.0);
    let rotation = number(event, "rotation").unwrap_or(0.0);
    let client = Point::new(
        number(event, "clientX").unwrap_or(0.0),
        number(event, "clientY").unwrap_or(0.0),
    );
    let time = millis(event.time_stamp());
    let mut pointer = PointerEvent::client(target, client, scroll_offset(), time);
    if let (Some(x), Some(y)) = (number(event, "pageX"), number(event, "pageY")) {
        pointer.page = Some(Point::new(x, y));
    }
    Some(NativeGestureEvent::new(pointer, scale, rotation))
}

/// Where a listener is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// The element passed to [`attach`].
    Element,
    /// `document.body`, falling back to the element when there is no body.
    Body,
}

/// Coordinator entry point a listener feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    /// [`Gestures::mouse_down`]
    MouseDown,
    /// [`Gestures::mouse_move`]
    MouseMove,
    /// [`Gestures::mouse_up`]
    MouseUp,
    /// [`Gestures::touch_start`]
    TouchStart,
    /// [`Gestures::touch_move`]
    TouchMove,
    /// [`Gestures::touch_end`]
    TouchEnd,
    /// [`Gestures::gesture_start`]
    GestureStart,
    /// [`Gestures::gesture_change`]
    GestureChange,
    /// [`Gestures::gesture_end`]
    GestureEnd,
    /// [`Gestures::wheel`], fed by [`legacy_wheel_event`].
    Wheel,
}

/// One DOM listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    /// Where the listener goes.
    pub scope: Scope,
    /// DOM event type.
    pub event: &'static str,
    /// Coordinator method it feeds.
    pub handler: Handler,
}

impl Binding {
    const fn new(scope: Scope, event: &'static str, handler: Handler) -> Self {
        Self {
            scope,
            event,
            handler,
        }
    }
}

/// The listeners a coordinator needs. See the [module docs](self).
///
/// `native` is the probed event family; the native platform without one binds
/// the WebKit names. `firefox` adds `DOMMouseScroll`.
pub fn bindings(
    capability: Capability,
    platform: GesturePlatform,
    native: Option<NativeEvents>,
    firefox: bool,
) -> Vec<Binding> {
    let single = capability.allow_single();
    let multi = capability.allow_multi();
    let mut out = Vec::new();
    if single {
        out.push(Binding::new(Scope::Element, "mousedown", Handler::MouseDown));
        out.push(Binding::new(Scope::Element, "mousemove", Handler::MouseMove));
        out.push(Binding::new(Scope::Body, "mouseup", Handler::MouseUp));
    }
    if single || (multi && platform == GesturePlatform::TwoFingerFallback) {
        out.push(Binding::new(Scope::Element, "touchstart", Handler::TouchStart));
        out.push(Binding::new(Scope::Element, "touchmove", Handler::TouchMove));
        out.push(Binding::new(Scope::Body, "touchend", Handler::TouchEnd));
    }
    if multi {
        out.push(Binding::new(Scope::Element, "mousewheel", Handler::Wheel));
        if firefox {
            out.push(Binding::new(Scope::Element, "DOMMouseScroll", Handler::Wheel));
        }
        if platform == GesturePlatform::Native {
            let [start, change, end] = native.unwrap_or(NativeEvents::WebKit).names();
            out.push(Binding::new(Scope::Element, start, Handler::GestureStart));
            out.push(Binding::new(Scope::Element, change, Handler::GestureChange));
            out.push(Binding::new(Scope::Element, end, Handler::GestureEnd));
        }
    }
    out
}

/// Registered listeners. Dropping this removes them.
pub struct Listeners {
    bound: Vec<Bound>,
}

struct Bound {
    target: EventTarget,
    binding: Binding,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listeners {
    /// The registrations in effect.
    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.bound.iter().map(|b| b.binding)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for b in self.bound.drain(..) {
            let callback = b.closure.as_ref().unchecked_ref();
            let _ = b.target.remove_event_listener_with_callback(b.binding.event, callback);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("bound", &self.bound.iter().map(|b| b.binding).collect::<Vec<_>>())
            .finish()
    }
}

/// Bind the coordinator to `element` following [`bindings`].
///
/// Every listener applies the coordinator's [`DefaultAction`] to its event.
/// Deliveries that arrive while the coordinator is already borrowed (a
/// callback dispatching DOM events synchronously) are dropped.
pub fn attach(
    element: &EventTarget,
    gestures: Rc<RefCell<Gestures<EventTarget>>>,
) -> Result<Listeners, JsValue> {
    let (capability, platform) = {
        let g = gestures.borrow();
        (g.capability(), g.platform())
    };
    let window = web_sys::window();
    let body = window
        .as_ref()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .map(EventTarget::from);
    let firefox = window
        .as_ref()
        .and_then(|w| w.navigator().user_agent().ok())
        .is_some_and(|ua| ua.to_ascii_lowercase().contains("firefox"));

    let mut listeners = Listeners { bound: Vec::new() };
    for binding in bindings(capability, platform, NativeEvents::detect(), firefox) {
        let target = match binding.scope {
            Scope::Element => element.clone(),
            Scope::Body => body.clone().unwrap_or_else(|| element.clone()),
        };
        let shared = gestures.clone();
        let handler = binding.handler;
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Ok(mut g) = shared.try_borrow_mut() else {
                return;
            };
            if let Some(action) = dispatch(&mut g, handler, &event) {
                action.apply(&event);
            }
        });
        let callback = closure.as_ref().unchecked_ref();
        target.add_event_listener_with_callback(binding.event, callback)?;
        listeners.bound.push(Bound {
            target,
            binding,
            closure,
        });
    }
    debug!(listeners = listeners.len(), ?platform, "gesture listeners attached");
    Ok(listeners)
}

fn dispatch(
    gestures: &mut Gestures<EventTarget>,
    handler: Handler,
    event: &Event,
) -> Option<DefaultAction> {
    Some(match handler {
        Handler::MouseDown => gestures.mouse_down(&mouse_event(event.dyn_ref()?)?),
        Handler::MouseMove => gestures.mouse_move(&mouse_event(event.dyn_ref()?)?),
        Handler::MouseUp => gestures.mouse_up(&mouse_event(event.dyn_ref()?)?),
        Handler::TouchStart => gestures.touch_start(&touch_event(event.dyn_ref()?)?),
        Handler::TouchMove => gestures.touch_move(&touch_event(event.dyn_ref()?)?),
        Handler::TouchEnd => gestures.touch_end(&touch_event(event.dyn_ref()?)?),
        Handler::GestureStart => gestures.gesture_start(&native_gesture_event(event)?),
        Handler::GestureChange => gestures.gesture_change(&native_gesture_event(event)?),
        Handler::GestureEnd => gestures.gesture_end(&native_gesture_event(event)?),
        Handler::Wheel => gestures.wheel(&legacy_wheel_event(event.dyn_ref()?)?),
    })
}

fn number(event: &Event, key: &str) -> Option<f64> {
    Reflect::get(event, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
}

fn scroll_offset() -> Vec2 {
    web_sys::window()
        .map(|w| Vec2::new(w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0)))
        .unwrap_or(Vec2::ZERO)
}

fn wheel_delta(delta_y: f64) -> f64 {
    -delta_y
}

/// `wheelDelta` comes in steps of 120 and `detail` in steps of 3 with the
/// opposite sign.
fn legacy_wheel_delta(wheel_delta: f64, detail: f64) -> f64 {
    if wheel_delta != 0.0 && !wheel_delta.is_nan() {
        wheel_delta / 120.0
    } else {
        -detail / 3.0
    }
}

/// DOM timestamps are fractional milliseconds; negative or NaN clamp to zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Sub-millisecond precision is not needed for tap timing."
)]
fn millis(time_stamp: f64) -> u64 {
    if time_stamp.is_finite() && time_stamp > 0.0 {
        time_stamp as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_delta_is_flipped_to_away_from_user() {
        assert_eq!(wheel_delta(120.0), -120.0);
        assert_eq!(wheel_delta(-3.0), 3.0);
    }

    #[test]
    fn legacy_wheel_prefers_wheel_delta_over_detail() {
        assert_eq!(legacy_wheel_delta(120.0, 0.0), 1.0);
        assert_eq!(legacy_wheel_delta(-240.0, 99.0), -2.0);
        // Firefox's DOMMouseScroll: negative detail is away from the user.
        assert_eq!(legacy_wheel_delta(0.0, -3.0), 1.0);
        assert_eq!(legacy_wheel_delta(f64::NAN, 6.0), -2.0);
    }

    fn events(table: &[Binding]) -> Vec<(Scope, &'static str, Handler)> {
        table.iter().map(|b| (b.scope, b.event, b.handler)).collect()
    }

    #[test]
    fn single_pointer_binds_mouse_and_touch_with_releases_on_body() {
        let table = bindings(Capability::SingleOnly, GesturePlatform::Native, None, true);
        assert_eq!(
            events(&table),
            [
                (Scope::Element, "mousedown", Handler::MouseDown),
                (Scope::Element, "mousemove", Handler::MouseMove),
                (Scope::Body, "mouseup", Handler::MouseUp),
                (Scope::Element, "touchstart", Handler::TouchStart),
                (Scope::Element, "touchmove", Handler::TouchMove),
                (Scope::Body, "touchend", Handler::TouchEnd),
            ]
        );
    }

    #[test]
    fn native_multi_touch_binds_the_probed_gesture_family() {
        let table = bindings(
            Capability::MultiOnly,
            GesturePlatform::Native,
            Some(NativeEvents::Microsoft),
            true,
        );
        assert_eq!(
            events(&table),
            [
                (Scope::Element, "mousewheel", Handler::Wheel),
                (Scope::Element, "DOMMouseScroll", Handler::Wheel),
                (Scope::Element, "msgesturestart", Handler::GestureStart),
                (Scope::Element, "msgesturechange", Handler::GestureChange),
                (Scope::Element, "msgestureend", Handler::GestureEnd),
            ]
        );

        // A host forcing the native platform without a probe gets WebKit names.
        let table = bindings(Capability::MultiOnly, GesturePlatform::Native, None, false);
        assert!(table.iter().any(|b| b.event == "gesturestart"));
        assert!(!table.iter().any(|b| b.event == "DOMMouseScroll"));
    }

    #[test]
    fn fallback_multi_touch_binds_raw_touches_instead_of_gestures() {
        let table = bindings(
            Capability::MultiOnly,
            GesturePlatform::TwoFingerFallback,
            Some(NativeEvents::WebKit),
            false,
        );
        assert_eq!(
            events(&table),
            [
                (Scope::Element, "touchstart", Handler::TouchStart),
                (Scope::Element, "touchmove", Handler::TouchMove),
                (Scope::Body, "touchend", Handler::TouchEnd),
                (Scope::Element, "mousewheel", Handler::Wheel),
            ]
        );
    }

    #[test]
    fn both_trackers_share_one_set_of_touch_listeners() {
        let table = bindings(Capability::Both, GesturePlatform::TwoFingerFallback, None, false);
        let touchstarts = table.iter().filter(|b| b.event == "touchstart").count();
        assert_eq!(touchstarts, 1);
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn nothing_is_bound_without_callbacks() {
        assert!(bindings(Capability::Neither, GesturePlatform::Native, None, true).is_empty());
    }

    #[test]
    fn native_family_names() {
        assert_eq!(NativeEvents::WebKit.names()[0], "gesturestart");
        assert_eq!(NativeEvents::Microsoft.names()[2], "msgestureend");
    }

    #[test]
    fn timestamps_truncate_to_whole_milliseconds() {
        assert_eq!(millis(1234.9), 1234);
        assert_eq!(millis(0.0), 0);
        assert_eq!(millis(-5.0), 0);
        assert_eq!(millis(f64::NAN), 0);
    }
}
