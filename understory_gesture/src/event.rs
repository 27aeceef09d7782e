// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input events and coordinate extraction.
//!
//! Hosts translate their native input (DOM mouse/touch/gesture/wheel events,
//! windowing-system callbacks, synthetic test input) into the small event model
//! in this module before handing it to [`Gestures`](crate::gestures::Gestures).
//!
//! ## Coordinate extraction
//!
//! [`read_point`] turns a [`PointerEvent`] into a single page-space [`Point`].
//! The first matching source wins:
//!
//! 1. The first entry of the active touch list.
//! 2. The event's page coordinates.
//! 3. The client coordinates plus the document scroll offset the host sampled
//!    when it built the event.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_gesture::event::PointerEvent;
//!
//! // A legacy mouse event that only knows its client position.
//! let ev = PointerEvent::client(7_u32, Point::new(10.0, 20.0), Vec2::new(0.0, 300.0), 0);
//! assert_eq!(ev.point(), Point::new(10.0, 320.0));
//!
//! // Touch lists take precedence over everything else.
//! let ev = PointerEvent::touch(7_u32, [Point::new(1.0, 2.0), Point::new(3.0, 4.0)], 0)
//!     .with_page(Point::new(99.0, 99.0));
//! assert_eq!(ev.point(), Point::new(1.0, 2.0));
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Active touches carried by a [`PointerEvent`].
///
/// Two inline slots cover single-finger and pinch input without allocating.
pub type TouchList = SmallVec<[Point; 2]>;

/// A mouse or touch event in the host's page coordinate space.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<K> {
    /// Element the event was dispatched to.
    pub target: K,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
    /// Active touches, in page coordinates. Empty for mouse input.
    pub touches: TouchList,
    /// Page coordinates, when the host provides them directly.
    pub page: Option<Point>,
    /// Client (viewport) coordinates.
    pub client: Point,
    /// Document scroll offset at the time the event was built.
    pub scroll: Vec2,
}

impl<K> PointerEvent<K> {
    /// A mouse-like event carrying page coordinates.
    ///
    /// The client position is derived as `page` with no scroll offset.
    pub fn mouse(target: K, page: Point, timestamp: u64) -> Self {
        Self {
            target,
            timestamp,
            touches: TouchList::new(),
            page: Some(page),
            client: page,
            scroll: Vec2::ZERO,
        }
    }

    /// A legacy event that only carries client coordinates.
    pub fn client(target: K, client: Point, scroll: Vec2, timestamp: u64) -> Self {
        Self {
            target,
            timestamp,
            touches: TouchList::new(),
            page: None,
            client,
            scroll,
        }
    }

    /// A touch event with the given active touches (page coordinates).
    ///
    /// Touch-end events typically carry an empty list.
    pub fn touch(target: K, touches: impl IntoIterator<Item = Point>, timestamp: u64) -> Self {
        let touches: TouchList = touches.into_iter().collect();
        let client = touches.first().copied().unwrap_or(Point::ZERO);
        Self {
            target,
            timestamp,
            touches,
            page: None,
            client,
            scroll: Vec2::ZERO,
        }
    }

    /// Set the page coordinates.
    pub fn with_page(mut self, page: Point) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the document scroll offset.
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    /// Number of active touches.
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// The event position in page coordinates. See [`read_point`].
    pub fn point(&self) -> Point {
        read_point(self)
    }
}

/// A platform pinch/rotate gesture event (for example WebKit's `GestureEvent`).
#[derive(Clone, Debug, PartialEq)]
pub struct NativeGestureEvent<K> {
    /// Pointer part of the event: target, time and position.
    pub pointer: PointerEvent<K>,
    /// Cumulative scale reported by the platform since the gesture began.
    pub scale: f64,
    /// Cumulative rotation in degrees reported by the platform.
    pub rotation: f64,
}

impl<K> NativeGestureEvent<K> {
    /// Wrap a pointer event with the platform's scale and rotation.
    pub fn new(pointer: PointerEvent<K>, scale: f64, rotation: f64) -> Self {
        Self {
            pointer,
            scale,
            rotation,
        }
    }
}

/// A single mouse-wheel tick.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelEvent<K> {
    /// Pointer part of the event: target, time and position.
    pub pointer: PointerEvent<K>,
    /// Wheel movement; positive when the wheel turns away from the user.
    ///
    /// Hosts using the DOM `deltaY` convention (positive toward the user)
    /// should negate it.
    pub delta: f64,
}

impl<K> WheelEvent<K> {
    /// Wrap a pointer event with a wheel delta.
    pub fn new(pointer: PointerEvent<K>, delta: f64) -> Self {
        Self { pointer, delta }
    }
}

/// Extract the page-space position of an event.
pub fn read_point<K>(event: &PointerEvent<K>) -> Point {
    if let Some(first) = event.touches.first() {
        *first
    } else if let Some(page) = event.page {
        page
    } else {
        event.client + event.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_list_wins_over_page_coordinates() {
        let ev = PointerEvent::touch(1_u32, [Point::new(5.0, 6.0)], 0)
            .with_page(Point::new(100.0, 200.0));
        assert_eq!(read_point(&ev), Point::new(5.0, 6.0));
    }

    #[test]
    fn page_coordinates_used_without_touches() {
        let ev = PointerEvent::mouse(1_u32, Point::new(40.0, 50.0), 0)
            .with_scroll(Vec2::new(1000.0, 1000.0));
        // Scroll is ignored when page coordinates are present.
        assert_eq!(read_point(&ev), Point::new(40.0, 50.0));
    }

    #[test]
    fn client_coordinates_are_offset_by_scroll() {
        let ev = PointerEvent::client(1_u32, Point::new(40.0, 50.0), Vec2::new(12.0, 300.0), 0);
        assert_eq!(read_point(&ev), Point::new(52.0, 350.0));
    }

    #[test]
    fn empty_touch_list_falls_through() {
        // Touch-end events carry no active touches.
        let ev = PointerEvent::touch(1_u32, [], 0).with_page(Point::new(3.0, 4.0));
        assert_eq!(ev.touch_count(), 0);
        assert_eq!(ev.point(), Point::new(3.0, 4.0));
    }
}
