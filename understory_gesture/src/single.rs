// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-pointer gesture recognition: drag, swipe and double tap.
//!
//! [`SingleTouchTracker`] follows one mouse press or single-finger touch from
//! start to release. While the pointer moves it reports incremental [`Drag`]
//! steps; on release it classifies the whole interaction as at most one of a
//! [`DoubleTap`] or a [`Swipe`].
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::config::DoubleTapWindow;
//! use understory_gesture::single::SingleTouchTracker;
//! use understory_gesture::types::{Release, SwipeDirection};
//!
//! let mut tracker: SingleTouchTracker<u32> =
//!     SingleTouchTracker::new(50.0, DoubleTapWindow::default());
//!
//! tracker.start(42, Point::new(0.0, 0.0));
//! let drag = tracker.on_move(Point::new(30.0, 5.0)).unwrap();
//! assert_eq!(drag.horizontal, 30.0);
//! let drag = tracker.on_move(Point::new(80.0, 5.0)).unwrap();
//! assert_eq!(drag.horizontal, 50.0); // since the previous move, not the origin
//!
//! match tracker.end(1000) {
//!     Some(Release::Swipe(swipe)) => {
//!         assert_eq!(swipe.direction, SwipeDirection::Right);
//!         assert_eq!(swipe.distance, 80.0);
//!         assert_eq!(swipe.source, 42);
//!     }
//!     other => panic!("expected a swipe, got {other:?}"),
//! }
//! assert!(!tracker.is_active());
//! ```
//!
//! ## Release classification
//!
//! With `distance = last position - origin`:
//!
//! 1. **Double tap**: the previous completed interaction started within the
//!    [`DoubleTapWindow`] radius of this one and ended strictly inside its
//!    interval before this release. No swipe is reported.
//! 2. **Horizontal**: `|distance.x| > |distance.y|`; a swipe right or left if
//!    `distance.x` exceeds the threshold in either direction.
//! 3. **Vertical**: otherwise (ties included); a swipe down or up if
//!    `distance.y` exceeds the threshold in either direction.
//!
//! Threshold comparisons are strict: a travel of exactly `threshold` is not a
//! swipe. Every completed interaction is remembered for the next double-tap
//! check, whatever it was classified as.

use kurbo::{Point, Vec2};

use crate::config::DoubleTapWindow;
use crate::types::{DoubleTap, Drag, Release, Swipe, SwipeDirection};

/// Where and on what an in-progress interaction started.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchOrigin<K> {
    /// Start position.
    pub position: Point,
    /// Element the interaction started on.
    pub target: K,
}

/// The origin and release time of the most recently completed interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LastTouch {
    /// Start position of that interaction.
    pub position: Point,
    /// Release timestamp in milliseconds.
    pub time: u64,
}

/// Tracks one single-pointer interaction at a time.
#[derive(Clone, Debug)]
pub struct SingleTouchTracker<K> {
    origin: Option<TouchOrigin<K>>,
    progression: Option<Point>,
    last_touch: Option<LastTouch>,
    threshold: f64,
    double_tap: DoubleTapWindow,
}

impl<K: Clone> SingleTouchTracker<K> {
    /// Create an idle tracker.
    ///
    /// `threshold` is the minimum travel in pixels for a swipe.
    pub fn new(threshold: f64, double_tap: DoubleTapWindow) -> Self {
        Self {
            origin: None,
            progression: None,
            last_touch: None,
            threshold,
            double_tap,
        }
    }

    /// Begin an interaction at `position` on `target`.
    ///
    /// A start while another interaction is active replaces it.
    pub fn start(&mut self, target: K, position: Point) {
        self.origin = Some(TouchOrigin { position, target });
        self.progression = Some(position);
    }

    /// Record a pointer move.
    ///
    /// Returns the drag step since the previous move, or `None` if no
    /// interaction is active.
    pub fn on_move(&mut self, position: Point) -> Option<Drag<K>> {
        let origin = self.origin.as_ref()?;
        let previous = self.progression.unwrap_or(origin.position);
        let delta = position - previous;
        let drag = Drag {
            origin: origin.position,
            horizontal: delta.x,
            vertical: delta.y,
            source: origin.target.clone(),
        };
        self.progression = Some(position);
        Some(drag)
    }

    /// Finish the interaction and classify it.
    ///
    /// `now` is the release timestamp in milliseconds. Returns `None` when the
    /// interaction was neither a double tap nor a swipe, or when no interaction
    /// was active; in the latter case nothing changes.
    pub fn end(&mut self, now: u64) -> Option<Release<K>> {
        let (Some(origin), Some(progression)) = (self.origin.take(), self.progression.take())
        else {
            return None;
        };

        let release = if self.is_double_tap(origin.position, now) {
            Some(Release::DoubleTap(DoubleTap {
                origin: origin.position,
                source: origin.target,
            }))
        } else {
            classify_swipe(progression - origin.position, self.threshold).map(
                |(direction, distance)| {
                    Release::Swipe(Swipe {
                        direction,
                        origin: origin.position,
                        distance,
                        source: origin.target,
                    })
                },
            )
        };

        self.last_touch = Some(LastTouch {
            position: origin.position,
            time: now,
        });
        release
    }

    fn is_double_tap(&self, origin: Point, now: u64) -> bool {
        let Some(last) = self.last_touch else {
            return false;
        };
        let window = &self.double_tap;
        let elapsed = now.saturating_sub(last.time);
        (origin.x - last.position.x).abs() < window.radius
            && (origin.y - last.position.y).abs() < window.radius
            && elapsed > window.min_interval
            && elapsed < window.max_interval
    }

    /// Abandon the active interaction without classifying it.
    ///
    /// Returns `true` if an interaction was active. The last completed touch is kept.
    pub fn cancel(&mut self) -> bool {
        self.progression = None;
        self.origin.take().is_some()
    }

    /// Whether an interaction is in progress.
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// The active interaction's origin.
    pub fn origin(&self) -> Option<&TouchOrigin<K>> {
        self.origin.as_ref()
    }

    /// The active interaction's most recent position.
    pub fn progression(&self) -> Option<Point> {
        self.progression
    }

    /// The most recently completed interaction.
    pub fn last_touch(&self) -> Option<LastTouch> {
        self.last_touch
    }

    /// Minimum swipe distance in pixels.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Classify a total displacement as a swipe.
///
/// Returns the direction and the non-negative travelled distance, or `None`
/// if the dominant axis did not exceed `threshold`. Equal magnitudes on both
/// axes are treated as vertical.
pub fn classify_swipe(distance: Vec2, threshold: f64) -> Option<(SwipeDirection, f64)> {
    if distance.x.abs() > distance.y.abs() {
        if distance.x > threshold {
            Some((SwipeDirection::Right, distance.x))
        } else if distance.x < -threshold {
            Some((SwipeDirection::Left, -distance.x))
        } else {
            None
        }
    } else if distance.y > threshold {
        Some((SwipeDirection::Down, distance.y))
    } else if distance.y < -threshold {
        Some((SwipeDirection::Up, -distance.y))
    } else {
        None
    }
}
