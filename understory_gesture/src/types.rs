// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognized gestures and host-facing results.

use kurbo::Point;

/// An incremental drag step of a single-pointer interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Drag<K> {
    /// Where the interaction started.
    pub origin: Point,
    /// Horizontal movement since the previous move, not since the origin.
    pub horizontal: f64,
    /// Vertical movement since the previous move, not since the origin.
    pub vertical: f64,
    /// Element the interaction started on.
    pub source: K,
}

/// Direction of a swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Toward smaller `y`.
    Up,
    /// Toward larger `y`.
    Down,
    /// Toward smaller `x`.
    Left,
    /// Toward larger `x`.
    Right,
}

/// A completed swipe.
#[derive(Clone, Debug, PartialEq)]
pub struct Swipe<K> {
    /// Dominant direction of motion.
    pub direction: SwipeDirection,
    /// Where the interaction started.
    pub origin: Point,
    /// Travelled distance along the dominant axis; never negative.
    pub distance: f64,
    /// Element the interaction started on.
    pub source: K,
}

/// A second tap close in space and time to the previous one.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleTap<K> {
    /// Where the second tap started.
    pub origin: Point,
    /// Element the second tap started on.
    pub source: K,
}

/// Terminal classification of a single-pointer interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Release<K> {
    /// The interaction completed a double tap.
    DoubleTap(DoubleTap<K>),
    /// The interaction travelled further than the swipe threshold.
    Swipe(Swipe<K>),
}

/// An incremental zoom step.
#[derive(Clone, Debug, PartialEq)]
pub struct Pinch<K> {
    /// Current pointer position.
    pub position: Point,
    /// Scale change since the previous sample; positive when zooming in.
    pub scale: f64,
    /// Element the gesture started on (or the wheel event's target).
    pub target: K,
}

/// An incremental rotation step.
#[derive(Clone, Debug, PartialEq)]
pub struct Twist<K> {
    /// Current pointer position.
    pub position: Point,
    /// Rotation change since the previous sample, in the platform's units (degrees on the web).
    pub rotation: f64,
    /// Element the gesture started on.
    pub target: K,
}

/// Whether the host should let its default handling of an event run.
///
/// Returned by every [`Gestures`](crate::gestures::Gestures) handler.
/// On the web, [`DefaultAction::Prevent`] maps to `event.preventDefault()`.
#[must_use]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefaultAction {
    /// Let the host handle the event as usual.
    #[default]
    Allow,
    /// Suppress native scrolling, selection or zooming for this event.
    Prevent,
}

impl DefaultAction {
    /// `Prevent` if `cancel` is set, `Allow` otherwise.
    pub const fn prevent_if(cancel: bool) -> Self {
        if cancel { Self::Prevent } else { Self::Allow }
    }

    /// Combine the decisions of two listeners; any `Prevent` wins.
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Allow, Self::Allow) => Self::Allow,
            _ => Self::Prevent,
        }
    }

    /// Returns `true` for [`DefaultAction::Prevent`].
    pub const fn is_prevented(self) -> bool {
        matches!(self, Self::Prevent)
    }
}
