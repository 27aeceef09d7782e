// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: deterministic, `no_std` gesture recognition for UI input.
//!
//! ## Overview
//!
//! This crate turns raw mouse, touch, native pinch/rotate and wheel events into
//! a small set of semantic gestures:
//!
//! - **drag**: incremental movement of a single pointer, reported on every move.
//! - **swipe up/down/left/right**: a single-pointer interaction that travelled
//!   further than a threshold, reported once on release.
//! - **double tap**: a second tap close in space and time to the previous one,
//!   reported once on release instead of a swipe.
//! - **pinch**: incremental zoom, from native gestures, two raw touches or the
//!   mouse wheel.
//! - **twist**: incremental rotation, from native gestures only.
//!
//! It does not register listeners or touch the DOM. Hosts translate their
//! events into [`PointerEvent`](event::PointerEvent),
//! [`NativeGestureEvent`](event::NativeGestureEvent) and
//! [`WheelEvent`](event::WheelEvent) values, call the matching
//! [`Gestures`](gestures::Gestures) handler, and apply the returned
//! [`DefaultAction`](types::DefaultAction).
//!
//! ## Layering
//!
//! - [`event`]: the input model and the page-coordinate reader.
//! - [`single`]: [`SingleTouchTracker`](single::SingleTouchTracker), drag and
//!   release classification for one pointer.
//! - [`multi`]: [`MultiTouchTracker`](multi::MultiTouchTracker), pinch and
//!   twist over a [`GesturePlatform`](multi::GesturePlatform) chosen once.
//! - [`config`]: partial [`GestureOptions`](config::GestureOptions) in,
//!   validated [`GestureConfig`](config::GestureConfig) out.
//! - [`gestures`]: the coordinator wiring trackers to callbacks, with pause and
//!   default-action controls.
//!
//! The trackers can be used on their own; they return recognized gestures
//! instead of calling back, and take timestamps from the events rather than a
//! clock, so every classification is replayable in tests.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::Point;
//! use understory_gesture::config::GestureOptions;
//! use understory_gesture::event::{PointerEvent, WheelEvent};
//! use understory_gesture::gestures::Gestures;
//! use understory_gesture::multi::GesturePlatform;
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! enum Part { Body, Handle }
//!
//! let offset = Rc::new(Cell::new(0.0));
//! let zoom = Rc::new(Cell::new(1.0));
//! let (o, z) = (offset.clone(), zoom.clone());
//! let options = GestureOptions::new()
//!     .on_drag(move |drag, _| {
//!         if drag.source == Part::Body {
//!             o.set(o.get() + drag.horizontal);
//!         }
//!     })
//!     .on_pinch(move |pinch, _| z.set(z.get() + pinch.scale));
//! let mut gestures = Gestures::new(options, GesturePlatform::TwoFingerFallback).unwrap();
//!
//! let _ = gestures.mouse_down(&PointerEvent::mouse(Part::Body, Point::new(10.0, 10.0), 0));
//! let _ = gestures.mouse_move(&PointerEvent::mouse(Part::Body, Point::new(14.0, 10.0), 8));
//! let _ = gestures.mouse_move(&PointerEvent::mouse(Part::Body, Point::new(20.0, 10.0), 16));
//! let _ = gestures.mouse_up(&PointerEvent::mouse(Part::Body, Point::new(20.0, 10.0), 24));
//! assert_eq!(offset.get(), 10.0);
//!
//! let tick = WheelEvent::new(PointerEvent::mouse(Part::Handle, Point::new(0.0, 0.0), 40), 120.0);
//! let _ = gestures.wheel(&tick);
//! assert_eq!(zoom.get(), 1.1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` builds relying on `libm` for floating-point math.
//! - `web_adapter`: the `adapters::web` module, converting `web-sys` DOM
//!   events and probing the browser's gesture support.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod event;
pub mod gestures;
pub mod multi;
pub mod single;
pub mod types;
