// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small photo viewer driven by `understory_gesture`.
//!
//! This example shows how to:
//! - map drag to panning and pinch/twist/wheel to zoom and rotation,
//! - use swipes to page between photos and a double tap to reset the view,
//! - pause recognition while a modal is open,
//! - apply the returned `DefaultAction` the way a browser host would.
//!
//! Events are synthetic so the example runs anywhere.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example photo_viewer`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use tracing_subscriber::EnvFilter;
use understory_gesture::config::GestureOptions;
use understory_gesture::event::{NativeGestureEvent, PointerEvent, WheelEvent};
use understory_gesture::gestures::Gestures;
use understory_gesture::multi::GesturePlatform;
use understory_gesture::types::DefaultAction;

/// What an element in the viewer is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Photo,
    Toolbar,
}

#[derive(Debug)]
struct Viewer {
    index: usize,
    count: usize,
    pan: Vec2,
    zoom: f64,
    rotation: f64,
}

impl Viewer {
    fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
        self.rotation = 0.0;
    }

    fn page(&mut self, forward: bool) {
        self.index = if forward {
            (self.index + 1) % self.count
        } else {
            (self.index + self.count - 1) % self.count
        };
        self.reset();
    }
}

fn options(viewer: &Rc<RefCell<Viewer>>) -> GestureOptions<Part> {
    let (drag, left, right, tap, pinch, twist) = (
        viewer.clone(),
        viewer.clone(),
        viewer.clone(),
        viewer.clone(),
        viewer.clone(),
        viewer.clone(),
    );
    GestureOptions::new()
        .threshold(60.0)
        .on_drag(move |d, _| {
            // The toolbar scrolls itself; only the photo pans.
            if d.source == Part::Photo {
                drag.borrow_mut().pan += Vec2::new(d.horizontal, d.vertical);
            }
        })
        .on_swipe_left(move |_, _| left.borrow_mut().page(true))
        .on_swipe_right(move |_, _| right.borrow_mut().page(false))
        .on_double_tap(move |_, _| tap.borrow_mut().reset())
        .on_pinch(move |p, _| {
            let mut v = pinch.borrow_mut();
            v.zoom = (v.zoom + p.scale).clamp(0.25, 8.0);
        })
        .on_twist(move |t, _| twist.borrow_mut().rotation += t.rotation)
}

fn report(label: &str, action: DefaultAction, viewer: &Rc<RefCell<Viewer>>) {
    let v = viewer.borrow();
    println!(
        "{label:<28} prevent={:<5} photo={} pan=({:.0}, {:.0}) zoom={:.2} rotation={:.0}",
        action.is_prevented(),
        v.index,
        v.pan.x,
        v.pan.y,
        v.zoom,
        v.rotation
    );
}

fn touch(points: &[(f64, f64)], t: u64) -> PointerEvent<Part> {
    PointerEvent::touch(
        Part::Photo,
        points.iter().map(|&(x, y)| Point::new(x, y)),
        t,
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let viewer = Rc::new(RefCell::new(Viewer {
        index: 0,
        count: 3,
        pan: Vec2::ZERO,
        zoom: 1.0,
        rotation: 0.0,
    }));

    // Touch device without native gesture events.
    let mut g = match Gestures::new(options(&viewer), GesturePlatform::TwoFingerFallback) {
        Ok(g) => g,
        Err(err) => {
            eprintln!("invalid gesture options: {err}");
            return;
        }
    };
    println!("capability: {:?}, platform: {:?}", g.capability(), g.platform());

    // Pan with one finger.
    let a = g.touch_start(&touch(&[(100.0, 100.0)], 0));
    report("touch start", a, &viewer);
    let a = g.touch_move(&touch(&[(120.0, 110.0)], 16));
    report("pan", a, &viewer);
    let a = g.touch_end(&touch(&[], 32));
    report("lift", a, &viewer);

    // Flick left to the next photo.
    let _ = g.touch_start(&touch(&[(300.0, 200.0)], 1000));
    let _ = g.touch_move(&touch(&[(180.0, 205.0)], 1016));
    let a = g.touch_end(&touch(&[], 1032));
    report("swipe left", a, &viewer);

    // Spread two fingers to zoom in.
    let _ = g.touch_start(&touch(&[(100.0, 100.0), (200.0, 200.0)], 2000));
    let a = g.touch_move(&touch(&[(90.0, 90.0), (210.0, 210.0)], 2016));
    report("pinch out", a, &viewer);
    let _ = g.touch_end(&touch(&[], 2032));

    // Double tap resets the view.
    for t in [3000, 3150] {
        let _ = g.touch_start(&touch(&[(150.0, 150.0)], t));
        let _ = g.touch_end(&touch(&[], t + 40));
    }
    report("double tap", DefaultAction::Allow, &viewer);

    // While a modal is open, touches are ignored; the wheel still zooms.
    g.pause();
    let _ = g.touch_start(&touch(&[(0.0, 0.0)], 4000));
    let _ = g.touch_move(&touch(&[(50.0, 0.0)], 4016));
    let wheel = WheelEvent::new(PointerEvent::mouse(Part::Toolbar, Point::ZERO, 4100), 120.0);
    let a = g.wheel(&wheel);
    report("paused + wheel", a, &viewer);
    g.resume();

    // Let the page scroll under touch while keeping pinch to ourselves.
    g.enable_default_touch();
    let _ = g.touch_start(&touch(&[(10.0, 10.0)], 5000));
    let a = g.touch_move(&touch(&[(10.0, 40.0)], 5016));
    report("scroll allowed", a, &viewer);
    let _ = g.touch_end(&touch(&[], 5032));

    // A trackpad browser reporting native gestures.
    let mut native = match Gestures::new(options(&viewer), GesturePlatform::Native) {
        Ok(g) => g,
        Err(err) => {
            eprintln!("invalid gesture options: {err}");
            return;
        }
    };
    let at = |scale, rotation, t| {
        NativeGestureEvent::new(
            PointerEvent::mouse(Part::Photo, Point::new(200.0, 200.0), t),
            scale,
            rotation,
        )
    };
    let _ = native.gesture_start(&at(1.0, 0.0, 6000));
    let a = native.gesture_change(&at(1.4, 20.0, 6016));
    report("native pinch + twist", a, &viewer);
    let _ = native.gesture_end(&at(1.4, 20.0, 6032));
}
