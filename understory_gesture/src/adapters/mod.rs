// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters for feeding host input into the gesture layer.
//!
//! The core crate only knows its own event model. Each adapter is gated behind a
//! feature flag so the default build stays `no_std` and free of host bindings.
//!
//! ## Available Adapters
//!
//! - `web` (`web_adapter` feature): converts `web-sys` DOM events into
//!   [`PointerEvent`](crate::event::PointerEvent) and friends, probes the
//!   browser for native gesture support, and applies a
//!   [`DefaultAction`](crate::types::DefaultAction) to the original event.

#[cfg(feature = "web_adapter")]
pub mod web;
