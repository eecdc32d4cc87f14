// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input preparation for map glyphs.
//!
//! Raw glyph data arrives as a number or a list of numbers, alongside one maximum per value (or a
//! single shared maximum). [`normalize`] turns that into the fractional values that chart
//! geometry consumes. Nothing is clamped: negative values and values above their maximum pass
//! through and are expected to render outside the nominal box.

#![no_std]

extern crate alloc;

mod normalize;

pub use normalize::{ConfigError, Values, normalize};
