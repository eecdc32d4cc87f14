// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `mapglyph_charts`: small statistical charts anchored to map coordinates.
//!
//! A [`Glyph`] draws one bar, pie, polar-radius or polar-area chart at a [`LatLng`]. It reads
//! its configuration from a [`ChartSpec`], normalizes the data against the configured maxima,
//! and reconciles one node per value (plus optional labels) against a
//! [`Surface`](mapglyph_core::Surface) through `mapglyph_core`'s positional enter/update/exit
//! join. The host map is reached through [`MapHost`]; [`WebMercatorMap`] is a self-contained
//! implementation for hosts without one of their own and for tests.
//!
//! ```
//! use kurbo::Size;
//! use mapglyph_charts::{ChartOptions, ChartSpec, ChartType, Glyph, LatLng, WebMercatorMap};
//! use mapglyph_core::MemorySurface;
//!
//! let mut map = WebMercatorMap::new(LatLng::new(0.0, 0.0), 3.0, Size::new(400.0, 300.0));
//! let mut surface = MemorySurface::instant();
//!
//! let mut glyph = Glyph::new(LatLng::new(0.0, 0.0), ChartSpec::default());
//! glyph.attach(&mut map, &mut surface).unwrap();
//!
//! let counts = glyph
//!     .update_options(
//!         &ChartOptions::new()
//!             .with_type(ChartType::Bar)
//!             .with_data([1.0, 2.0, 3.0])
//!             .with_max_values(3.0),
//!         &map,
//!         &mut surface,
//!     )
//!     .unwrap();
//! assert_eq!((counts.enter, counts.update, counts.exit), (2, 1, 0));
//! ```
//!
//! Features:
//! - `std` (default): use the standard library's float math.
//! - `libm`: float math through `libm` for `no_std` targets.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bar;
mod chart_spec;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod geometry;
mod glyph;
mod map;
mod polar;
mod scale;

pub use bar::BarGeometry;
pub use chart_spec::{
    CATEGORY10, ChartOptions, ChartSpec, ChartType, DEFAULT_TRANSITION_MS, GUIDE_COLOR,
};
pub use geometry::ChartGeometry;
pub use glyph::{Glyph, notify_viewport_change};
pub use map::{LatLng, MapHost, SubscriptionId, WebMercatorMap};
pub use mapglyph_transforms::{ConfigError, Values};
pub use polar::{PolarGeometry, PolarMode};
pub use scale::LinearScale;
