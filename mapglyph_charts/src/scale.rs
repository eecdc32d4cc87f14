// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A linear mapping from a data domain onto a pixel range.
///
/// Values outside the domain are extrapolated, never clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    /// Input interval.
    pub domain: (f64, f64),
    /// Output interval.
    pub range: (f64, f64),
}

impl LinearScale {
    /// Create a scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// The unit scale used by glyph geometry: `[0, 1]` onto `[0, extent]`.
    pub fn unit(extent: f64) -> Self {
        Self::new((0.0, 1.0), (0.0, extent))
    }

    /// Map a domain value into the range.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        r0 + t * (r1 - r0)
    }
}
