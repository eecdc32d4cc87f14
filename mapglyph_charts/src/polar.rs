// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{Point, Vec2};
use mapglyph_core::{Attr, Attrs, Encode, NodeKind, TextBaseline};
use peniko::Color;
use smallvec::smallvec;

use crate::chart_spec::{ChartSpec, GUIDE_COLOR};
use crate::scale::LinearScale;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Angle of 12 o'clock in surface coordinates (y down, clockwise angles).
const TOP: f64 = -FRAC_PI_2;

/// Which sector dimension encodes the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolarMode {
    /// Angular sweep: a value of `1` is a full turn (pie).
    Angle,
    /// Radius: equal slots, radius linear in the value.
    Radius,
    /// Area: equal slots, radius grows with the square root of the value.
    Area,
}

/// Pie and polar-area/polar-radius geometry.
///
/// The container origin sits on the anchor; `radius` is half the smaller side of the box.
/// Magnitudes are used for the polar modes, so negative values draw like positive ones.
#[derive(Clone, Debug)]
pub struct PolarGeometry<'a> {
    spec: &'a ChartSpec,
    values: &'a [f64],
    mode: PolarMode,
    radius: f64,
    /// Start angle per value, plus the end of the last sweep.
    starts: Vec<f64>,
}

impl<'a> PolarGeometry<'a> {
    /// Build polar geometry for normalized `values`.
    pub fn new(spec: &'a ChartSpec, values: &'a [f64], mode: PolarMode) -> Self {
        let radius = spec.width.min(spec.height) / 2.0;
        let mut starts = Vec::with_capacity(values.len() + 1);
        let mut a = TOP;
        starts.push(a);
        for (i, d) in values.iter().enumerate() {
            a = match mode {
                PolarMode::Angle => a + d * TAU,
                PolarMode::Radius | PolarMode::Area => {
                    TOP + (i + 1) as f64 * TAU / values.len() as f64
                }
            };
            starts.push(a);
        }
        Self {
            spec,
            values,
            mode,
            radius,
            starts,
        }
    }

    /// The full-scale radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Offset of the container from the projected anchor.
    pub fn origin_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn start(&self, index: usize) -> f64 {
        self.starts[index]
    }

    fn sweep(&self, index: usize) -> f64 {
        self.starts[index + 1] - self.starts[index]
    }

    fn outer(&self, index: usize) -> f64 {
        let d = self.values[index];
        match self.mode {
            PolarMode::Angle => self.radius,
            PolarMode::Radius => LinearScale::unit(self.radius).map(d).abs(),
            PolarMode::Area => self.radius * d.abs().sqrt(),
        }
    }

    /// Label anchor point and vertical alignment for value `index`.
    ///
    /// Pie labels sit inside their slice; polar labels track the outer tip.
    pub fn label(&self, index: usize) -> (Point, TextBaseline) {
        let mid = self.start(index) + self.sweep(index) / 2.0;
        let r = match self.mode {
            PolarMode::Angle => 0.6 * self.radius,
            PolarMode::Radius | PolarMode::Area => self.outer(index),
        };
        (
            Point::new(r * mid.cos(), r * mid.sin()),
            TextBaseline::Middle,
        )
    }

    /// The static full-scale reference circle.
    pub fn guide(&self) -> Attrs {
        smallvec![
            Attr::Radius(self.radius),
            Attr::Stroke(GUIDE_COLOR),
            Attr::StrokeWidth(1.0),
            Attr::Fill(Color::TRANSPARENT),
        ]
    }
}

impl Encode for PolarGeometry<'_> {
    fn kind(&self) -> NodeKind {
        NodeKind::Sector
    }

    fn enter(&self, index: usize) -> Attrs {
        match self.mode {
            PolarMode::Angle => smallvec![
                Attr::InnerRadius(0.0),
                Attr::OuterRadius(self.radius),
                Attr::StartAngle(self.start(index)),
                Attr::SweepAngle(0.0),
            ],
            PolarMode::Radius | PolarMode::Area => smallvec![
                Attr::InnerRadius(0.0),
                Attr::OuterRadius(0.0),
                Attr::StartAngle(self.start(index)),
                Attr::SweepAngle(self.sweep(index)),
            ],
        }
    }

    fn target(&self, index: usize) -> Attrs {
        smallvec![
            Attr::InnerRadius(0.0),
            Attr::OuterRadius(self.outer(index)),
            Attr::StartAngle(self.start(index)),
            Attr::SweepAngle(self.sweep(index)),
            Attr::Fill(self.spec.color(index)),
        ]
    }

    fn exit(&self, _index: usize) -> Attrs {
        // Exiting indices have no slot in the new data; collapse in place.
        match self.mode {
            PolarMode::Angle => smallvec![Attr::SweepAngle(0.0)],
            PolarMode::Radius | PolarMode::Area => smallvec![Attr::OuterRadius(0.0)],
        }
    }
}
