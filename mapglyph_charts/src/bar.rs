// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use mapglyph_core::{Attr, Attrs, Encode, NodeKind, TextBaseline};
use peniko::Color;
use smallvec::smallvec;

use crate::chart_spec::{ChartSpec, GUIDE_COLOR};
use crate::scale::LinearScale;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// How far the zero line extends past each side of the glyph box.
const ZERO_LINE_OVERHANG: f64 = 3.0;

/// Bar chart geometry.
///
/// The container origin sits on the anchor's horizontal center line at the left edge of the
/// box; bars share the box width equally and grow up from `y = 0` for non-negative values and
/// down from it for negative ones.
#[derive(Clone, Debug)]
pub struct BarGeometry<'a> {
    spec: &'a ChartSpec,
    values: &'a [f64],
    bar_width: f64,
    scale: LinearScale,
}

impl<'a> BarGeometry<'a> {
    /// Build bar geometry for normalized `values`.
    pub fn new(spec: &'a ChartSpec, values: &'a [f64]) -> Self {
        Self {
            spec,
            values,
            bar_width: spec.width / values.len() as f64,
            scale: LinearScale::unit(spec.height),
        }
    }

    /// Width of one bar slot.
    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Offset of the container from the projected anchor.
    pub fn origin_offset(&self) -> Vec2 {
        Vec2::new(-self.spec.width / 2.0, 0.0)
    }

    /// Y of the bar tip for value `index`.
    fn tip(&self, index: usize) -> f64 {
        -self.scale.map(self.values[index])
    }

    /// Label anchor point and vertical alignment for value `index`.
    pub fn label(&self, index: usize) -> (Point, TextBaseline) {
        let baseline = if self.values[index] > 0.0 {
            TextBaseline::BeforeEdge
        } else {
            TextBaseline::AfterEdge
        };
        (
            Point::new((index as f64 + 0.5) * self.bar_width, self.tip(index)),
            baseline,
        )
    }

    /// The static zero line.
    pub fn guide(&self) -> Attrs {
        smallvec![
            Attr::X1(-ZERO_LINE_OVERHANG),
            Attr::Y1(0.0),
            Attr::X2(self.spec.width + ZERO_LINE_OVERHANG),
            Attr::Y2(0.0),
            Attr::Stroke(GUIDE_COLOR),
            Attr::StrokeWidth(1.0),
            Attr::Fill(Color::TRANSPARENT),
        ]
    }
}

impl Encode for BarGeometry<'_> {
    fn kind(&self) -> NodeKind {
        NodeKind::Rect
    }

    fn enter(&self, index: usize) -> Attrs {
        smallvec![
            Attr::X((index + 1) as f64 * self.bar_width),
            Attr::Y(0.0),
            Attr::Width(0.0),
            Attr::Height(0.0),
        ]
    }

    fn target(&self, index: usize) -> Attrs {
        let d = self.values[index];
        let h = self.scale.map(d);
        smallvec![
            Attr::X(index as f64 * self.bar_width),
            Attr::Y(if d >= 0.0 { -h } else { 0.0 }),
            Attr::Width(self.bar_width),
            Attr::Height(h.abs()),
            Attr::Fill(self.spec.color(index)),
        ]
    }

    fn exit(&self, index: usize) -> Attrs {
        smallvec![
            Attr::X(index as f64 * self.bar_width),
            Attr::Y(0.0),
            Attr::Width(0.0),
            Attr::Height(0.0),
        ]
    }
}
