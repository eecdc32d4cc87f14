// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One geometry interface over every chart type.

use alloc::string::String;

use kurbo::{Point, Vec2};
use mapglyph_core::{Attr, Attrs, Encode, NodeKind, TextAnchor, TextBaseline};
use smallvec::smallvec;

use crate::bar::BarGeometry;
use crate::chart_spec::{ChartSpec, ChartType};
use crate::format::format_value;
use crate::polar::{PolarGeometry, PolarMode};

/// Geometry for the chart type selected in a [`ChartSpec`].
///
/// The reconciler only sees this through [`Encode`]; the enter/update/exit discipline is the
/// same for every variant.
#[derive(Clone, Debug)]
pub enum ChartGeometry<'a> {
    /// See [`BarGeometry`].
    Bar(BarGeometry<'a>),
    /// See [`PolarGeometry`].
    Polar(PolarGeometry<'a>),
}

impl<'a> ChartGeometry<'a> {
    /// Build the geometry for `spec.chart_type` over normalized `values`.
    pub fn new(spec: &'a ChartSpec, values: &'a [f64]) -> Self {
        match spec.chart_type {
            ChartType::Bar => Self::Bar(BarGeometry::new(spec, values)),
            ChartType::Pie => Self::Polar(PolarGeometry::new(spec, values, PolarMode::Angle)),
            ChartType::PolarRadius => {
                Self::Polar(PolarGeometry::new(spec, values, PolarMode::Radius))
            }
            ChartType::PolarArea => Self::Polar(PolarGeometry::new(spec, values, PolarMode::Area)),
        }
    }

    /// Where the glyph container goes, given the anchor's projected position.
    pub fn origin(&self, anchor: Point) -> Point {
        let offset = match self {
            Self::Bar(g) => g.origin_offset(),
            Self::Polar(g) => g.origin_offset(),
        };
        anchor + offset
    }

    /// The kind of the static guide drawn once per full rebuild.
    pub fn guide_kind(&self) -> NodeKind {
        match self {
            Self::Bar(_) => NodeKind::Line,
            Self::Polar(_) => NodeKind::Circle,
        }
    }

    /// Attributes of the static guide.
    pub fn guide(&self) -> Attrs {
        match self {
            Self::Bar(g) => g.guide(),
            Self::Polar(g) => g.guide(),
        }
    }

    /// Label anchor point and vertical alignment for value `index`.
    pub fn label(&self, index: usize) -> (Point, TextBaseline) {
        match self {
            Self::Bar(g) => g.label(index),
            Self::Polar(g) => g.label(index),
        }
    }
}

impl Encode for ChartGeometry<'_> {
    fn kind(&self) -> NodeKind {
        match self {
            Self::Bar(g) => g.kind(),
            Self::Polar(g) => g.kind(),
        }
    }

    fn enter(&self, index: usize) -> Attrs {
        match self {
            Self::Bar(g) => g.enter(index),
            Self::Polar(g) => g.enter(index),
        }
    }

    fn target(&self, index: usize) -> Attrs {
        match self {
            Self::Bar(g) => g.target(index),
            Self::Polar(g) => g.target(index),
        }
    }

    fn exit(&self, index: usize) -> Attrs {
        match self {
            Self::Bar(g) => g.exit(index),
            Self::Polar(g) => g.exit(index),
        }
    }
}

/// Per-value text labels placed by a [`ChartGeometry`].
///
/// Labels show the raw value, fade in where they will stay, follow their shape on update and
/// fade out on exit.
#[derive(Debug)]
pub(crate) struct LabelEncoder<'a> {
    pub(crate) geometry: &'a ChartGeometry<'a>,
    pub(crate) raw: &'a [f64],
    pub(crate) style: &'a str,
}

impl LabelEncoder<'_> {
    fn text(&self, index: usize) -> String {
        format_value(self.raw[index])
    }
}

impl Encode for LabelEncoder<'_> {
    fn kind(&self) -> NodeKind {
        NodeKind::Text
    }

    fn enter(&self, index: usize) -> Attrs {
        let (p, baseline) = self.geometry.label(index);
        smallvec![
            Attr::Anchor(TextAnchor::Middle),
            Attr::Baseline(baseline),
            Attr::Opacity(0.0),
            Attr::X(p.x),
            Attr::Y(p.y),
            Attr::Style(String::from(self.style)),
        ]
    }

    fn target(&self, index: usize) -> Attrs {
        let (p, baseline) = self.geometry.label(index);
        smallvec![
            Attr::Baseline(baseline),
            Attr::Text(self.text(index)),
            Attr::Opacity(1.0),
            Attr::X(p.x),
            Attr::Y(p.y),
            Attr::Style(String::from(self.style)),
        ]
    }

    fn exit(&self, _index: usize) -> Attrs {
        smallvec![Attr::Opacity(0.0)]
    }
}

/// Translation of a container placed at `origin`.
pub(crate) fn translate(origin: Point) -> Attr {
    Attr::Translate(Vec2::new(origin.x, origin.y))
}
