// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use mapglyph_transforms::{ConfigError, Values, normalize};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Deserializer};

/// The ten-color categorical palette used when no colors are given.
pub const CATEGORY10: [Color; 10] = [
    Color::from_rgba8(0x1f, 0x77, 0xb4, 0xff),
    Color::from_rgba8(0xff, 0x7f, 0x0e, 0xff),
    Color::from_rgba8(0x2c, 0xa0, 0x2c, 0xff),
    Color::from_rgba8(0xd6, 0x27, 0x28, 0xff),
    Color::from_rgba8(0x94, 0x67, 0xbd, 0xff),
    Color::from_rgba8(0x8c, 0x56, 0x4b, 0xff),
    Color::from_rgba8(0xe3, 0x77, 0xc2, 0xff),
    Color::from_rgba8(0x7f, 0x7f, 0x7f, 0xff),
    Color::from_rgba8(0xbc, 0xbd, 0x22, 0xff),
    Color::from_rgba8(0x17, 0xbe, 0xcf, 0xff),
];

/// Stroke color of the zero line and reference circle.
pub const GUIDE_COLOR: Color = Color::from_rgba8(0x99, 0x99, 0x99, 0xff);

/// Default transition length for every animated attribute.
pub const DEFAULT_TRANSITION_MS: u64 = 750;

/// Which geometry a glyph draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    /// Side-by-side vertical bars growing up (or down) from a zero line.
    #[default]
    Bar,
    /// Slices whose angular sweep is proportional to each value.
    Pie,
    /// Equal angular slots whose radius is proportional to each value.
    PolarRadius,
    /// Equal angular slots whose area is proportional to each value.
    PolarArea,
}

/// The full configuration of one glyph.
///
/// Geometry reads this afresh on every reconciliation pass; nothing in it is mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// Geometry to draw.
    pub chart_type: ChartType,
    /// Raw values, in display order.
    pub data: Values,
    /// One maximum shared by every value, or one maximum per value.
    pub max_values: Values,
    /// Fill colors, indexed cyclically by value index.
    pub colors: Vec<Color>,
    /// Width of the glyph box in pixels.
    pub width: f64,
    /// Height of the glyph box in pixels.
    pub height: f64,
    /// Opacity of the whole glyph in `[0, 1]`.
    pub opacity: f64,
    /// Whether to draw a text label per value.
    pub label: bool,
    /// Style string applied verbatim to labels.
    pub label_style: String,
    /// Length of every transition, in milliseconds.
    pub transition_ms: u64,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Bar,
            data: Values::from(1.0),
            max_values: Values::from(1.0),
            colors: CATEGORY10.to_vec(),
            width: 40.0,
            height: 40.0,
            opacity: 1.0,
            label: false,
            label_style: String::from("fill:white;font-size:8px;"),
            transition_ms: DEFAULT_TRANSITION_MS,
        }
    }
}

impl ChartSpec {
    /// Return a copy of this spec with every field present in `options` replaced.
    pub fn merged(&self, options: &ChartOptions) -> Self {
        let mut out = self.clone();
        if let Some(t) = options.chart_type {
            out.chart_type = t;
        }
        if let Some(d) = &options.data {
            out.data = d.clone();
        }
        if let Some(m) = &options.max_values {
            out.max_values = m.clone();
        }
        if let Some(c) = &options.colors {
            out.colors = c.clone();
        }
        if let Some(w) = options.width {
            out.width = w;
        }
        if let Some(h) = options.height {
            out.height = h;
        }
        if let Some(o) = options.opacity {
            out.opacity = o;
        }
        if let Some(l) = options.label {
            out.label = l;
        }
        if let Some(s) = &options.label_style {
            out.label_style = s.clone();
        }
        if let Some(ms) = options.transition_ms {
            out.transition_ms = ms;
        }
        out
    }

    /// Normalize [`ChartSpec::data`] against [`ChartSpec::max_values`].
    pub fn normalized(&self) -> Result<Vec<f64>, ConfigError> {
        normalize(&self.data, &self.max_values)
    }

    /// Return the fill for value `index`, cycling through [`ChartSpec::colors`].
    ///
    /// An empty palette paints everything black.
    pub fn color(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    /// Return the transition length.
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

/// A partial [`ChartSpec`]: every field is optional and only present fields are applied.
///
/// Field names deserialize in camelCase (`maxValues`, `labelStyle`, `transitionMs`) and the
/// chart type is read from `type`. `data` and `maxValues` accept a bare number. Colors are CSS
/// color strings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartOptions {
    /// See [`ChartSpec::chart_type`].
    #[serde(default, rename = "type")]
    pub chart_type: Option<ChartType>,
    /// See [`ChartSpec::data`].
    #[serde(default)]
    pub data: Option<Values>,
    /// See [`ChartSpec::max_values`].
    #[serde(default)]
    pub max_values: Option<Values>,
    /// See [`ChartSpec::colors`].
    #[serde(default, deserialize_with = "de_colors")]
    pub colors: Option<Vec<Color>>,
    /// See [`ChartSpec::width`].
    #[serde(default)]
    pub width: Option<f64>,
    /// See [`ChartSpec::height`].
    #[serde(default)]
    pub height: Option<f64>,
    /// See [`ChartSpec::opacity`].
    #[serde(default)]
    pub opacity: Option<f64>,
    /// See [`ChartSpec::label`].
    #[serde(default)]
    pub label: Option<bool>,
    /// See [`ChartSpec::label_style`].
    #[serde(default)]
    pub label_style: Option<String>,
    /// See [`ChartSpec::transition_ms`].
    #[serde(default)]
    pub transition_ms: Option<u64>,
}

impl ChartOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chart type.
    pub fn with_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = Some(chart_type);
        self
    }

    /// Set the data.
    pub fn with_data(mut self, data: impl Into<Values>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the maxima.
    pub fn with_max_values(mut self, max_values: impl Into<Values>) -> Self {
        self.max_values = Some(max_values.into());
        self
    }

    /// Set the palette.
    pub fn with_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        self.colors = Some(colors.into());
        self
    }

    /// Set the box size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the glyph opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Turn labels on or off.
    pub fn with_label(mut self, label: bool) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the label style string.
    pub fn with_label_style(mut self, style: impl Into<String>) -> Self {
        self.label_style = Some(style.into());
        self
    }

    /// Set the transition length in milliseconds.
    pub fn with_transition_ms(mut self, ms: u64) -> Self {
        self.transition_ms = Some(ms);
        self
    }
}

fn de_colors<'de, D>(deserializer: D) -> Result<Option<Vec<Color>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(tokens) = Option::<Vec<String>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    tokens
        .iter()
        .map(|t| {
            parse_color(t)
                .map(|c| c.to_alpha_color::<Srgb>())
                .map_err(|e| D::Error::custom(alloc::format!("invalid color `{t}`: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
