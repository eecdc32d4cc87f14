// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `mapglyph_core`: the rendering-surface seam and a positional enter/update/exit reconciler.
//!
//! This crate provides:
//! - node handles and kinds for a retained scene ([`NodeId`], [`NodeKind`])
//! - typed, interpolatable attributes ([`Attr`])
//! - the surface capability the reconciler drives ([`Surface`], [`Transition`])
//! - index-bound shape sets with `Enter/Update/Exit` diffs ([`ShapeSet`], [`ShapeDiff`])
//! - an in-memory surface for hosts and tests ([`MemorySurface`])
//!
//! It intentionally does NOT know about charts, maps or data. A chart layer implements
//! [`Encode`] for its geometry and calls [`ShapeSet::join`] once per reconciliation pass.
//!
//! Binding is by position: element `i` of the new data always reuses the node that held
//! element `i` of the previous data. Reordering values without changing their count is
//! therefore indistinguishable from updating them in place.

#![no_std]

extern crate alloc;

mod surface;

pub use surface::{MemorySurface, NodeSnapshot, Playback, SurfaceStats};

use alloc::{string::String, vec::Vec};
use core::fmt;
use core::time::Duration;
use kurbo::Vec2;
use peniko::Color;
use smallvec::SmallVec;

/// Stable handle for a node owned by a [`Surface`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a node id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// The geometric kind of a node, which determines how its attributes are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A container translating and fading its children.
    Group,
    /// An axis-aligned rectangle (`x`, `y`, `width`, `height`).
    Rect,
    /// A straight segment (`x1`, `y1`, `x2`, `y2`).
    Line,
    /// A text item positioned at a point.
    Text,
    /// An annular sector around the node origin (radii plus start and sweep angles).
    Sector,
    /// A circle around the node origin.
    Circle,
}

/// Horizontal anchoring for text.
///
/// In SVG terms, this maps to the `text-anchor` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start (left in LTR).
    Start,
    /// Anchor in the middle.
    Middle,
    /// Anchor at the end (right in LTR).
    End,
}

/// Vertical alignment for text relative to its position.
///
/// In SVG terms, this maps to the `alignment-baseline` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The top edge of the text sits on the anchor point (`before-edge`).
    BeforeEdge,
    /// The bottom edge of the text sits on the anchor point (`after-edge`).
    AfterEdge,
    /// The text is vertically centered on the anchor point.
    Middle,
}

/// Attribute keys, one per [`Attr`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrName {
    /// See [`Attr::Translate`].
    Translate,
    /// See [`Attr::Opacity`].
    Opacity,
    /// See [`Attr::X`].
    X,
    /// See [`Attr::Y`].
    Y,
    /// See [`Attr::Width`].
    Width,
    /// See [`Attr::Height`].
    Height,
    /// See [`Attr::X1`].
    X1,
    /// See [`Attr::Y1`].
    Y1,
    /// See [`Attr::X2`].
    X2,
    /// See [`Attr::Y2`].
    Y2,
    /// See [`Attr::Radius`].
    Radius,
    /// See [`Attr::InnerRadius`].
    InnerRadius,
    /// See [`Attr::OuterRadius`].
    OuterRadius,
    /// See [`Attr::StartAngle`].
    StartAngle,
    /// See [`Attr::SweepAngle`].
    SweepAngle,
    /// See [`Attr::Fill`].
    Fill,
    /// See [`Attr::Stroke`].
    Stroke,
    /// See [`Attr::StrokeWidth`].
    StrokeWidth,
    /// See [`Attr::Text`].
    Text,
    /// See [`Attr::Style`].
    Style,
    /// See [`Attr::Anchor`].
    Anchor,
    /// See [`Attr::Baseline`].
    Baseline,
}

/// A single typed attribute value.
///
/// Numeric, vector and color attributes can be interpolated by a surface; the others are
/// discrete and take effect when a transition starts.
#[derive(Clone, Debug, PartialEq)]
pub enum Attr {
    /// Translation of a group relative to its parent.
    Translate(Vec2),
    /// Group or text opacity in `[0, 1]`.
    Opacity(f64),
    /// Left edge of a rect, or the anchor x of a text item.
    X(f64),
    /// Top edge of a rect, or the anchor y of a text item.
    Y(f64),
    /// Rect width.
    Width(f64),
    /// Rect height.
    Height(f64),
    /// Line start x.
    X1(f64),
    /// Line start y.
    Y1(f64),
    /// Line end x.
    X2(f64),
    /// Line end y.
    Y2(f64),
    /// Circle radius.
    Radius(f64),
    /// Sector inner radius.
    InnerRadius(f64),
    /// Sector outer radius.
    OuterRadius(f64),
    /// Sector start angle in radians, clockwise from the positive x axis.
    StartAngle(f64),
    /// Sector sweep in radians; negative values sweep counter-clockwise.
    SweepAngle(f64),
    /// Fill paint.
    Fill(Color),
    /// Stroke paint.
    Stroke(Color),
    /// Stroke width.
    StrokeWidth(f64),
    /// Text content.
    Text(String),
    /// Opaque style string, passed through verbatim.
    Style(String),
    /// Horizontal text anchoring.
    Anchor(TextAnchor),
    /// Vertical text alignment.
    Baseline(TextBaseline),
}

impl Attr {
    /// Return the key of this attribute.
    pub fn name(&self) -> AttrName {
        match self {
            Self::Translate(_) => AttrName::Translate,
            Self::Opacity(_) => AttrName::Opacity,
            Self::X(_) => AttrName::X,
            Self::Y(_) => AttrName::Y,
            Self::Width(_) => AttrName::Width,
            Self::Height(_) => AttrName::Height,
            Self::X1(_) => AttrName::X1,
            Self::Y1(_) => AttrName::Y1,
            Self::X2(_) => AttrName::X2,
            Self::Y2(_) => AttrName::Y2,
            Self::Radius(_) => AttrName::Radius,
            Self::InnerRadius(_) => AttrName::InnerRadius,
            Self::OuterRadius(_) => AttrName::OuterRadius,
            Self::StartAngle(_) => AttrName::StartAngle,
            Self::SweepAngle(_) => AttrName::SweepAngle,
            Self::Fill(_) => AttrName::Fill,
            Self::Stroke(_) => AttrName::Stroke,
            Self::StrokeWidth(_) => AttrName::StrokeWidth,
            Self::Text(_) => AttrName::Text,
            Self::Style(_) => AttrName::Style,
            Self::Anchor(_) => AttrName::Anchor,
            Self::Baseline(_) => AttrName::Baseline,
        }
    }

    /// Return the scalar value of a numeric attribute.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Opacity(v)
            | Self::X(v)
            | Self::Y(v)
            | Self::Width(v)
            | Self::Height(v)
            | Self::X1(v)
            | Self::Y1(v)
            | Self::X2(v)
            | Self::Y2(v)
            | Self::Radius(v)
            | Self::InnerRadius(v)
            | Self::OuterRadius(v)
            | Self::StartAngle(v)
            | Self::SweepAngle(v)
            | Self::StrokeWidth(v) => Some(v),
            _ => None,
        }
    }

    /// Whether this attribute jumps to its target when a transition starts instead of
    /// interpolating.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Self::Text(_) | Self::Style(_) | Self::Anchor(_) | Self::Baseline(_)
        )
    }

    fn with_f64(&self, v: f64) -> Self {
        match self {
            Self::Opacity(_) => Self::Opacity(v),
            Self::X(_) => Self::X(v),
            Self::Y(_) => Self::Y(v),
            Self::Width(_) => Self::Width(v),
            Self::Height(_) => Self::Height(v),
            Self::X1(_) => Self::X1(v),
            Self::Y1(_) => Self::Y1(v),
            Self::X2(_) => Self::X2(v),
            Self::Y2(_) => Self::Y2(v),
            Self::Radius(_) => Self::Radius(v),
            Self::InnerRadius(_) => Self::InnerRadius(v),
            Self::OuterRadius(_) => Self::OuterRadius(v),
            Self::StartAngle(_) => Self::StartAngle(v),
            Self::SweepAngle(_) => Self::SweepAngle(v),
            Self::StrokeWidth(_) => Self::StrokeWidth(v),
            other => other.clone(),
        }
    }

    /// Interpolate from `self` towards `to` at progress `t` in `[0, 1]`.
    ///
    /// Mismatched keys and discrete attributes snap to `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        if self.name() != to.name() {
            return to.clone();
        }
        match (self, to) {
            (Self::Translate(a), Self::Translate(b)) => Self::Translate(*a + (*b - *a) * t),
            (Self::Fill(a), Self::Fill(b)) => Self::Fill(lerp_color(*a, *b, t)),
            (Self::Stroke(a), Self::Stroke(b)) => Self::Stroke(lerp_color(*a, *b, t)),
            _ => match (self.as_f64(), to.as_f64()) {
                (Some(a), Some(b)) => to.with_f64(a + (b - a) * t),
                _ => to.clone(),
            },
        }
    }
}

fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let t = t as f32;
    let mut out = [0.0_f32; 4];
    for (i, c) in out.iter_mut().enumerate() {
        *c = a.components[i] + (b.components[i] - a.components[i]) * t;
    }
    Color::new(out)
}

/// A small attribute list; chart geometry rarely sets more than eight at once.
pub type Attrs = SmallVec<[Attr; 8]>;

/// What a surface does with a node once its transition completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionEnd {
    /// Leave the node in place.
    #[default]
    Keep,
    /// Remove the node (and its children) from the surface.
    Remove,
}

/// A timed attribute transition towards a set of target values.
///
/// Scheduling a transition on a node that already has one in flight supersedes it; surfaces are
/// expected to retarget from the node's current state.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Target attribute values.
    pub attrs: Attrs,
    /// How long the interpolation takes.
    pub duration: Duration,
    /// What happens to the node at completion.
    pub on_end: TransitionEnd,
}

impl Transition {
    /// Create a transition that keeps the node after completion.
    pub fn new(attrs: Attrs, duration: Duration) -> Self {
        Self {
            attrs,
            duration,
            on_end: TransitionEnd::Keep,
        }
    }

    /// Remove the node once the transition completes.
    pub fn then_remove(mut self) -> Self {
        self.on_end = TransitionEnd::Remove;
        self
    }
}

/// A retained rendering surface, as seen by the reconciler.
///
/// Implementations own node storage and animation; the reconciler only issues commands.
pub trait Surface {
    /// Create a node of `kind`, appended under `parent` (or as a root when `None`).
    fn create(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId;

    /// Set attributes immediately.
    fn set(&mut self, node: NodeId, attrs: &[Attr]);

    /// Schedule a timed transition, superseding any transition in flight on `node`.
    fn animate(&mut self, node: NodeId, transition: Transition);

    /// Remove a node and its children immediately, abandoning their transitions.
    fn remove(&mut self, node: NodeId);

    /// Remove every child of `node` immediately.
    fn clear_children(&mut self, node: NodeId);

    /// Return whether `node` is still live, including while an exit transition is running.
    fn contains(&self, node: NodeId) -> bool;
}

/// Per-index geometry for one kind of data-bound node.
///
/// This is the only thing a chart variant supplies to [`ShapeSet::join`].
pub trait Encode {
    /// The kind of node created for entering indices.
    fn kind(&self) -> NodeKind;

    /// Attributes applied at creation time, before the node transitions to [`Encode::target`].
    ///
    /// This should be the smallest visual footprint of index `i`.
    fn enter(&self, index: usize) -> Attrs;

    /// Final attributes for index `i`, used for both entering and updating nodes.
    fn target(&self, index: usize) -> Attrs;

    /// Attributes an exiting node transitions to before it is removed.
    fn exit(&self, index: usize) -> Attrs;
}

/// One entry of the enter/update/exit partition produced by [`ShapeSet::join`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeDiff {
    /// A node was created for a new index.
    Enter {
        /// Data index.
        index: usize,
        /// The created node.
        id: NodeId,
    },
    /// An existing node was retargeted to new geometry.
    Update {
        /// Data index.
        index: usize,
        /// The reused node.
        id: NodeId,
    },
    /// A node lost its index and is transitioning out.
    Exit {
        /// Data index the node held before this pass.
        index: usize,
        /// The departing node.
        id: NodeId,
    },
}

impl ShapeDiff {
    /// Return the data index of this entry.
    pub fn index(&self) -> usize {
        match *self {
            Self::Enter { index, .. } | Self::Update { index, .. } | Self::Exit { index, .. } => {
                index
            }
        }
    }

    /// Return the node of this entry.
    pub fn id(&self) -> NodeId {
        match *self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => id,
        }
    }
}

/// Counts of each partition in a diff list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffCounts {
    /// Number of [`ShapeDiff::Enter`] entries.
    pub enter: usize,
    /// Number of [`ShapeDiff::Update`] entries.
    pub update: usize,
    /// Number of [`ShapeDiff::Exit`] entries.
    pub exit: usize,
}

impl DiffCounts {
    /// Tally a diff list.
    pub fn of(diffs: &[ShapeDiff]) -> Self {
        let mut out = Self::default();
        for d in diffs {
            match d {
                ShapeDiff::Enter { .. } => out.enter += 1,
                ShapeDiff::Update { .. } => out.update += 1,
                ShapeDiff::Exit { .. } => out.exit += 1,
            }
        }
        out
    }
}

impl fmt::Display for DiffCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enter={} update={} exit={}",
            self.enter, self.update, self.exit
        )
    }
}

/// The live correspondence between data indices and nodes on a surface.
///
/// Entry `i` is the node currently bound to datum `i`. Nodes past the data length stay in the
/// set as exiting nodes, in index order, until the surface finishes removing them; the next
/// [`ShapeSet::join`] rebinds them before creating anything new.
#[derive(Debug, Default)]
pub struct ShapeSet {
    nodes: Vec<NodeId>,
    exiting: Vec<NodeId>,
}

impl ShapeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of bound nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if no nodes are bound.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the node bound to `index`, if any.
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Return all bound nodes in index order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Return the nodes running an exit transition, in index order after [`ShapeSet::nodes`].
    ///
    /// Nodes the surface has already removed are dropped on the next join.
    pub fn exiting(&self) -> &[NodeId] {
        &self.exiting
    }

    /// Bind `len` data indices to nodes under `parent`, by position.
    ///
    /// Bound nodes come first, followed by nodes still exiting from an earlier join.
    ///
    /// - `Update`: indices covered by a live node retarget it to [`Encode::target`]. An exiting
    ///   node picked up this way is rescued from removal.
    /// - `Enter`: indices past every live node create a node at [`Encode::enter`], then
    ///   transition to the target.
    /// - `Exit`: live nodes past the new length transition to [`Encode::exit`] and are removed
    ///   at completion.
    ///
    /// All transitions share `duration`.
    pub fn join<S, E>(
        &mut self,
        surface: &mut S,
        parent: NodeId,
        len: usize,
        encoder: &E,
        duration: Duration,
    ) -> Vec<ShapeDiff>
    where
        S: Surface + ?Sized,
        E: Encode + ?Sized,
    {
        self.exiting.retain(|id| surface.contains(*id));
        let mut live = core::mem::take(&mut self.nodes);
        live.append(&mut self.exiting);

        let mut diffs = Vec::with_capacity(len.max(live.len()));
        let kept = len.min(live.len());

        for (index, &id) in live[..kept].iter().enumerate() {
            surface.animate(id, Transition::new(encoder.target(index), duration));
            diffs.push(ShapeDiff::Update { index, id });
        }

        self.exiting = live.split_off(kept);
        for (offset, &id) in self.exiting.iter().enumerate() {
            let index = kept + offset;
            surface.animate(
                id,
                Transition::new(encoder.exit(index), duration).then_remove(),
            );
            diffs.push(ShapeDiff::Exit { index, id });
        }

        self.nodes = live;
        for index in kept..len {
            let id = surface.create(Some(parent), encoder.kind());
            surface.set(id, &encoder.enter(index));
            surface.animate(id, Transition::new(encoder.target(index), duration));
            self.nodes.push(id);
            diffs.push(ShapeDiff::Enter { index, id });
        }

        log::trace!("join under {parent:?}: {}", DiffCounts::of(&diffs));
        diffs
    }

    /// Remove every node, bound or exiting, outright and without transitions.
    ///
    /// Returns how many nodes were removed.
    pub fn clear<S>(&mut self, surface: &mut S) -> usize
    where
        S: Surface + ?Sized,
    {
        let mut n = 0;
        for id in self.nodes.drain(..).chain(self.exiting.drain(..)) {
            if surface.contains(id) {
                surface.remove(id);
                n += 1;
            }
        }
        n
    }

    /// Forget every node without touching the surface.
    ///
    /// Use this after the parent has been cleared wholesale.
    pub fn forget(&mut self) {
        self.nodes.clear();
        self.exiting.clear();
    }
}
