// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Surface`] with optional timed playback.

use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::{Circle, CircleSegment, Line, Point, Rect, Shape, Vec2};
use peniko::Color;

use crate::{
    Attr, AttrName, Attrs, NodeId, NodeKind, Surface, TextBaseline, Transition, TransitionEnd,
};

/// How a [`MemorySurface`] plays transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    /// Target attributes are applied as soon as a transition is scheduled.
    Instant,
    /// Transitions interpolate as time is fed in through [`MemorySurface::advance`].
    Tweened,
}

/// Running totals of structural work done on a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Nodes created.
    pub created: u64,
    /// Nodes removed, including descendants of removed nodes.
    pub removed: u64,
    /// Transitions scheduled.
    pub animated: u64,
    /// Transitions that superseded one still in flight.
    pub retargeted: u64,
}

/// Current state of one node on a [`MemorySurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
    /// The node kind.
    pub kind: NodeKind,
    /// The parent node, if any.
    pub parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: Attrs,
}

impl NodeSnapshot {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            attrs: Attrs::new(),
        }
    }

    fn apply(&mut self, attr: Attr) {
        let name = attr.name();
        match self.attrs.iter_mut().find(|a| a.name() == name) {
            Some(slot) => *slot = attr,
            None => self.attrs.push(attr),
        }
    }

    /// Return every attribute currently set.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Return an attribute by key.
    pub fn get(&self, name: AttrName) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name() == name)
    }

    /// Return a numeric attribute by key.
    pub fn f64(&self, name: AttrName) -> Option<f64> {
        self.get(name).and_then(Attr::as_f64)
    }

    /// Return the text content, if set.
    pub fn text(&self) -> Option<&str> {
        match self.get(AttrName::Text)? {
            Attr::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Return the style string, if set.
    pub fn style(&self) -> Option<&str> {
        match self.get(AttrName::Style)? {
            Attr::Style(s) => Some(s),
            _ => None,
        }
    }

    /// Return the fill paint, if set.
    pub fn fill(&self) -> Option<Color> {
        match self.get(AttrName::Fill)? {
            Attr::Fill(c) => Some(*c),
            _ => None,
        }
    }

    /// Return the stroke paint, if set.
    pub fn stroke(&self) -> Option<Color> {
        match self.get(AttrName::Stroke)? {
            Attr::Stroke(c) => Some(*c),
            _ => None,
        }
    }

    /// Return the text baseline, if set.
    pub fn baseline(&self) -> Option<TextBaseline> {
        match self.get(AttrName::Baseline)? {
            Attr::Baseline(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the group translation, if set.
    pub fn translate(&self) -> Option<Vec2> {
        match self.get(AttrName::Translate)? {
            Attr::Translate(v) => Some(*v),
            _ => None,
        }
    }

    fn f64_or_zero(&self, name: AttrName) -> f64 {
        self.f64(name).unwrap_or(0.0)
    }

    /// Rect geometry in the parent's coordinates (rect nodes only).
    ///
    /// Negative extents are normalized so `x0 <= x1` and `y0 <= y1`.
    pub fn rect(&self) -> Option<Rect> {
        if self.kind != NodeKind::Rect {
            return None;
        }
        let x = self.f64_or_zero(AttrName::X);
        let y = self.f64_or_zero(AttrName::Y);
        let w = self.f64_or_zero(AttrName::Width);
        let h = self.f64_or_zero(AttrName::Height);
        Some(Rect::new(
            x.min(x + w),
            y.min(y + h),
            x.max(x + w),
            y.max(y + h),
        ))
    }

    /// Segment geometry (line nodes only).
    pub fn line(&self) -> Option<Line> {
        if self.kind != NodeKind::Line {
            return None;
        }
        Some(Line::new(
            (self.f64_or_zero(AttrName::X1), self.f64_or_zero(AttrName::Y1)),
            (self.f64_or_zero(AttrName::X2), self.f64_or_zero(AttrName::Y2)),
        ))
    }

    /// Sector geometry centered on the node origin (sector nodes only).
    pub fn sector(&self) -> Option<CircleSegment> {
        if self.kind != NodeKind::Sector {
            return None;
        }
        Some(CircleSegment::new(
            Point::ORIGIN,
            self.f64_or_zero(AttrName::OuterRadius),
            self.f64_or_zero(AttrName::InnerRadius),
            self.f64_or_zero(AttrName::StartAngle),
            self.f64_or_zero(AttrName::SweepAngle),
        ))
    }

    /// Circle geometry centered on the node origin (circle nodes only).
    pub fn circle(&self) -> Option<Circle> {
        if self.kind != NodeKind::Circle {
            return None;
        }
        Some(Circle::new(Point::ORIGIN, self.f64_or_zero(AttrName::Radius)))
    }

    /// Optional bounds hint in the parent's coordinates.
    pub fn bounds(&self) -> Option<Rect> {
        match self.kind {
            NodeKind::Rect => self.rect(),
            NodeKind::Line => self.line().map(|l| l.bounding_box()),
            NodeKind::Sector => self.sector().map(|s| s.bounding_box()),
            NodeKind::Circle => self.circle().map(|c| c.bounding_box()),
            // Text layout is downstream; groups have no geometry of their own.
            NodeKind::Text | NodeKind::Group => None,
        }
    }
}

#[derive(Debug)]
struct Tween {
    from: Attrs,
    to: Attrs,
    elapsed: Duration,
    duration: Duration,
    on_end: TransitionEnd,
}

/// A retained node tree held in memory.
///
/// With [`Playback::Instant`] every transition completes synchronously, which makes the
/// reconciler observable without a clock. With [`Playback::Tweened`] transitions progress with
/// cubic in-out easing as [`MemorySurface::advance`] is called.
#[derive(Debug)]
pub struct MemorySurface {
    playback: Playback,
    nodes: HashMap<NodeId, NodeSnapshot>,
    tweens: HashMap<NodeId, Tween>,
    next_id: u64,
    stats: SurfaceStats,
}

impl MemorySurface {
    /// Create a surface with the given playback mode.
    pub fn new(playback: Playback) -> Self {
        Self {
            playback,
            nodes: HashMap::new(),
            tweens: HashMap::new(),
            next_id: 1,
            stats: SurfaceStats::default(),
        }
    }

    /// Convenience for [`Playback::Instant`].
    pub fn instant() -> Self {
        Self::new(Playback::Instant)
    }

    /// Convenience for [`Playback::Tweened`].
    pub fn tweened() -> Self {
        Self::new(Playback::Tweened)
    }

    /// Return the playback mode.
    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Return a node's current state, if it exists.
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.get(&id)
    }

    /// Return whether a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Return the children of a node in creation order (empty for unknown nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[][..], |n| n.children.as_slice())
    }

    /// Return the children of a node with the given kind.
    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<(NodeId, &NodeSnapshot)> {
        self.children(id)
            .iter()
            .filter_map(|c| self.nodes.get(c).map(|n| (*c, n)))
            .filter(|(_, n)| n.kind == kind)
            .collect()
    }

    /// Return the total number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if the surface holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return whether a transition is in flight on `id`.
    pub fn is_animating(&self, id: NodeId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Return the number of transitions in flight.
    pub fn pending_transitions(&self) -> usize {
        self.tweens.len()
    }

    /// Return structural counters.
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Progress every in-flight transition by `dt`.
    ///
    /// Completed transitions are dropped; those ending in [`TransitionEnd::Remove`] remove
    /// their node.
    pub fn advance(&mut self, dt: Duration) {
        let mut finished = Vec::new();
        for (id, tween) in &mut self.tweens {
            tween.elapsed = tween.elapsed.saturating_add(dt);
            let t = if tween.duration.is_zero() || tween.elapsed >= tween.duration {
                1.0
            } else {
                tween.elapsed.as_secs_f64() / tween.duration.as_secs_f64()
            };
            let eased = cubic_in_out(t);
            if let Some(node) = self.nodes.get_mut(id) {
                for (from, to) in tween.from.iter().zip(tween.to.iter()) {
                    node.apply(from.lerp(to, eased));
                }
            }
            if t >= 1.0 {
                finished.push((*id, tween.on_end));
            }
        }
        for (id, on_end) in finished {
            self.tweens.remove(&id);
            if on_end == TransitionEnd::Remove {
                self.remove(id);
            }
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        self.tweens.remove(&id);
        self.stats.removed += 1;
        for child in node.children {
            self.remove_subtree(child);
        }
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::instant()
    }
}

impl Surface for MemorySurface {
    fn create(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let parent = parent.filter(|p| {
            let known = self.nodes.contains_key(p);
            if !known {
                log::warn!("create under unknown node {p:?}; creating a root instead");
            }
            known
        });
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        self.nodes.insert(id, NodeSnapshot::new(kind, parent));
        self.stats.created += 1;
        id
    }

    fn set(&mut self, node: NodeId, attrs: &[Attr]) {
        let Some(n) = self.nodes.get_mut(&node) else {
            log::warn!("set on unknown node {node:?}");
            return;
        };
        for a in attrs {
            n.apply(a.clone());
        }
    }

    fn animate(&mut self, node: NodeId, transition: Transition) {
        let Some(n) = self.nodes.get_mut(&node) else {
            log::warn!("animate on unknown node {node:?}");
            return;
        };
        self.stats.animated += 1;

        if self.playback == Playback::Instant {
            self.tweens.remove(&node);
            for a in transition.attrs {
                n.apply(a);
            }
            if transition.on_end == TransitionEnd::Remove {
                self.remove(node);
            }
            return;
        }

        let mut from = Attrs::new();
        let mut to = Attrs::new();
        for a in transition.attrs {
            if a.is_discrete() {
                n.apply(a);
                continue;
            }
            from.push(n.get(a.name()).cloned().unwrap_or_else(|| a.clone()));
            to.push(a);
        }
        let tween = Tween {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: transition.duration,
            on_end: transition.on_end,
        };
        if self.tweens.insert(node, tween).is_some() {
            self.stats.retargeted += 1;
        }
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(&node).map(|n| n.parent) else {
            log::warn!("remove of unknown node {node:?}");
            return;
        };
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        self.remove_subtree(node);
    }

    fn clear_children(&mut self, node: NodeId) {
        let Some(n) = self.nodes.get_mut(&node) else {
            log::warn!("clear_children on unknown node {node:?}");
            return;
        };
        let children = core::mem::take(&mut n.children);
        for child in children {
            self.remove_subtree(child);
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }
}

/// Cubic in-out easing, as used by common SVG transition libraries.
fn cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
