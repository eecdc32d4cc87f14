// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A chart glyph anchored to one map coordinate.

use alloc::vec::Vec;

use mapglyph_core::{Attr, DiffCounts, NodeId, NodeKind, ShapeSet, Surface, Transition};
use mapglyph_transforms::ConfigError;
use smallvec::smallvec;

use crate::chart_spec::{ChartOptions, ChartSpec, ChartType};
use crate::geometry::{ChartGeometry, LabelEncoder, translate};
use crate::map::{LatLng, MapHost, SubscriptionId};

/// Render state of an attached glyph.
#[derive(Debug)]
struct Attached {
    subscription: SubscriptionId,
    container: NodeId,
    /// Chart type of the last reconciliation pass, `None` until the first one.
    drawn: Option<ChartType>,
    guide: Option<NodeId>,
    shapes: ShapeSet,
    labels: ShapeSet,
}

#[derive(Debug)]
enum State {
    Detached,
    Attached(Attached),
}

/// A bar, pie or polar chart drawn at a fixed [`LatLng`].
///
/// A glyph starts detached. [`Glyph::attach`] creates its container on a surface and
/// subscribes to viewport changes; from then on every [`Glyph::update_options`] and
/// [`Glyph::viewport_changed`] runs a reset: data is normalized, the container moves to the
/// anchor's projected position, and shapes and labels are reconciled by index. A reset that
/// changes the chart type clears every shape first and rebuilds from scratch.
/// [`Glyph::detach`] consumes the glyph.
#[derive(Debug)]
pub struct Glyph {
    anchor: LatLng,
    spec: ChartSpec,
    state: State,
}

impl Glyph {
    /// Create a detached glyph.
    pub fn new(anchor: LatLng, spec: ChartSpec) -> Self {
        Self {
            anchor,
            spec,
            state: State::Detached,
        }
    }

    /// Return the anchor coordinate.
    pub fn anchor(&self) -> LatLng {
        self.anchor
    }

    /// Return the current configuration.
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    /// Return whether the glyph is attached to a surface.
    pub fn is_attached(&self) -> bool {
        matches!(self.state, State::Attached(_))
    }

    /// Return the container node, if attached.
    pub fn container(&self) -> Option<NodeId> {
        match &self.state {
            State::Attached(a) => Some(a.container),
            State::Detached => None,
        }
    }

    /// Return the viewport subscription, if attached.
    pub fn subscription(&self) -> Option<SubscriptionId> {
        match &self.state {
            State::Attached(a) => Some(a.subscription),
            State::Detached => None,
        }
    }

    /// Return the nodes currently bound to data values, if attached.
    pub fn shapes(&self) -> Option<&ShapeSet> {
        match &self.state {
            State::Attached(a) => Some(&a.shapes),
            State::Detached => None,
        }
    }

    /// Return the nodes currently bound to labels, if attached.
    pub fn labels(&self) -> Option<&ShapeSet> {
        match &self.state {
            State::Attached(a) => Some(&a.labels),
            State::Detached => None,
        }
    }

    /// Return the static guide node (zero line or reference circle), if drawn.
    pub fn guide(&self) -> Option<NodeId> {
        match &self.state {
            State::Attached(a) => a.guide,
            State::Detached => None,
        }
    }

    /// Attach to `surface`, subscribe to `map` viewport changes, and draw.
    ///
    /// The data is validated first; on error nothing is created and the glyph stays detached.
    /// Attaching an attached glyph does nothing.
    pub fn attach<M, S>(
        &mut self,
        map: &mut M,
        surface: &mut S,
    ) -> Result<DiffCounts, ConfigError>
    where
        M: MapHost + ?Sized,
        S: Surface + ?Sized,
    {
        if self.is_attached() {
            log::warn!("glyph at {:?} is already attached", self.anchor);
            return Ok(DiffCounts::default());
        }
        let values = self.spec.normalized()?;

        let container = surface.create(None, NodeKind::Group);
        let subscription = map.on_viewport_change();
        log::debug!(
            "attach glyph at {:?}: container {container:?}, {subscription:?}",
            self.anchor
        );
        self.state = State::Attached(Attached {
            subscription,
            container,
            drawn: None,
            guide: None,
            shapes: ShapeSet::new(),
            labels: ShapeSet::new(),
        });
        Ok(self.reset(&values, &*map, surface))
    }

    /// Merge `options` into the configuration and redraw.
    ///
    /// The merged configuration is validated before it is adopted: on error the previous
    /// configuration and everything drawn from it stay untouched. A detached glyph only
    /// stores the new configuration.
    pub fn update_options<M, S>(
        &mut self,
        options: &ChartOptions,
        map: &M,
        surface: &mut S,
    ) -> Result<DiffCounts, ConfigError>
    where
        M: MapHost + ?Sized,
        S: Surface + ?Sized,
    {
        let spec = self.spec.merged(options);
        let values = spec.normalized()?;
        self.spec = spec;
        if !self.is_attached() {
            return Ok(DiffCounts::default());
        }
        Ok(self.reset(&values, map, surface))
    }

    /// Redraw after the map viewport moved.
    ///
    /// Ignored while detached.
    pub fn viewport_changed<M, S>(
        &mut self,
        map: &M,
        surface: &mut S,
    ) -> Result<DiffCounts, ConfigError>
    where
        M: MapHost + ?Sized,
        S: Surface + ?Sized,
    {
        if !self.is_attached() {
            return Ok(DiffCounts::default());
        }
        let values = self.spec.normalized()?;
        Ok(self.reset(&values, map, surface))
    }

    /// Unsubscribe from `map` and remove everything drawn from `surface`.
    ///
    /// Transitions still running on the glyph's nodes are abandoned with them.
    pub fn detach<M, S>(self, map: &mut M, surface: &mut S)
    where
        M: MapHost + ?Sized,
        S: Surface + ?Sized,
    {
        let State::Attached(attached) = self.state else {
            return;
        };
        log::debug!("detach glyph at {:?}", self.anchor);
        map.off_viewport_change(attached.subscription);
        surface.remove(attached.container);
    }

    /// One reconciliation pass over already validated `values`.
    fn reset<M, S>(&mut self, values: &[f64], map: &M, surface: &mut S) -> DiffCounts
    where
        M: MapHost + ?Sized,
        S: Surface + ?Sized,
    {
        let State::Attached(a) = &mut self.state else {
            return DiffCounts::default();
        };
        let spec = &self.spec;
        let duration = spec.transition();

        let rebuild = a.drawn != Some(spec.chart_type);
        if rebuild {
            surface.clear_children(a.container);
            a.shapes.forget();
            a.labels.forget();
            a.guide = None;
        }

        let geometry = ChartGeometry::new(spec, values);
        let origin = geometry.origin(map.project(self.anchor));
        surface.set(a.container, &[translate(origin)]);
        surface.animate(
            a.container,
            Transition::new(smallvec![Attr::Opacity(spec.opacity)], duration),
        );

        let container = a.container;
        let guide = *a
            .guide
            .get_or_insert_with(|| surface.create(Some(container), geometry.guide_kind()));
        surface.set(guide, &geometry.guide());

        let diffs = a
            .shapes
            .join(surface, container, values.len(), &geometry, duration);

        let label_counts = if spec.label {
            let labels = LabelEncoder {
                geometry: &geometry,
                raw: &spec.data,
                style: &spec.label_style,
            };
            DiffCounts::of(&a.labels.join(surface, container, values.len(), &labels, duration))
        } else {
            let removed = a.labels.clear(surface);
            if removed > 0 {
                log::debug!("removed {removed} labels at {:?}", self.anchor);
            }
            DiffCounts::default()
        };

        a.drawn = Some(spec.chart_type);
        let counts = DiffCounts::of(&diffs);
        log::debug!(
            "reset {:?} glyph at {:?}: {} values, rebuild={rebuild}, shapes {counts}, labels {label_counts}",
            spec.chart_type,
            self.anchor,
            values.len()
        );
        counts
    }
}

/// Deliver a viewport change to every glyph still subscribed on `map`.
///
/// Glyphs whose subscription is not in `subscribers` are skipped. The first configuration
/// error stops delivery and is returned.
pub fn notify_viewport_change<'g, M, S>(
    glyphs: impl IntoIterator<Item = &'g mut Glyph>,
    subscribers: &[SubscriptionId],
    map: &M,
    surface: &mut S,
) -> Result<Vec<DiffCounts>, ConfigError>
where
    M: MapHost + ?Sized,
    S: Surface + ?Sized,
{
    let mut out = Vec::new();
    for glyph in glyphs {
        if glyph
            .subscription()
            .is_some_and(|id| subscribers.contains(&id))
        {
            out.push(glyph.viewport_changed(map, surface)?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::String;
    use core::f64::consts::TAU;
    use core::time::Duration;
    use kurbo::{Rect, Size, Vec2};
    use mapglyph_core::{AttrName, MemorySurface};

    const ANCHOR: LatLng = LatLng::new(0.0, 0.0);

    fn map() -> crate::WebMercatorMap {
        crate::WebMercatorMap::new(ANCHOR, 4.0, Size::new(512.0, 512.0))
    }

    fn attached(options: ChartOptions) -> (crate::WebMercatorMap, MemorySurface, Glyph) {
        let mut map = map();
        let mut surface = MemorySurface::instant();
        let mut glyph = Glyph::new(ANCHOR, ChartSpec::default().merged(&options));
        glyph.attach(&mut map, &mut surface).unwrap();
        (map, surface, glyph)
    }

    fn rects(surface: &MemorySurface, glyph: &Glyph) -> Vec<Rect> {
        surface
            .children_of_kind(glyph.container().unwrap(), NodeKind::Rect)
            .iter()
            .filter_map(|(_, n)| n.rect())
            .collect()
    }

    fn texts(surface: &MemorySurface, glyph: &Glyph) -> Vec<String> {
        surface
            .children_of_kind(glyph.container().unwrap(), NodeKind::Text)
            .iter()
            .filter_map(|(_, n)| n.text().map(String::from))
            .collect()
    }

    fn count(surface: &MemorySurface, glyph: &Glyph, kind: NodeKind) -> usize {
        surface
            .children_of_kind(glyph.container().unwrap(), kind)
            .len()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn assert_rect(r: Rect, expected: Rect) {
        assert_close(r.x0, expected.x0);
        assert_close(r.y0, expected.y0);
        assert_close(r.x1, expected.x1);
        assert_close(r.y1, expected.y1);
    }

    #[test]
    fn half_of_max_draws_a_half_height_bar() {
        let (map, surface, glyph) =
            attached(ChartOptions::new().with_data(1.0).with_max_values(2.0));

        let rects = rects(&surface, &glyph);
        assert_eq!(rects.len(), 1);
        assert_rect(rects[0], Rect::new(0.0, -20.0, 40.0, 0.0));

        let anchor = map.project(ANCHOR);
        let container = surface.node(glyph.container().unwrap()).unwrap();
        assert_eq!(
            container.translate(),
            Some(Vec2::new(anchor.x - 20.0, anchor.y))
        );
        assert_eq!(container.f64(AttrName::Opacity), Some(1.0));
        assert_eq!(count(&surface, &glyph, NodeKind::Line), 1);
    }

    #[test]
    fn bars_share_the_box_width() {
        let (_map, surface, glyph) =
            attached(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values([1.0]));

        let rects = rects(&surface, &glyph);
        assert_eq!(rects.len(), 3);
        let bw = 40.0 / 3.0;
        for (i, r) in rects.iter().enumerate() {
            let h = 40.0 * (i + 1) as f64;
            assert_rect(*r, Rect::new(i as f64 * bw, -h, (i + 1) as f64 * bw, 0.0));
        }
    }

    #[test]
    fn shrinking_data_exits_the_tail() {
        let (map, mut surface, mut glyph) =
            attached(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values(1.0));

        let counts = glyph
            .update_options(&ChartOptions::new().with_data(5.0), &map, &mut surface)
            .unwrap();
        assert_eq!((counts.enter, counts.update, counts.exit), (0, 1, 2));
        assert_eq!(glyph.shapes().unwrap().len(), 1);

        let rects = rects(&surface, &glyph);
        assert_eq!(rects.len(), 1);
        assert_rect(rects[0], Rect::new(0.0, -200.0, 40.0, 0.0));
    }

    #[test]
    fn same_length_updates_reuse_nodes_by_index() {
        let (map, mut surface, mut glyph) =
            attached(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values(3.0));
        let before = glyph.shapes().unwrap().nodes().to_vec();
        let stats = surface.stats();

        let counts = glyph
            .update_options(
                &ChartOptions::new().with_data([3.0, 2.0, 1.0]),
                &map,
                &mut surface,
            )
            .unwrap();
        assert_eq!((counts.enter, counts.update, counts.exit), (0, 3, 0));
        assert_eq!(glyph.shapes().unwrap().nodes(), &before[..]);
        assert_eq!(surface.stats().created, stats.created);
        assert_eq!(surface.stats().removed, stats.removed);

        let first = surface.node(before[0]).unwrap();
        assert_eq!(first.f64(AttrName::Height), Some(40.0));
    }

    #[test]
    fn negative_values_hang_below_the_zero_line() {
        let (_map, surface, glyph) =
            attached(ChartOptions::new().with_data([-1.0, 1.0]).with_max_values(2.0));

        let rects = rects(&surface, &glyph);
        assert_rect(rects[0], Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_rect(rects[1], Rect::new(20.0, -20.0, 40.0, 0.0));
    }

    #[test]
    fn changing_type_rebuilds_from_scratch() {
        let (map, mut surface, mut glyph) =
            attached(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values(6.0));
        let old_guide = glyph.guide().unwrap();

        let counts = glyph
            .update_options(
                &ChartOptions::new().with_type(ChartType::Pie),
                &map,
                &mut surface,
            )
            .unwrap();
        assert_eq!((counts.enter, counts.update, counts.exit), (3, 0, 0));
        assert!(!surface.contains(old_guide));
        assert_eq!(count(&surface, &glyph, NodeKind::Rect), 0);
        assert_eq!(count(&surface, &glyph, NodeKind::Line), 0);
        assert_eq!(count(&surface, &glyph, NodeKind::Circle), 1);

        let sectors: Vec<_> = surface
            .children_of_kind(glyph.container().unwrap(), NodeKind::Sector)
            .iter()
            .filter_map(|(_, n)| n.sector())
            .collect();
        assert_eq!(sectors.len(), 3);
        let total: f64 = sectors.iter().map(|s| s.sweep_angle).sum();
        assert_close(total, TAU);
        assert_close(sectors[0].outer_radius, 20.0);

        let anchor = map.project(ANCHOR);
        let container = surface.node(glyph.container().unwrap()).unwrap();
        assert_eq!(container.translate(), Some(anchor.to_vec2()));
    }

    #[test]
    fn same_type_updates_keep_the_guide() {
        let (map, mut surface, mut glyph) = attached(
            ChartOptions::new()
                .with_type(ChartType::PolarArea)
                .with_data([1.0, 0.25])
                .with_max_values(1.0),
        );
        let guide = glyph.guide().unwrap();

        let outer = |surface: &MemorySurface, glyph: &Glyph| -> Vec<f64> {
            surface
                .children_of_kind(glyph.container().unwrap(), NodeKind::Sector)
                .iter()
                .filter_map(|(_, n)| n.sector())
                .map(|s| s.outer_radius)
                .collect()
        };
        assert_eq!(outer(&surface, &glyph), [20.0, 10.0]);

        let _ = glyph
            .update_options(
                &ChartOptions::new().with_data([0.25, 1.0]),
                &map,
                &mut surface,
            )
            .unwrap();
        assert_eq!(glyph.guide(), Some(guide));
        assert_eq!(outer(&surface, &glyph), [10.0, 20.0]);
    }

    #[test]
    fn invalid_maxima_leave_everything_untouched() {
        let (map, mut surface, mut glyph) =
            attached(ChartOptions::new().with_data([1.0, 2.0]).with_max_values(4.0));
        let spec = glyph.spec().clone();
        let stats = surface.stats();

        let err = glyph
            .update_options(
                &ChartOptions::new()
                    .with_data([1.0, 2.0, 3.0])
                    .with_max_values([1.0, 2.0]),
                &map,
                &mut surface,
            )
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MaxValuesLength {
                data: 3,
                max_values: 2
            }
        );
        assert_eq!(glyph.spec(), &spec);
        assert_eq!(surface.stats(), stats);
        assert_eq!(rects(&surface, &glyph).len(), 2);
    }

    #[test]
    fn failed_attach_creates_nothing() {
        let mut map = map();
        let mut surface = MemorySurface::instant();
        let mut glyph = Glyph::new(
            ANCHOR,
            ChartSpec::default().merged(
                &ChartOptions::new()
                    .with_data([1.0, 2.0, 3.0])
                    .with_max_values([1.0, 2.0]),
            ),
        );

        assert!(glyph.attach(&mut map, &mut surface).is_err());
        assert!(!glyph.is_attached());
        assert!(surface.is_empty());
        assert!(map.subscribers().is_empty());
    }

    #[test]
    fn detached_glyphs_only_store_options() {
        let map = map();
        let mut surface = MemorySurface::instant();
        let mut glyph = Glyph::new(ANCHOR, ChartSpec::default());

        let counts = glyph
            .update_options(&ChartOptions::new().with_data(7.0), &map, &mut surface)
            .unwrap();
        assert_eq!(counts, DiffCounts::default());
        assert_eq!(glyph.spec().data.as_slice(), &[7.0]);
        assert!(surface.is_empty());
        assert!(glyph.shapes().is_none());
    }

    #[test]
    fn labels_follow_their_values() {
        let (map, mut surface, mut glyph) = attached(
            ChartOptions::new()
                .with_data([1.0, 2.5, 3.0])
                .with_max_values(3.0)
                .with_label(true),
        );
        assert_eq!(texts(&surface, &glyph), ["1", "2.5", "3"]);
        let labels = surface.children_of_kind(glyph.container().unwrap(), NodeKind::Text);
        assert_eq!(labels[0].1.style(), Some("fill:white;font-size:8px;"));
        assert_eq!(labels[0].1.f64(AttrName::Opacity), Some(1.0));

        let _ = glyph
            .update_options(&ChartOptions::new().with_data(4.0), &map, &mut surface)
            .unwrap();
        assert_eq!(texts(&surface, &glyph), ["4"]);

        let _ = glyph
            .update_options(&ChartOptions::new().with_label(false), &map, &mut surface)
            .unwrap();
        assert!(texts(&surface, &glyph).is_empty());
        assert!(glyph.labels().unwrap().is_empty());
        assert_eq!(rects(&surface, &glyph).len(), 1);
    }

    #[test]
    fn labels_survive_a_type_change() {
        let (map, mut surface, mut glyph) = attached(
            ChartOptions::new()
                .with_data([1.0, 1.0])
                .with_max_values(2.0)
                .with_label(true),
        );
        let _ = glyph
            .update_options(
                &ChartOptions::new().with_type(ChartType::PolarRadius),
                &map,
                &mut surface,
            )
            .unwrap();
        assert_eq!(texts(&surface, &glyph), ["1", "1"]);
        assert_eq!(glyph.labels().unwrap().len(), 2);
    }

    #[test]
    fn viewport_changes_move_the_container() {
        let (mut map, mut surface, mut glyph) =
            attached(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values(3.0));
        let mut idle = Glyph::new(ANCHOR, ChartSpec::default());
        let container = glyph.container().unwrap();
        let before = surface.node(container).unwrap().translate().unwrap();

        let subscribers = map.pan_by(Vec2::new(50.0, -20.0)).to_vec();
        let counts = notify_viewport_change(
            [&mut glyph, &mut idle],
            &subscribers,
            &map,
            &mut surface,
        )
        .unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].update, 3);

        let after = surface.node(container).unwrap().translate().unwrap();
        assert!((after.x - (before.x - 50.0)).abs() < 1e-6);
        assert!((after.y - (before.y + 20.0)).abs() < 1e-6);
        assert!(!idle.is_attached());
    }

    #[test]
    fn detach_unsubscribes_and_removes_everything() {
        let (mut map, mut surface, glyph) = attached(
            ChartOptions::new()
                .with_data([1.0, 2.0])
                .with_max_values(2.0)
                .with_label(true),
        );
        let subscription = glyph.subscription().unwrap();
        assert!(map.is_subscribed(subscription));

        glyph.detach(&mut map, &mut surface);
        assert!(!map.is_subscribed(subscription));
        assert!(surface.is_empty());
    }

    #[test]
    fn tweened_bars_grow_and_exit_over_time() {
        let mut map = map();
        let mut surface = MemorySurface::tweened();
        let mut glyph = Glyph::new(
            ANCHOR,
            ChartSpec::default().merged(
                &ChartOptions::new()
                    .with_data([1.0, 1.0])
                    .with_max_values(2.0)
                    .with_label(true),
            ),
        );
        let _ = glyph.attach(&mut map, &mut surface).unwrap();

        let first = glyph.shapes().unwrap().get(0).unwrap();
        assert_eq!(surface.node(first).unwrap().f64(AttrName::Height), Some(0.0));
        assert!(surface.is_animating(first));

        surface.advance(Duration::from_millis(375));
        let mid = surface.node(first).unwrap().f64(AttrName::Height).unwrap();
        assert_close(mid, 10.0);

        surface.advance(Duration::from_millis(375));
        assert_eq!(surface.node(first).unwrap().f64(AttrName::Height), Some(20.0));
        assert_eq!(surface.pending_transitions(), 0);

        let counts = glyph
            .update_options(&ChartOptions::new().with_data(1.0), &map, &mut surface)
            .unwrap();
        assert_eq!(counts.exit, 1);
        assert_eq!(glyph.shapes().unwrap().len(), 1);
        assert_eq!(rects(&surface, &glyph).len(), 2);
        assert_eq!(texts(&surface, &glyph).len(), 2);

        surface.advance(Duration::from_millis(750));
        assert_eq!(rects(&surface, &glyph).len(), 1);
        assert_eq!(texts(&surface, &glyph).len(), 1);
    }

    fn tweened(options: ChartOptions) -> (crate::WebMercatorMap, MemorySurface, Glyph) {
        let mut map = map();
        let mut surface = MemorySurface::tweened();
        let mut glyph = Glyph::new(ANCHOR, ChartSpec::default().merged(&options));
        let _ = glyph.attach(&mut map, &mut surface).unwrap();
        surface.advance(Duration::from_millis(750));
        (map, surface, glyph)
    }

    #[test]
    fn regrowing_during_an_exit_rebinds_the_exiting_bars() {
        let (map, mut surface, mut glyph) =
            tweened(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values(3.0));
        let nodes = glyph.shapes().unwrap().nodes().to_vec();
        let created = surface.stats().created;

        let _ = glyph
            .update_options(&ChartOptions::new().with_data(1.0), &map, &mut surface)
            .unwrap();
        assert_eq!(glyph.shapes().unwrap().exiting(), &nodes[1..]);
        surface.advance(Duration::from_millis(100));

        let counts = glyph
            .update_options(
                &ChartOptions::new().with_data([1.0, 2.0, 3.0]),
                &map,
                &mut surface,
            )
            .unwrap();
        assert_eq!((counts.enter, counts.update, counts.exit), (0, 3, 0));
        assert_eq!(glyph.shapes().unwrap().nodes(), &nodes[..]);
        assert_eq!(rects(&surface, &glyph).len(), 3);

        surface.advance(Duration::from_millis(750));
        let rects = rects(&surface, &glyph);
        assert_eq!(rects.len(), 3);
        assert_close(rects[2].height(), 40.0);
        assert_eq!(surface.stats().created, created);
    }

    #[test]
    fn turning_labels_off_during_an_exit_removes_every_label() {
        let (map, mut surface, mut glyph) = tweened(
            ChartOptions::new()
                .with_data([1.0, 2.0])
                .with_max_values(2.0)
                .with_label(true),
        );

        let _ = glyph
            .update_options(&ChartOptions::new().with_data(1.0), &map, &mut surface)
            .unwrap();
        surface.advance(Duration::from_millis(100));
        assert_eq!(texts(&surface, &glyph).len(), 2);

        let _ = glyph
            .update_options(&ChartOptions::new().with_label(false), &map, &mut surface)
            .unwrap();
        assert!(texts(&surface, &glyph).is_empty());
        assert!(glyph.labels().unwrap().exiting().is_empty());
        assert_eq!(rects(&surface, &glyph).len(), 2);
    }

    #[test]
    fn viewport_changes_during_an_exit_keep_exiting_bars_leaving() {
        let (mut map, mut surface, mut glyph) =
            tweened(ChartOptions::new().with_data([1.0, 2.0, 3.0]).with_max_values(3.0));
        let container = glyph.container().unwrap();
        let before = surface.node(container).unwrap().translate().unwrap();

        let _ = glyph
            .update_options(&ChartOptions::new().with_data(1.0), &map, &mut surface)
            .unwrap();
        surface.advance(Duration::from_millis(100));

        let subscribers = map.pan_by(Vec2::new(30.0, 0.0)).to_vec();
        let counts =
            notify_viewport_change([&mut glyph], &subscribers, &map, &mut surface).unwrap();
        assert_eq!((counts[0].enter, counts[0].update, counts[0].exit), (0, 1, 2));
        assert_eq!(rects(&surface, &glyph).len(), 3);

        let after = surface.node(container).unwrap().translate().unwrap();
        assert!((after.x - (before.x - 30.0)).abs() < 1e-6);

        surface.advance(Duration::from_millis(750));
        assert_eq!(rects(&surface, &glyph).len(), 1);
        assert_eq!(glyph.shapes().unwrap().len(), 1);
    }
}
