// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-map seam: projection and viewport-change subscriptions.

use alloc::vec::Vec;
use core::f64::consts::PI;

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude, positive north.
    pub lat: f64,
    /// Longitude, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Create a coordinate.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Handle for one viewport-change subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// What a glyph needs from the map it is drawn on.
pub trait MapHost {
    /// Project a coordinate onto the surface the glyph draws into.
    fn project(&self, at: LatLng) -> Point;

    /// Start receiving viewport-change notifications.
    fn on_viewport_change(&mut self) -> SubscriptionId;

    /// Stop receiving viewport-change notifications.
    fn off_viewport_change(&mut self, id: SubscriptionId);
}

/// Latitude limit of the square spherical Mercator world.
const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// World size in pixels at zoom `0`.
const TILE_SIZE: f64 = 256.0;

/// A spherical Web Mercator map viewport.
///
/// Projected points are in layer coordinates: pixels relative to the top-left corner of the
/// viewport as it was at the last view change. Every view change notifies all subscribers
/// through the returned id list; the caller delivers them (for example by calling
/// [`Glyph::viewport_changed`](crate::Glyph::viewport_changed) on each subscribed glyph).
#[derive(Clone, Debug)]
pub struct WebMercatorMap {
    center: LatLng,
    zoom: f64,
    size: Size,
    pixel_origin: Point,
    subscribers: Vec<SubscriptionId>,
    next_subscription: u64,
}

impl WebMercatorMap {
    /// Create a viewport of `size` pixels centered on `center`.
    pub fn new(center: LatLng, zoom: f64, size: Size) -> Self {
        let mut map = Self {
            center,
            zoom,
            size,
            pixel_origin: Point::ORIGIN,
            subscribers: Vec::new(),
            next_subscription: 1,
        };
        map.pixel_origin = map.compute_pixel_origin();
        map
    }

    /// Return the view center.
    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Return the zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Return the active subscriptions.
    pub fn subscribers(&self) -> &[SubscriptionId] {
        &self.subscribers
    }

    /// Return whether `id` is subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.contains(&id)
    }

    /// Move and zoom the view; returns the subscriptions to notify.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> &[SubscriptionId] {
        self.center = center;
        self.zoom = zoom;
        self.pixel_origin = self.compute_pixel_origin();
        &self.subscribers
    }

    /// Pan the view by a pixel offset; returns the subscriptions to notify.
    pub fn pan_by(&mut self, offset: Vec2) -> &[SubscriptionId] {
        let c = self.project_world(self.center) + offset;
        let center = self.unproject_world(c);
        let zoom = self.zoom;
        self.set_view(center, zoom)
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Project to absolute world pixels at the current zoom.
    fn project_world(&self, at: LatLng) -> Point {
        let lat = at.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = (lat * PI / 180.0).sin();
        let x = (at.lng + 180.0) / 360.0;
        let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI);
        let scale = self.world_size();
        Point::new(x * scale, y * scale)
    }

    fn unproject_world(&self, p: Point) -> LatLng {
        let scale = self.world_size();
        let lng = p.x / scale * 360.0 - 180.0;
        let y = (0.5 - p.y / scale) * 2.0 * PI;
        let lat = (2.0 * y.exp().atan() - PI / 2.0) * 180.0 / PI;
        LatLng::new(lat, lng)
    }

    fn compute_pixel_origin(&self) -> Point {
        self.project_world(self.center) - self.size.to_vec2() / 2.0
    }
}

impl MapHost for WebMercatorMap {
    fn project(&self, at: LatLng) -> Point {
        (self.project_world(at) - self.pixel_origin).to_point()
    }

    fn on_viewport_change(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(id);
        id
    }

    fn off_viewport_change(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| *s != id);
    }
}
