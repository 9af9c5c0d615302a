//! Camera and viewport state.
//!
//! The transform is the mutable source of truth behind every published
//! frame snapshot. It lives on the client side; the render thread only ever
//! sees immutable copies embedded in `UpdateParameters`.

use meridian_rendering::Size;

/// Web-mercator world tile size in pixels at zoom 0.
const TILE_SIZE: f64 = 512.0;

/// Latitude limit where the mercator projection stays finite.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Partial camera change; unset fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraOptions {
    /// Target center as (longitude, latitude) degrees.
    pub center: Option<(f64, f64)>,
    /// Target zoom level.
    pub zoom: Option<f64>,
    /// Target bearing in degrees clockwise from north.
    pub bearing: Option<f64>,
    /// Target pitch in degrees from the nadir.
    pub pitch: Option<f64>,
}

/// Mutable camera/viewport state producing frame snapshots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Map center as (longitude, latitude) degrees.
    pub center: (f64, f64),
    /// Zoom level; world width is `512 * 2^zoom` pixels.
    pub zoom: f64,
    /// Bearing in degrees clockwise from north.
    pub bearing: f64,
    /// Pitch in degrees from the nadir.
    pub pitch: f64,
    /// Logical viewport size.
    pub size: Size,
    /// Device pixel ratio.
    pub pixel_ratio: f64,
}

impl TransformState {
    /// Creates a transform at the null island default camera.
    #[must_use]
    pub fn new(size: Size, pixel_ratio: f64) -> Self {
        Self {
            center: (0.0, 0.0),
            zoom: 0.0,
            bearing: 0.0,
            pitch: 0.0,
            size,
            pixel_ratio,
        }
    }

    /// Merges a partial camera change into the current state.
    pub fn apply(&mut self, camera: CameraOptions) {
        if let Some(center) = camera.center {
            self.center = (center.0, center.1.clamp(-MAX_LATITUDE, MAX_LATITUDE));
        }
        if let Some(zoom) = camera.zoom {
            self.zoom = zoom.max(0.0);
        }
        if let Some(bearing) = camera.bearing {
            self.bearing = bearing.rem_euclid(360.0);
        }
        if let Some(pitch) = camera.pitch {
            self.pitch = pitch.clamp(0.0, 60.0);
        }
    }

    /// World size in pixels at the current zoom.
    #[must_use]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Projects (longitude, latitude) degrees to world pixels.
    #[must_use]
    pub fn project(&self, lonlat: (f64, f64)) -> (f64, f64) {
        let world = self.world_size();
        let lat = lonlat.1.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = world * (0.5 + lonlat.0 / 360.0);
        let y = world * (0.5 - ((lat.tan() + 1.0 / lat.cos()).ln()) / (2.0 * std::f64::consts::PI));
        (x, y)
    }

    /// Unprojects world pixels back to (longitude, latitude) degrees.
    #[must_use]
    pub fn unproject(&self, point: (f64, f64)) -> (f64, f64) {
        let world = self.world_size();
        let lon = 360.0 * (point.0 / world - 0.5);
        let lat = (std::f64::consts::PI * (1.0 - 2.0 * point.1 / world))
            .sinh()
            .atan()
            .to_degrees();
        (lon, lat.clamp(-MAX_LATITUDE, MAX_LATITUDE))
    }

    /// Shifts the center by a screen-pixel offset at the current zoom.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.project(self.center);
        self.center = self.unproject((x - dx, y - dy));
    }
}
