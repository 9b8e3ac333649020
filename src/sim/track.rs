//! Track boundary construction from a detected plane
//!
//! The first detected horizontal plane becomes the play mat; its rectangular
//! perimeter gets four collidable walls. Plane updates rebuild all four
//! walls as one operation so the scene never shows a partial boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::WALL_LIFT;

/// Opaque identity of an AR plane anchor, assigned by the host's tracking
/// service. Used to tell "the tracked plane grew" apart from "a second
/// plane appeared".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// A detected flat surface: center plus half-extent-style sizes.
///
/// `extent_width` spans the local X axis, `extent_height` the local Z axis
/// (the plane lies in XZ, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneRegion {
    pub center: Vec3,
    pub extent_width: f32,
    pub extent_height: f32,
}

impl PlaneRegion {
    pub fn new(center: Vec3, extent_width: f32, extent_height: f32) -> Self {
        Self {
            center,
            extent_width,
            extent_height,
        }
    }

    /// A usable region has finite, non-negative extents and a finite center
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.extent_width.is_finite()
            && self.extent_height.is_finite()
            && self.extent_width >= 0.0
            && self.extent_height >= 0.0
    }
}

/// Which way a wall runs along the mat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Runs along the region's Z extent (left/right walls)
    Lengthwise,
    /// Runs along the region's X extent (top/bottom walls)
    Widthwise,
}

/// A static collidable boundary segment.
///
/// Cross-section is fixed: [`crate::consts::WALL_THICKNESS`] wide and
/// [`crate::consts::WALL_HEIGHT`] tall; the host builds wall geometry from
/// those plus `length`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub length: f32,
    pub orientation: WallOrientation,
    pub position: Vec3,
}

/// Compute the four perimeter walls for a plane region at the stock
/// [`WALL_LIFT`].
pub fn build_walls(region: &PlaneRegion) -> [Wall; 4] {
    build_walls_lifted(region, WALL_LIFT)
}

/// Compute the four perimeter walls for a plane region.
///
/// Top/bottom walls run widthwise at `center.z ± extent_height / 2`;
/// left/right walls run lengthwise at `center.x ± extent_width / 2`. Every
/// wall is lifted by `lift` so it sits just above the mat surface, on
/// first build and rebuilds alike.
pub fn build_walls_lifted(region: &PlaneRegion, lift: f32) -> [Wall; 4] {
    let c = region.center;
    let half_w = region.extent_width / 2.0;
    let half_h = region.extent_height / 2.0;

    let top = Wall {
        length: region.extent_width,
        orientation: WallOrientation::Widthwise,
        position: Vec3::new(c.x, c.y + lift, c.z - half_h),
    };
    let bottom = Wall {
        length: region.extent_width,
        orientation: WallOrientation::Widthwise,
        position: Vec3::new(c.x, c.y + lift, c.z + half_h),
    };
    let left = Wall {
        length: region.extent_height,
        orientation: WallOrientation::Lengthwise,
        position: Vec3::new(c.x - half_w, c.y + lift, c.z),
    };
    let right = Wall {
        length: region.extent_height,
        orientation: WallOrientation::Lengthwise,
        position: Vec3::new(c.x + half_w, c.y + lift, c.z),
    };

    [top, bottom, left, right]
}

/// The tracked plane and its current boundary walls.
///
/// At most one plane is tracked at a time; the session enforces
/// first-plane-wins before constructing this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackState {
    anchor: AnchorId,
    region: PlaneRegion,
    walls: [Wall; 4],
    lift: f32,
}

impl TrackState {
    pub fn new(anchor: AnchorId, region: PlaneRegion) -> Self {
        Self::with_lift(anchor, region, WALL_LIFT)
    }

    /// Track with a host-tuned wall lift, used on every build and rebuild
    pub fn with_lift(anchor: AnchorId, region: PlaneRegion, lift: f32) -> Self {
        Self {
            anchor,
            region,
            walls: build_walls_lifted(&region, lift),
            lift,
        }
    }

    #[inline]
    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    #[inline]
    pub fn region(&self) -> &PlaneRegion {
        &self.region
    }

    #[inline]
    pub fn walls(&self) -> &[Wall; 4] {
        &self.walls
    }

    /// Replace the region and recompute all four walls in one step.
    ///
    /// The wall array is overwritten wholesale; an observer of this state
    /// sees either the old four or the new four, never a partial set.
    pub fn update(&mut self, region: PlaneRegion) -> &[Wall; 4] {
        self.region = region;
        self.walls = build_walls_lifted(&region, self.lift);
        &self.walls
    }
}
