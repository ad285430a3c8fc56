//! Value-to-angle mapping and needle polygon construction.
//!
//! # Angle Convention
//!
//! Angles are in degrees, counter-clockwise from the +x axis, with the screen's
//! y axis pointing down. The mapping is reversed: a gauge's minimum sits at
//! 225° (lower left) and its maximum at -45° (lower right), so values sweep
//! clockwise over the top of the dial and the bottom 90° stay free for the
//! label cutout.
//!
//! # Needle Shape
//!
//! A needle is a segment of the face ring, 6° wide, built from three rays
//! intersected with the inner and outer radius:
//!
//! ```text
//! 0----1----2     outer arc
//! |   /|\   |
//! |  / | \  |
//! | /  |  \ |
//! |/   |   \|
//! 3----4----5     inner arc
//! ```
//!
//! The point order is fixed; [`Needle::triangles`] relies on it.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{ANGLE_AT_MAX_DEG, ANGLE_AT_MIN_DEG, NEEDLE_HALF_WIDTH_DEG, PIVOT_OFFSET_DEG};
use crate::gauge::GaugeConfig;

const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;

// =============================================================================
// Value <-> Angle
// =============================================================================

/// Map a gauge value onto its needle angle.
///
/// Out-of-range values are not clamped; they produce angles beyond the sweep.
/// Range checking belongs to [`crate::range`].
pub fn angle_of(
    config: &GaugeConfig,
    value: f32,
) -> f32 {
    let t = (value - config.min) / (config.max - config.min);
    t * (ANGLE_AT_MAX_DEG - ANGLE_AT_MIN_DEG) + ANGLE_AT_MIN_DEG - PIVOT_OFFSET_DEG
}

/// Map a needle angle back onto a gauge value. Inverse of [`angle_of`].
pub fn inverse_angle_of(
    config: &GaugeConfig,
    angle: f32,
) -> f32 {
    map_f(
        angle + PIVOT_OFFSET_DEG,
        ANGLE_AT_MIN_DEG,
        ANGLE_AT_MAX_DEG,
        config.min,
        config.max,
    )
}

/// Floating point linear remap of `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
pub fn map_f(
    x: f32,
    in_min: f32,
    in_max: f32,
    out_min: f32,
    out_max: f32,
) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Compare two floats with a fixed tolerance of `1e-4`.
#[inline]
pub fn roughly_equal(
    a: f32,
    b: f32,
) -> bool {
    (a - b).abs() < 0.0001
}

// =============================================================================
// Needle Polygon
// =============================================================================

/// Six-vertex needle polygon in screen coordinates.
///
/// Equality is structural, so two needles compare equal exactly when they would
/// cover the same pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Needle {
    points: [Point; 6],
}

impl Needle {
    pub const OUTER_LEFT: usize = 0;
    pub const OUTER_MID: usize = 1;
    pub const OUTER_RIGHT: usize = 2;
    pub const INNER_LEFT: usize = 3;
    pub const INNER_MID: usize = 4;
    pub const INNER_RIGHT: usize = 5;

    pub const fn from_points(points: [Point; 6]) -> Self { Self { points } }

    #[inline]
    pub const fn points(&self) -> &[Point; 6] { &self.points }

    /// The four triangles that tile the needle, in paint order.
    pub const fn triangles(&self) -> [[Point; 3]; 4] {
        let p = &self.points;
        [
            [p[Self::OUTER_LEFT], p[Self::OUTER_MID], p[Self::INNER_LEFT]],
            [p[Self::INNER_LEFT], p[Self::INNER_MID], p[Self::OUTER_MID]],
            [p[Self::OUTER_MID], p[Self::OUTER_RIGHT], p[Self::INNER_RIGHT]],
            [p[Self::INNER_MID], p[Self::INNER_RIGHT], p[Self::OUTER_MID]],
        ]
    }

    /// Smallest rectangle containing every vertex.
    pub fn bounding_box(&self) -> Rectangle {
        let mut top_left = self.points[0];
        let mut bottom_right = self.points[0];
        for p in &self.points[1..] {
            top_left = top_left.component_min(*p);
            bottom_right = bottom_right.component_max(*p);
        }
        Rectangle::with_corners(top_left, bottom_right)
    }

    /// Conservative overlap test on bounding boxes.
    ///
    /// May report an overlap for needles that only share box corners, never
    /// misses a real one.
    pub fn overlaps(
        &self,
        other: &Self,
    ) -> bool {
        let a = self.bounding_box();
        let b = other.bounding_box();
        !a.intersection(&b).is_zero_sized()
    }
}

/// Build the needle polygon for `angle` around `origin`.
pub fn build_needle(
    origin: Point,
    angle: f32,
    inner_radius: u32,
    outer_radius: u32,
) -> Needle {
    let left = ray(angle - NEEDLE_HALF_WIDTH_DEG);
    let mid = ray(angle);
    let right = ray(angle + NEEDLE_HALF_WIDTH_DEG);

    let at = |(cos, sin): (f32, f32), radius: u32| -> Point {
        let r = radius as f32;
        Point::new(origin.x + (r * cos) as i32, origin.y - (r * sin) as i32)
    };

    Needle::from_points([
        at(left, outer_radius),
        at(mid, outer_radius),
        at(right, outer_radius),
        at(left, inner_radius),
        at(mid, inner_radius),
        at(right, inner_radius),
    ])
}

#[inline]
fn ray(angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg * DEG_TO_RAD;
    (libm::cosf(rad), libm::sinf(rad))
}
