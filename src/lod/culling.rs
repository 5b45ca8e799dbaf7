//! Visibility culling against an extended frustum
//!
//! The frustum is deliberately wider than the screen. The selected buffer
//! is drawn for several frames after it was computed, so points just
//! outside the view must already be present when the camera turns.

use crate::point::Point;
use crate::view::ViewParameters;
use glam::{Vec4, Vec4Swizzles};

/// Why the culler rejected a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullReason {
    /// Homogeneous w < 0
    BehindNearPlane,
    /// |x| or |y| beyond the extended frustum after perspective division
    OutsideExtendedFrustum,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// Clip-space position after perspective division (w kept as-is)
    Visible(Vec4),
    Culled(CullReason),
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible(_))
    }
}

/// Project a point and test it against the near plane and extended frustum.
///
/// Only strict comparisons reject: `w == 0` and `|x| == extent` pass. With
/// `w == 0` the division is skipped and the homogeneous x/y are tested.
#[inline]
pub fn cull_point(point: &Point, view: &ViewParameters) -> Visibility {
    let clip = view.transform * point.position().extend(1.0);

    if clip.w < 0.0 {
        return Visibility::Culled(CullReason::BehindNearPlane);
    }

    let projected = if clip.w != 0.0 {
        (clip.xyz() / clip.w).extend(clip.w)
    } else {
        clip
    };

    let extent = view.frustum_extent;
    if projected.x.abs() > extent || projected.y.abs() > extent {
        return Visibility::Culled(CullReason::OutsideExtendedFrustum);
    }

    Visibility::Visible(projected)
}
