//! Admission gate: one keep/discard verdict per point
//!
//! Culling runs first and short-circuits, so off-screen points never pay
//! for the world transform or the exp2 in the spacing model.

use super::culling::{cull_point, CullReason, Visibility};
use super::spacing::SpacingSample;
use crate::point::Point;
use crate::view::ViewParameters;
use glam::Vec4Swizzles;

/// Terminal state of a point after evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Culled(CullReason),
    /// Visible, but finer than the view needs
    SpacingRejected,
    Admitted,
}

impl Verdict {
    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted)
    }
}

/// Run the culler and, for visible points, the spacing model
#[inline]
pub fn evaluate_point(point: &Point, view: &ViewParameters) -> Verdict {
    let projected = match cull_point(point, view) {
        Visibility::Visible(projected) => projected,
        Visibility::Culled(reason) => return Verdict::Culled(reason),
    };

    if SpacingSample::evaluate(point, projected.xy(), view).is_too_fine() {
        Verdict::SpacingRejected
    } else {
        Verdict::Admitted
    }
}
