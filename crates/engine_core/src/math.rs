//! Small vector helpers with well-defined behavior on degenerate input.

use glam::{Quat, Vec3};

/// Lengths at or below this are treated as zero by [`safe_normalize`].
pub const NORMALIZE_EPSILON: f32 = 1e-5;

/// Normalize `v`, returning `Vec3::ZERO` for zero-length or non-finite input.
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length.is_finite() && length > NORMALIZE_EPSILON {
        v / length
    } else {
        Vec3::ZERO
    }
}

/// Rotation of `degrees` about `axis`. The axis need not be unit length.
///
/// A zero-length axis has no defined rotation plane, so the identity is returned.
pub fn angle_axis(degrees: f32, axis: Vec3) -> Quat {
    let axis = safe_normalize(axis);
    if axis == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, degrees.to_radians())
}
