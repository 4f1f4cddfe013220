//! Collision detection and response against a rotating square
//!
//! Detection happens in the square's local space where the walls are
//! axis-aligned. Response reflects the velocity about the collision normal,
//! with the normal and the velocity expressed in the same space.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::frame::RotatingFrame;
use crate::error::SimError;

/// Which space the velocity reflection is computed in
///
/// Both give the same result up to rounding. `Global` rotates the normal out
/// of the frame, `Local` rotates the velocity into it and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReflectSpace {
    #[default]
    Global,
    Local,
}

/// Result of a boundary check
#[derive(Debug, Clone)]
pub struct BoundaryContact {
    /// Whether any wall was penetrated
    pub hit: bool,
    /// Local position after clamping inside the boundary
    pub local: DVec2,
    /// Unit normal in local space, pointing back into the square
    pub normal: DVec2,
    /// Deepest per-axis penetration (for diagnostics)
    pub penetration: f64,
}

impl BoundaryContact {
    pub fn miss(local: DVec2) -> Self {
        Self {
            hit: false,
            local,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Both axes were penetrated in the same step
    pub fn is_corner(&self) -> bool {
        self.hit && self.normal.x != 0.0 && self.normal.y != 0.0
    }
}

/// Clamp a local position into `[-bound, bound]²` and report the normal
///
/// Axes are tested independently, so a corner hit flags both components and
/// the normal ends up on the diagonal. A coordinate exactly on the boundary
/// is not a hit.
pub fn resolve_square_boundary(local: DVec2, bound: f64) -> BoundaryContact {
    let mut corrected = local;
    let mut normal = DVec2::ZERO;
    let mut penetration: f64 = 0.0;

    if local.x < -bound {
        normal.x = 1.0;
        corrected.x = -bound;
        penetration = penetration.max(-bound - local.x);
    } else if local.x > bound {
        normal.x = -1.0;
        corrected.x = bound;
        penetration = penetration.max(local.x - bound);
    }

    if local.y < -bound {
        normal.y = 1.0;
        corrected.y = -bound;
        penetration = penetration.max(-bound - local.y);
    } else if local.y > bound {
        normal.y = -1.0;
        corrected.y = bound;
        penetration = penetration.max(local.y - bound);
    }

    if normal == DVec2::ZERO {
        return BoundaryContact::miss(local);
    }

    BoundaryContact {
        hit: true,
        local: corrected,
        normal: normal.normalize(),
        penetration,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, `normal` must be unit length
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect about a normal of any non-zero length
pub fn try_reflect(velocity: DVec2, normal: DVec2) -> Result<DVec2, SimError> {
    let unit = normal.try_normalize().ok_or(SimError::DegenerateNormal)?;
    Ok(reflect_velocity(velocity, unit))
}

/// Reflect a global velocity off the frame's wall given a local normal
pub fn reflect_in_frame(
    frame: &RotatingFrame,
    velocity: DVec2,
    local_normal: DVec2,
    space: ReflectSpace,
) -> Result<DVec2, SimError> {
    match space {
        ReflectSpace::Global => {
            let normal = frame.velocity_to_global(local_normal);
            try_reflect(velocity, normal)
        }
        ReflectSpace::Local => {
            let local_velocity = frame.velocity_to_local(velocity);
            let reflected = try_reflect(local_velocity, local_normal)?;
            Ok(frame.velocity_to_global(reflected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_inside_is_miss() {
        let contact = resolve_square_boundary(DVec2::new(10.0, -10.0), 180.0);
        assert!(!contact.hit);
        assert_eq!(contact.local, DVec2::new(10.0, -10.0));
        assert_eq!(contact.normal, DVec2::ZERO);
    }

    #[test]
    fn test_exactly_on_boundary_is_miss() {
        assert!(!resolve_square_boundary(DVec2::new(180.0, 0.0), 180.0).hit);
        assert!(!resolve_square_boundary(DVec2::new(-180.0, 180.0), 180.0).hit);
    }

    #[test]
    fn test_right_wall() {
        let contact = resolve_square_boundary(DVec2::new(184.0, 12.0), 180.0);
        assert!(contact.hit);
        assert!(!contact.is_corner());
        assert_eq!(contact.local, DVec2::new(180.0, 12.0));
        assert_eq!(contact.normal, DVec2::new(-1.0, 0.0));
        assert_eq!(contact.penetration, 4.0);
    }

    #[test]
    fn test_bottom_left_corner() {
        let contact = resolve_square_boundary(DVec2::new(-185.0, -181.0), 180.0);
        assert!(contact.is_corner());
        assert_eq!(contact.local, DVec2::new(-180.0, -180.0));
        let expected = DVec2::new(1.0, 1.0).normalize();
        assert!((contact.normal - expected).length() < 1e-12);
        assert_eq!(contact.penetration, 5.0);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(DVec2::new(100.0, 0.0), DVec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 1e-12);
        assert!(reflected.y.abs() < 1e-12);
    }

    #[test]
    fn test_try_reflect_degenerate() {
        assert!(matches!(
            try_reflect(DVec2::new(1.0, 2.0), DVec2::ZERO),
            Err(SimError::DegenerateNormal)
        ));
        let v = try_reflect(DVec2::new(0.0, -5.0), DVec2::new(0.0, 3.0)).unwrap();
        assert!((v - DVec2::new(0.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn test_reflect_in_frame_rotated_wall() {
        // Square turned 45°: the local right wall faces up-right in global space
        let frame = RotatingFrame::new(DVec2::ZERO, 100.0)
            .and_then(|f| f.with_angle(FRAC_PI_4))
            .unwrap();
        let velocity = DVec2::new(1.0, 1.0);
        let reflected =
            reflect_in_frame(&frame, velocity, DVec2::new(-1.0, 0.0), ReflectSpace::Global)
                .unwrap();
        assert!((reflected - DVec2::new(-1.0, -1.0)).length() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_reflect_spaces_agree(
            vx in -50.0f64..50.0,
            vy in -50.0f64..50.0,
            angle in 0.0f64..std::f64::consts::TAU,
            nx in prop::sample::select(vec![-1.0f64, 0.0, 1.0]),
            ny in prop::sample::select(vec![-1.0f64, 1.0]),
        ) {
            let frame = RotatingFrame::new(DVec2::new(400.0, 400.0), 200.0)
                .and_then(|f| f.with_angle(angle))
                .unwrap();
            let velocity = DVec2::new(vx, vy);
            let normal = DVec2::new(nx, ny).normalize();
            let global = reflect_in_frame(&frame, velocity, normal, ReflectSpace::Global).unwrap();
            let local = reflect_in_frame(&frame, velocity, normal, ReflectSpace::Local).unwrap();
            prop_assert!((global - local).length() <= 1e-9 * velocity.length().max(1.0));
            prop_assert!((global.length() - velocity.length()).abs() <= 1e-9 * velocity.length().max(1.0));
        }
    }
}
