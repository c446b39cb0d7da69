use gallery_common::Rgb;
use glam::Vec3;

/// A cone light aimed from `position` at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: Rgb,
    pub intensity: f32,
    /// Distance at which the light fades to zero.
    pub range: f32,
    /// Half-angle of the outer cone, radians.
    pub angle: f32,
    /// Fraction of the cone that softens toward the edge, 0..=1.
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl SpotLight {
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Cosine of the cone edge and of the start of the penumbra falloff.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.cos();
        let inner = (self.angle * (1.0 - self.penumbra)).cos();
        (outer, inner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    Point {
        color: Rgb,
        intensity: f32,
        range: f32,
        decay: f32,
        position: Vec3,
    },
    Spot(SpotLight),
}

impl Light {
    /// Point light with the default inverse-square style decay.
    pub fn point(hex: u32, intensity: f32, range: f32, position: Vec3) -> Self {
        Self::Point {
            color: Rgb::from_hex(hex),
            intensity,
            range,
            decay: 2.0,
            position,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Ambient { color, .. } | Self::Point { color, .. } => *color,
            Self::Spot(s) => s.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_direction_points_at_target() {
        let s = SpotLight {
            color: Rgb::WHITE,
            intensity: 1.0,
            range: 10.0,
            angle: std::f32::consts::FRAC_PI_6,
            penumbra: 0.4,
            decay: 1.2,
            position: Vec3::new(0.0, 2.0, 0.0),
            target: Vec3::ZERO,
        };
        assert!((s.direction() - Vec3::NEG_Y).length() < 1e-6);
        let (outer, inner) = s.cone_cosines();
        assert!(inner > outer);
    }

    #[test]
    fn point_helper_uses_decay_two() {
        let l = Light::point(0x7c3aed, 1.6, 60.0, Vec3::new(0.0, 2.5, -24.0));
        assert!(matches!(l, Light::Point { decay, .. } if decay == 2.0));
        assert_eq!(l.color(), Rgb::from_hex(0x7c3aed));
    }
}
