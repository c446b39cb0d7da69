use gallery_common::Rgb;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Number of particles floating in the hall.
pub const PARTICLE_COUNT: usize = 900;
/// Rotation rate of the whole field about the vertical axis, radians per second.
pub const PARTICLE_DRIFT: f32 = 0.06;

/// A field of small translucent points that slowly turns about the world Y axis.
///
/// Positions are generated once; only `rotation_y` changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    rotation_y: f32,
    pub size: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub drift: f32,
}

impl ParticleField {
    /// Scatter `count` points over a 55 × 55 footprint between 0.2 and 5.7 units high.
    ///
    /// Same seed, same field.
    pub fn scatter(count: usize, seed: u64) -> Self {
        let mut rng = SplitMix64::new(seed);
        let positions = (0..count)
            .map(|_| {
                let x = (rng.next_f32() - 0.5) * 55.0;
                let y = rng.next_f32() * 5.5 + 0.2;
                let z = (rng.next_f32() - 0.5) * 55.0;
                Vec3::new(x, y, z)
            })
            .collect();
        Self {
            positions,
            rotation_y: 0.0,
            size: 0.035,
            color: Rgb::WHITE,
            opacity: 0.45,
            drift: PARTICLE_DRIFT,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Turn the field by `drift * dt`. Wrapped to one turn to keep precision on long sessions.
    pub fn advance(&mut self, dt: f32) {
        self.rotation_y = (self.rotation_y + dt * self.drift).rem_euclid(TAU);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }
}

/// Splitmix64 stream: a small deterministic generator for scatter positions.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1). Uses the top 24 bits so every value is exactly representable.
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_produces_requested_count() {
        let f = ParticleField::scatter(PARTICLE_COUNT, 42);
        assert_eq!(f.len(), 900);
        assert_eq!(f.opacity, 0.45);
        assert_eq!(f.size, 0.035);
    }

    #[test]
    fn scatter_stays_in_volume() {
        let f = ParticleField::scatter(PARTICLE_COUNT, 7);
        for p in f.positions() {
            assert!(p.x >= -27.5 && p.x <= 27.5, "x out of range: {}", p.x);
            assert!(p.z >= -27.5 && p.z <= 27.5, "z out of range: {}", p.z);
            assert!(p.y >= 0.2 && p.y <= 5.7, "y out of range: {}", p.y);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::scatter(64, 99);
        let b = ParticleField::scatter(64, 99);
        assert_eq!(a, b);
        let c = ParticleField::scatter(64, 100);
        assert_ne!(a.positions(), c.positions());
    }

    #[test]
    fn advance_rotates_at_drift_rate() {
        let mut f = ParticleField::scatter(1, 1);
        f.advance(1.0);
        assert!((f.rotation_y() - 0.06).abs() < 1e-6);
        f.advance(0.5);
        assert!((f.rotation_y() - 0.09).abs() < 1e-6);
    }

    #[test]
    fn rotation_wraps_after_full_turn() {
        let mut f = ParticleField::scatter(1, 1);
        // 0.06 rad/s needs ~104.7 s per turn
        for _ in 0..110 {
            f.advance(1.0);
        }
        assert!(f.rotation_y() >= 0.0 && f.rotation_y() < TAU);
        assert!((f.rotation_y() - (6.6 - TAU)).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_does_not_rotate() {
        let mut f = ParticleField::scatter(1, 1);
        f.advance(0.0);
        assert_eq!(f.rotation_y(), 0.0);
    }
}
