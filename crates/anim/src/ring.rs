use crate::config::AnimationConfig;
use crate::motion::RingSample;
use glam::Vec3;
use ringflow_common::{Color, Transform};

/// One animated torus.
///
/// Rings are created once at startup and reused across every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub color: Color,
    pub activation_delay_ms: f64,
    pub activated: bool,
    pub transform: Transform,
    pub opacity: f32,
}

impl Ring {
    pub fn new(color: Color, activation_delay_ms: f64, initial_z: f32) -> Self {
        Self {
            color,
            activation_delay_ms,
            activated: false,
            transform: Transform::from_position(Vec3::new(0.0, 0.0, initial_z)),
            opacity: 1.0,
        }
    }

    /// Build the ring list described by `config`, one per colour.
    pub fn spawn_all(config: &AnimationConfig) -> Vec<Ring> {
        let initial_z = config.initial_z() as f32;
        config
            .colors
            .iter()
            .enumerate()
            .map(|(i, &color)| Ring::new(color, config.activation_delay_ms(i), initial_z))
            .collect()
    }

    /// Whether the ring's delay has elapsed at `now_ms`.
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms >= self.activation_delay_ms
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale.x
    }

    pub(crate) fn apply(&mut self, sample: RingSample) {
        self.transform.position.z = sample.z;
        self.transform.set_uniform_scale(sample.scale);
        self.opacity = sample.opacity;
    }
}

/// Render-side view of an active ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingInstance {
    pub index: usize,
    pub color: Color,
    pub transform: Transform,
    pub opacity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_all_staggers_delays() {
        let config = AnimationConfig::default();
        let rings = Ring::spawn_all(&config);
        assert_eq!(rings.len(), 4);
        assert_eq!(rings[0].color, Color::GREEN);
        assert_eq!(rings[3].color, Color::MAGENTA);
        for (i, ring) in rings.iter().enumerate() {
            assert_eq!(ring.activation_delay_ms, config.activation_delay_ms(i));
            assert!(!ring.activated);
            assert_eq!(ring.opacity, 1.0);
            assert_eq!(ring.scale(), 1.0);
            assert_eq!(ring.transform.position.z, -0.25);
        }
    }

    #[test]
    fn due_once_delay_elapsed() {
        let ring = Ring::new(Color::RED, 500.0, 0.0);
        assert!(!ring.is_due(499.9));
        assert!(ring.is_due(500.0));
        assert!(ring.is_due(10_000.0));
    }

    #[test]
    fn apply_writes_depth_scale_and_opacity() {
        let mut ring = Ring::new(Color::BLUE, 0.0, -0.25);
        ring.apply(RingSample {
            z: -1.0,
            opacity: 0.5,
            scale: 0.8,
        });
        assert_eq!(ring.transform.position, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ring.transform.scale, Vec3::splat(0.8));
        assert_eq!(ring.opacity, 0.5);
    }
}
