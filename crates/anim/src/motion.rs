//! Per-frame depth, opacity and scale of an active ring.

use crate::config::AnimationConfig;
use crate::ring::Ring;

/// Ring state at one point of its cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSample {
    pub z: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl AnimationConfig {
    /// Position within the current loop, in `[0, loop_duration)`.
    pub fn cycle_position(&self, elapsed_secs: f64) -> f64 {
        elapsed_secs.rem_euclid(self.loop_duration_secs())
    }

    /// Sample depth, opacity and scale at `cycle_pos` seconds into a loop.
    pub fn sample(&self, cycle_pos: f64) -> RingSample {
        let loop_duration = self.loop_duration_secs();
        let progress = cycle_pos / loop_duration;

        let z = self.initial_z() - progress * self.total_distance * self.velocity;

        let fade_start = loop_duration - self.dissolve_duration_secs;
        let opacity = if cycle_pos >= fade_start {
            1.0 - (cycle_pos - fade_start) / self.dissolve_duration_secs
        } else {
            1.0
        };

        let scale = if z <= self.travel_boundary_z() {
            1.0
        } else {
            1.0 - progress / 2.5
        };

        RingSample {
            z: z as f32,
            opacity: opacity.clamp(0.0, 1.0) as f32,
            scale: scale as f32,
        }
    }

    /// Sample a ring activated at `activation_delay_ms`, at absolute time `now_ms`.
    pub fn sample_at(&self, now_ms: f64, activation_delay_ms: f64) -> RingSample {
        let elapsed = (now_ms - activation_delay_ms) / 1000.0;
        self.sample(self.cycle_position(elapsed))
    }
}

/// Move, fade and scale every active ring for time `now_ms`.
pub fn advance(rings: &mut [Ring], config: &AnimationConfig, now_ms: f64) {
    for ring in rings.iter_mut().filter(|r| r.activated) {
        ring.apply(config.sample_at(now_ms, ring.activation_delay_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn cycle_start_is_at_rest() {
        let config = AnimationConfig::default();
        let s = config.sample(0.0);
        assert!(approx(s.z, -0.25));
        assert_eq!(s.opacity, 1.0);
        assert_eq!(s.scale, 1.0);
    }

    #[test]
    fn depth_decreases_within_a_cycle() {
        let config = AnimationConfig::default();
        let l = config.loop_duration_secs();
        let mut last = f32::INFINITY;
        for step in 0..100 {
            let z = config.sample(l * step as f64 / 100.0).z;
            assert!(z < last);
            last = z;
        }
        // total_distance * velocity short of the start, just before the wrap
        assert!(approx(config.sample(l * 0.999_999).z, -0.25 - 2.75));
    }

    #[test]
    fn opacity_is_full_until_dissolve_starts() {
        let config = AnimationConfig::default();
        let fade_start = config.loop_duration_secs() - 15.0;
        assert_eq!(config.sample(0.0).opacity, 1.0);
        assert_eq!(config.sample(fade_start - 0.01).opacity, 1.0);
        assert!(approx(config.sample(fade_start).opacity, 1.0));
    }

    #[test]
    fn opacity_mid_dissolve() {
        let config = AnimationConfig::default();
        let l = config.loop_duration_secs();
        let expected = 1.0 - (30.0 - (l - 15.0)) / 15.0;
        let s = config.sample(30.0);
        assert!(approx(s.opacity, expected as f32));
        assert!(approx(s.opacity, 0.4444));
    }

    #[test]
    fn opacity_stays_in_unit_range() {
        let config = AnimationConfig::default();
        for step in 0..10_000 {
            let now_ms = step as f64 * 37.3 - 5_000.0;
            let s = config.sample_at(now_ms, 0.0);
            assert!((0.0..=1.0).contains(&s.opacity), "{now_ms}: {}", s.opacity);
            assert!(s.scale > 0.0);
        }
    }

    #[test]
    fn opacity_fades_to_zero_at_cycle_end() {
        let config = AnimationConfig::default();
        let s = config.sample(config.loop_duration_secs() - 1e-9);
        assert!(s.opacity < 1e-4);
    }

    #[test]
    fn scale_shrinks_monotonically_toward_sixty_percent() {
        let config = AnimationConfig::default();
        let l = config.loop_duration_secs();
        let mut last = f32::INFINITY;
        for step in 0..100 {
            let scale = config.sample(l * step as f64 / 100.0).scale;
            assert!(scale < last);
            last = scale;
        }
        assert!(approx(config.sample(l * 0.999_999).scale, 0.6));
    }

    #[test]
    fn scale_resets_past_travel_boundary() {
        // velocity 1.0 makes the ring cover the whole distance in one loop
        let config = AnimationConfig {
            velocity: 1.0,
            ..Default::default()
        };
        let l = config.loop_duration_secs();
        assert!(config.sample(l * 0.5).scale < 1.0);
        let far = AnimationConfig {
            velocity: 2.0,
            ..Default::default()
        };
        let s = far.sample(l * 0.75);
        assert!(s.z as f64 <= far.travel_boundary_z());
        assert_eq!(s.scale, 1.0);
    }

    #[test]
    fn loop_is_periodic() {
        let config = AnimationConfig::default();
        let l = config.loop_duration_secs();
        assert_eq!(config.cycle_position(l), 0.0);
        assert_eq!(config.sample(config.cycle_position(l)), config.sample(0.0));

        let delay = config.activation_delay_ms(2);
        let a = config.sample_at(delay + 1_000.0, delay);
        let b = config.sample_at(delay + 1_000.0 + 2.0 * l * 1000.0, delay);
        assert!(approx(a.z, b.z));
        assert!(approx(a.opacity, b.opacity));
        assert!(approx(a.scale, b.scale));
    }

    #[test]
    fn negative_elapsed_wraps_into_the_cycle() {
        let config = AnimationConfig::default();
        let pos = config.cycle_position(-1.0);
        assert!(pos >= 0.0 && pos < config.loop_duration_secs());
    }
}
