//! Animation constants and their derived timings.

use ringflow_common::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating an [`AnimationConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("at least one ring colour is required")]
    NoColors,
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("velocity must be a non-negative finite number, got {0}")]
    BadVelocity(f64),
    #[error("dissolve duration {dissolve}s exceeds the loop duration {loop_duration}s")]
    DissolveTooLong { dissolve: f64, loop_duration: f64 },
}

/// Every tunable of the ring animation.
///
/// `speed` sets the loop duration and the activation stagger. `velocity`
/// scales how far a ring actually travels within one loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// One ring is spawned per colour, in order.
    pub colors: Vec<Color>,
    pub camera_z: f64,
    /// Rings start this far in front of the camera.
    pub start_offset: f64,
    pub total_distance: f64,
    /// Units per second.
    pub speed: f64,
    pub velocity: f64,
    pub dissolve_duration_secs: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            colors: vec![Color::GREEN, Color::RED, Color::BLUE, Color::MAGENTA],
            camera_z: 0.0,
            start_offset: 0.25,
            total_distance: 5.5,
            speed: 0.15,
            velocity: 0.5,
            dissolve_duration_secs: 15.0,
        }
    }
}

impl AnimationConfig {
    /// Read a YAML or JSON file (chosen by extension) and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), rings = config.ring_count(), "loaded animation config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::NoColors);
        }
        for (field, value) in [
            ("total_distance", self.total_distance),
            ("speed", self.speed),
            ("dissolve_duration_secs", self.dissolve_duration_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !self.velocity.is_finite() || self.velocity < 0.0 {
            return Err(ConfigError::BadVelocity(self.velocity));
        }
        let loop_duration = self.loop_duration_secs();
        if self.dissolve_duration_secs > loop_duration {
            return Err(ConfigError::DissolveTooLong {
                dissolve: self.dissolve_duration_secs,
                loop_duration,
            });
        }
        Ok(())
    }

    pub fn ring_count(&self) -> usize {
        self.colors.len()
    }

    /// Depth at which every ring starts its cycle.
    pub fn initial_z(&self) -> f64 {
        self.camera_z - self.start_offset
    }

    /// Length of one loop in seconds.
    pub fn loop_duration_secs(&self) -> f64 {
        self.total_distance / self.speed
    }

    /// Stagger between consecutive ring activations, in milliseconds.
    ///
    /// Zero when there are no colours.
    pub fn interval_ms(&self) -> f64 {
        if self.colors.is_empty() {
            return 0.0;
        }
        (self.total_distance / self.ring_count() as f64) / self.speed * 1000.0
    }

    pub fn activation_delay_ms(&self, index: usize) -> f64 {
        index as f64 * self.interval_ms()
    }

    /// Depth at or beyond which a ring counts as wrapped around.
    pub fn travel_boundary_z(&self) -> f64 {
        self.initial_z() - self.total_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_valid() {
        AnimationConfig::default().validate().unwrap();
    }

    #[test]
    fn derived_timings_for_default_rings() {
        let config = AnimationConfig::default();
        assert_eq!(config.ring_count(), 4);
        assert!((config.initial_z() + 0.25).abs() < 1e-12);
        assert!((config.loop_duration_secs() - 36.666_666_666).abs() < 1e-6);

        let interval = config.interval_ms();
        assert!((interval - 9166.666_666_666).abs() < 1e-6, "got {interval}");
        let expected = [0.0, 9166.666_666, 18333.333_333, 27500.0];
        for (i, want) in expected.iter().enumerate() {
            let delay = config.activation_delay_ms(i);
            assert!((delay - want).abs() < 1e-3, "ring {i}: {delay}");
            assert_eq!(delay, i as f64 * interval);
        }
    }

    #[test]
    fn rejects_empty_colors() {
        let config = AnimationConfig {
            colors: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoColors)));
    }

    #[test]
    fn empty_colors_have_zero_interval() {
        let config = AnimationConfig {
            colors: vec![],
            ..Default::default()
        };
        assert_eq!(config.interval_ms(), 0.0);
        assert_eq!(config.activation_delay_ms(0), 0.0);
    }

    #[test]
    fn rejects_non_positive_fields() {
        let config = AnimationConfig {
            speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "speed", .. })
        ));

        let config = AnimationConfig {
            total_distance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "total_distance",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_velocity() {
        let config = AnimationConfig {
            velocity: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BadVelocity(_))));
    }

    #[test]
    fn rejects_dissolve_longer_than_loop() {
        let config = AnimationConfig {
            dissolve_duration_secs: 40.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DissolveTooLong { .. })
        ));
    }

    #[test]
    fn loads_partial_yaml_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "colors: ['#ffffff', '#000000']\nvelocity: 1.0").unwrap();

        let config = AnimationConfig::load(file.path()).unwrap();
        assert_eq!(config.colors, vec![Color(0xffffff), Color(0x000000)]);
        assert_eq!(config.velocity, 1.0);
        assert_eq!(config.total_distance, 5.5);
    }

    #[test]
    fn loads_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r##"{{"colors": ["#ff0000"], "dissolve_duration_secs": 5.0}}"##).unwrap();

        let config = AnimationConfig::load(file.path()).unwrap();
        assert_eq!(config.ring_count(), 1);
        assert_eq!(config.dissolve_duration_secs, 5.0);
    }

    #[test]
    fn load_validates() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "colors: []").unwrap();
        assert!(matches!(
            AnimationConfig::load(file.path()),
            Err(ConfigError::NoColors)
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            AnimationConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn yaml_round_trips_defaults() {
        let text = serde_yaml::to_string(&AnimationConfig::default()).unwrap();
        assert!(text.contains("'#00ff00'") || text.contains("\"#00ff00\""));
        let back: AnimationConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, AnimationConfig::default());
    }
}
