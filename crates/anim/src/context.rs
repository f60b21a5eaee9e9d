//! Frame driver: owns the rings and runs one update per display refresh.

use crate::config::{AnimationConfig, ConfigError};
use crate::motion;
use crate::ring::{Ring, RingInstance};
use crate::scheduler;

/// Summary of one [`AnimationContext::frame`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub now_ms: f64,
    /// Seconds since the previous frame. Zero on the first frame.
    pub delta_secs: f64,
    pub active_count: usize,
    pub newly_activated: Vec<usize>,
}

/// All animation state for one running demo.
///
/// Created when the host view starts and dropped when it goes away.
#[derive(Debug, Clone)]
pub struct AnimationContext {
    config: AnimationConfig,
    rings: Vec<Ring>,
    last_time_ms: Option<f64>,
    frame_index: u64,
}

impl AnimationContext {
    /// Validate `config` and spawn its rings, all inactive.
    pub fn new(config: AnimationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rings = Ring::spawn_all(&config);
        tracing::debug!(
            rings = rings.len(),
            interval_ms = config.interval_ms(),
            loop_secs = config.loop_duration_secs(),
            "animation context created"
        );
        Ok(Self {
            config,
            rings,
            last_time_ms: None,
            frame_index: 0,
        })
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    pub fn active_count(&self) -> usize {
        self.rings.iter().filter(|r| r.activated).count()
    }

    /// Advance to `now_ms` (monotonic milliseconds since start).
    ///
    /// Activation runs first so a ring that switches on this frame is also
    /// positioned this frame.
    pub fn frame(&mut self, now_ms: f64) -> FrameStats {
        let delta_secs = self
            .last_time_ms
            .map_or(0.0, |last| (now_ms - last) / 1000.0);
        self.last_time_ms = Some(now_ms);

        let newly_activated = scheduler::activate_due(&mut self.rings, now_ms);
        motion::advance(&mut self.rings, &self.config, now_ms);

        let stats = FrameStats {
            frame_index: self.frame_index,
            now_ms,
            delta_secs,
            active_count: self.active_count(),
            newly_activated,
        };
        self.frame_index += 1;
        tracing::trace!(
            frame = stats.frame_index,
            now_ms,
            delta_secs,
            active = stats.active_count,
            "frame"
        );
        stats
    }

    /// Active rings in spawn order, ready to draw.
    pub fn visible_rings(&self) -> impl Iterator<Item = RingInstance> + '_ {
        self.rings
            .iter()
            .enumerate()
            .filter(|(_, r)| r.activated)
            .map(|(index, r)| RingInstance {
                index,
                color: r.color,
                transform: r.transform,
                opacity: r.opacity,
            })
    }
}
