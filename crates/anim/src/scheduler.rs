//! Decides which rings are active.

use crate::ring::Ring;

/// Activate every ring whose delay has elapsed at `now_ms`.
///
/// Returns the indices activated by this call. Rings that are already
/// active are left alone, so repeated calls are harmless.
pub fn activate_due(rings: &mut [Ring], now_ms: f64) -> Vec<usize> {
    let mut newly = Vec::new();
    for (index, ring) in rings.iter_mut().enumerate() {
        if ring.activated || !ring.is_due(now_ms) {
            continue;
        }
        ring.activated = true;
        tracing::info!(
            ring = index,
            color = %ring.color,
            delay_ms = ring.activation_delay_ms,
            "ring activated"
        );
        newly.push(index);
    }
    newly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;

    #[test]
    fn only_first_ring_at_time_zero() {
        let mut rings = Ring::spawn_all(&AnimationConfig::default());
        assert_eq!(activate_due(&mut rings, 0.0), vec![0]);
        assert_eq!(rings.iter().filter(|r| r.activated).count(), 1);
    }

    #[test]
    fn two_rings_after_one_interval() {
        let config = AnimationConfig::default();
        let mut rings = Ring::spawn_all(&config);
        activate_due(&mut rings, config.interval_ms());
        let active: Vec<bool> = rings.iter().map(|r| r.activated).collect();
        assert_eq!(active, vec![true, true, false, false]);
    }

    #[test]
    fn activation_is_idempotent() {
        let mut rings = Ring::spawn_all(&AnimationConfig::default());
        assert_eq!(activate_due(&mut rings, 0.0), vec![0]);
        assert!(activate_due(&mut rings, 0.0).is_empty());
        assert!(activate_due(&mut rings, 1.0).is_empty());
    }

    #[test]
    fn activation_never_reverts() {
        let config = AnimationConfig::default();
        let mut rings = Ring::spawn_all(&config);
        activate_due(&mut rings, config.activation_delay_ms(3));
        assert!(rings.iter().all(|r| r.activated));

        // a clock that jumps backwards does not deactivate anything
        activate_due(&mut rings, -1_000.0);
        assert!(rings.iter().all(|r| r.activated));
    }

    #[test]
    fn late_first_frame_activates_several_at_once() {
        let config = AnimationConfig::default();
        let mut rings = Ring::spawn_all(&config);
        let newly = activate_due(&mut rings, config.interval_ms() * 2.5);
        assert_eq!(newly, vec![0, 1, 2]);
    }
}
