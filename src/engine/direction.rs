// RingTap: Tap direction classifier
//
// A finger tap on the ring lands mostly on one axis. Shakes and bumps
// spread their energy across all three.

use crate::config::{TapConfig, AXIS_OTHER_FLOOR};
use crate::events::AccelSample;

pub fn is_intentional_tap_direction(sample: &AccelSample, config: &TapConfig) -> bool {
    let (x, y, z) = sample.to_g(config.accel_scale);
    let (x, y, z) = (x.abs(), y.abs(), z.abs());

    let dominant = x.max(y).max(z);
    let other_sum = x + y + z - dominant;

    let strong_enough = dominant > config.axis_dominance_min;
    let dominates = dominant > config.axis_dominance_ratio * other_sum.max(AXIS_OTHER_FLOOR);

    strong_enough && dominates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(v: f32) -> i16 {
        (v * 16384.0) as i16
    }

    #[test]
    fn single_axis_impact_is_intentional() {
        let config = TapConfig::default();
        let sample = AccelSample::new(g(0.1), g(-0.2), g(1.5));
        assert!(is_intentional_tap_direction(&sample, &config));
    }

    #[test]
    fn negative_axis_counts_by_magnitude() {
        let config = TapConfig::default();
        let sample = AccelSample::new(g(-1.6), g(0.2), g(0.3));
        assert!(is_intentional_tap_direction(&sample, &config));
    }

    #[test]
    fn spread_energy_is_rejected() {
        let config = TapConfig::default();
        let sample = AccelSample::new(g(1.0), g(0.9), g(0.8));
        assert!(!is_intentional_tap_direction(&sample, &config));
    }

    #[test]
    fn weak_dominant_axis_is_rejected() {
        let config = TapConfig::default();
        let sample = AccelSample::new(0, 0, g(0.7));
        assert!(!is_intentional_tap_direction(&sample, &config));
    }

    #[test]
    fn quiet_other_axes_use_the_floor() {
        let config = TapConfig::default();
        let sample = AccelSample::new(0, 0, g(0.9));
        assert!(is_intentional_tap_direction(&sample, &config));
    }
}
