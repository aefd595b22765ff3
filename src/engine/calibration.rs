// RingTap: Posture stability and gravity self-calibration

use crate::config::TapConfig;

use super::window::PostureWindow;

/// Resting gravity estimate, refined from posture-stable samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    pub gravity_reference: f32,
    pub accumulated_sum: f32,
    pub accumulated_count: u32,
    pub calibrated: bool,
}

impl CalibrationState {
    pub fn new(gravity_nominal: f32) -> Self {
        Self {
            gravity_reference: gravity_nominal,
            accumulated_sum: 0.0,
            accumulated_count: 0,
            calibrated: false,
        }
    }

    /// Drop the committed value and start accumulating again.
    pub fn reset(&mut self, gravity_nominal: f32) {
        *self = Self::new(gravity_nominal);
    }
}

/// The window must be full; then variance, range and distance from the
/// reference must all be under their limits.
pub fn is_posture_stable<const N: usize>(
    window: &PostureWindow<N>,
    gravity_reference: f32,
    config: &TapConfig,
) -> bool {
    if !window.is_full() {
        return false;
    }
    let stats = window.stats();

    let low_variance = stats.variance < config.posture_variance_max;
    let small_range = stats.range() < config.posture_range_max;
    let near_gravity = (stats.mean - gravity_reference).abs() < config.posture_gravity_tolerance;

    low_variance && small_range && near_gravity
}

/// Relaxed gate: a single smoothed value close to the reference.
pub fn near_gravity_reference(value: f32, reference: f32, config: &TapConfig) -> bool {
    (value - reference).abs() < config.near_gravity_tolerance
}

/// Accumulate one stable sample. Commits once `calibration_samples` have
/// been seen and the average is within tolerance of nominal gravity;
/// otherwise the accumulator restarts.
pub fn update_calibration(
    state: &mut CalibrationState,
    smoothed_magnitude: f32,
    is_stable_and_near_gravity: bool,
    config: &TapConfig,
) {
    if !is_stable_and_near_gravity || state.calibrated {
        return;
    }
    if state.accumulated_count >= config.calibration_samples {
        return;
    }

    state.accumulated_sum += smoothed_magnitude;
    state.accumulated_count += 1;

    if state.accumulated_count < config.calibration_samples {
        return;
    }

    let average = state.accumulated_sum / state.accumulated_count as f32;
    if (average - config.gravity_nominal).abs() < config.calibration_tolerance {
        state.gravity_reference = average;
        state.calibrated = true;
        log::info!("Gravity calibrated to {:.3} g", average);
    } else {
        log::warn!(
            "Calibration rejected: {:.3} g too far from nominal {:.3} g",
            average,
            config.gravity_nominal
        );
        state.accumulated_sum = 0.0;
        state.accumulated_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[f32]) -> PostureWindow<6> {
        let mut window = PostureWindow::new();
        for &v in values {
            window.push(v);
        }
        window
    }

    #[test]
    fn stability_needs_a_full_window() {
        let config = TapConfig::default();
        let mut window = PostureWindow::<6>::new();
        for i in 0..6 {
            assert!(!is_posture_stable(&window, 1.0, &config), "sample {i}");
            window.push(1.0);
        }
        assert!(is_posture_stable(&window, 1.0, &config));
        window.push(1.01);
        assert!(is_posture_stable(&window, 1.0, &config));
    }

    #[test]
    fn wide_range_is_not_stable() {
        let config = TapConfig::default();
        let window = filled(&[0.92, 1.0, 1.0, 1.0, 1.0, 1.08]);
        assert!(!is_posture_stable(&window, 1.0, &config));
    }

    #[test]
    fn mean_far_from_reference_is_not_stable() {
        let config = TapConfig::default();
        let window = filled(&[1.3; 6]);
        assert!(!is_posture_stable(&window, 1.0, &config));
        assert!(is_posture_stable(&window, 1.2, &config));
    }

    #[test]
    fn near_gravity_uses_relaxed_tolerance() {
        let config = TapConfig::default();
        assert!(near_gravity_reference(1.17, 1.0, &config));
        assert!(!near_gravity_reference(1.19, 1.0, &config));
        assert!(near_gravity_reference(0.83, 1.0, &config));
    }

    #[test]
    fn fifty_stable_samples_commit_reference() {
        let config = TapConfig::default();
        let mut state = CalibrationState::new(1.0);
        for _ in 0..49 {
            update_calibration(&mut state, 1.02, true, &config);
        }
        assert!(!state.calibrated);
        assert_eq!(state.accumulated_count, 49);

        update_calibration(&mut state, 1.02, true, &config);
        assert!(state.calibrated);
        assert!((state.gravity_reference - 1.02).abs() < 1e-4);

        update_calibration(&mut state, 1.2, true, &config);
        assert_eq!(state.accumulated_count, 50);
        assert!((state.gravity_reference - 1.02).abs() < 1e-4);
    }

    #[test]
    fn out_of_range_average_is_rejected_and_retried() {
        let config = TapConfig::default();
        let mut state = CalibrationState::new(1.0);
        for _ in 0..50 {
            update_calibration(&mut state, 1.5, true, &config);
        }
        assert!(!state.calibrated);
        assert_eq!(state.accumulated_count, 0);
        assert_eq!(state.accumulated_sum, 0.0);
        assert_eq!(state.gravity_reference, 1.0);

        for _ in 0..50 {
            update_calibration(&mut state, 0.98, true, &config);
        }
        assert!(state.calibrated);
        assert!((state.gravity_reference - 0.98).abs() < 1e-4);
    }

    #[test]
    fn unstable_samples_are_ignored() {
        let config = TapConfig::default();
        let mut state = CalibrationState::new(1.0);
        update_calibration(&mut state, 1.0, false, &config);
        assert_eq!(state.accumulated_count, 0);
    }
}
