// RingTap: Tap-gesture detection engine
//
// Per tick: smoothing and posture windows take the new magnitude, the
// calibration may advance on a stable window, the raw axes are classified,
// and the tap state machine consumes all of it. Synchronous, no clock of
// its own: the caller supplies monotonic millisecond timestamps.

pub mod calibration;
pub mod direction;
pub mod tap_hsm;
pub mod window;

use crate::config::{TapConfig, POSTURE_WINDOW, SMOOTH_WINDOW};
use crate::events::{AccelSample, Diagnostics, TapEvent};

use calibration::{is_posture_stable, near_gravity_reference, update_calibration, CalibrationState};
use direction::is_intentional_tap_direction;
use tap_hsm::{TapInput, TapStateMachine};
use window::{PostureWindow, SmoothingWindow};

pub use tap_hsm::{PairReject, PendingTap, TapPhase, TapTrace};

pub struct TapEngine<const SMOOTH: usize = { SMOOTH_WINDOW }, const POSTURE: usize = { POSTURE_WINDOW }> {
    config: TapConfig,
    smoothing: SmoothingWindow<SMOOTH>,
    posture: PostureWindow<POSTURE>,
    calibration: CalibrationState,
    taps: TapStateMachine,
    current_magnitude: f32,
}

impl Default for TapEngine {
    fn default() -> Self {
        Self::new(TapConfig::default())
    }
}

impl<const SMOOTH: usize, const POSTURE: usize> TapEngine<SMOOTH, POSTURE> {
    pub fn new(config: TapConfig) -> Self {
        Self {
            smoothing: SmoothingWindow::new(),
            posture: PostureWindow::new(),
            calibration: CalibrationState::new(config.gravity_nominal),
            taps: TapStateMachine::new(config),
            current_magnitude: 0.0,
            config,
        }
    }

    /// Feed one successfully acquired sample. Failed acquisitions must not
    /// be passed in; the next call's timestamp covers the gap.
    pub fn update(&mut self, sample: &AccelSample, now_ms: u64) -> TapEvent {
        let magnitude = sample.magnitude(self.config.accel_scale);
        self.current_magnitude = magnitude;

        self.smoothing.push(magnitude);
        self.posture.push(magnitude);
        let smoothed = self.smoothing.average();

        let reference = self.gravity_reference();
        let posture_stable = is_posture_stable(&self.posture, reference, &self.config);
        let near_gravity = near_gravity_reference(smoothed, reference, &self.config);
        let direction_ok = is_intentional_tap_direction(sample, &self.config);

        update_calibration(
            &mut self.calibration,
            smoothed,
            posture_stable && near_gravity,
            &self.config,
        );

        self.taps.tick(TapInput {
            now_ms,
            smoothed,
            posture_stable,
            near_gravity,
            direction_ok,
        })
    }

    /// Calibrated resting magnitude, or nominal gravity until calibrated.
    pub fn gravity_reference(&self) -> f32 {
        if self.calibration.calibrated {
            self.calibration.gravity_reference
        } else {
            self.config.gravity_nominal
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.calibrated
    }

    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    /// Forget the committed gravity reference and calibrate again from
    /// the next stable samples.
    pub fn request_recalibration(&mut self) {
        log::info!("Gravity recalibration requested");
        self.calibration.reset(self.config.gravity_nominal);
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            gravity_reference: self.gravity_reference(),
            calibrated: self.calibration.calibrated,
            current_magnitude: self.current_magnitude,
        }
    }

    pub fn phase(&self) -> TapPhase {
        self.taps.phase()
    }

    pub fn pending_first_tap(&self) -> Option<PendingTap> {
        self.taps.pending_first_tap()
    }

    pub fn trace(&self) -> TapTrace {
        self.taps.trace()
    }

    pub fn config(&self) -> &TapConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{double_tap_scenario, SimTick, TraceBuilder, DEMO_REST_G};

    fn run(engine: &mut TapEngine, ticks: &[SimTick]) -> Vec<u64> {
        ticks
            .iter()
            .filter_map(|tick| {
                let sample = tick.sample?;
                engine
                    .update(&sample, tick.now_ms)
                    .is_double_tap()
                    .then_some(tick.now_ms)
            })
            .collect()
    }

    #[test]
    fn resting_ring_calibrates_after_fifty_stable_ticks() {
        let mut engine: TapEngine = TapEngine::default();
        let ticks = TraceBuilder::new(0, 1.02).rest(54).build();
        run(&mut engine, &ticks);
        assert!(!engine.is_calibrated());
        assert_eq!(engine.gravity_reference(), 1.0);

        let ticks = TraceBuilder::new(1_100, 1.02).rest(1).build();
        run(&mut engine, &ticks);
        assert!(engine.is_calibrated());
        assert!((engine.gravity_reference() - 1.02).abs() < 1e-3);
    }

    #[test]
    fn tilted_reading_never_calibrates() {
        let mut engine: TapEngine = TapEngine::default();
        let ticks = TraceBuilder::new(0, 1.5).rest(200).build();
        assert!(run(&mut engine, &ticks).is_empty());
        assert!(!engine.is_calibrated());
        assert_eq!(engine.calibration().accumulated_count, 0);
    }

    #[test]
    fn double_tap_scenario_fires_exactly_once() {
        let mut engine: TapEngine = TapEngine::default();
        let events = run(&mut engine, &double_tap_scenario());
        assert!(engine.is_calibrated());
        assert_eq!(events.len(), 1);
        assert_eq!(engine.pending_first_tap(), None);
    }

    #[test]
    fn single_tap_confirms_without_event() {
        let mut engine: TapEngine = TapEngine::default();
        let builder = TraceBuilder::new(0, DEMO_REST_G).rest(60);
        let confirm_ms = builder.now_ms() + 4 * 20;
        let ticks = builder.tap().rest(5).build();

        assert!(run(&mut engine, &ticks).is_empty());
        let pending = engine.pending_first_tap().expect("tap pending");
        assert_eq!(pending.at_ms, confirm_ms);
        assert!((pending.magnitude - DEMO_REST_G).abs() < 0.01);
    }

    #[test]
    fn uncalibrated_ring_ignores_taps() {
        let mut engine: TapEngine = TapEngine::default();
        let ticks = TraceBuilder::new(0, DEMO_REST_G)
            .rest(10)
            .tap()
            .rest(7)
            .tap()
            .build();
        assert!(run(&mut engine, &ticks).is_empty());
        assert_eq!(engine.pending_first_tap(), None);
    }

    #[test]
    fn shaking_never_produces_a_double_tap() {
        let mut engine: TapEngine = TapEngine::default();
        let ticks = TraceBuilder::new(0, DEMO_REST_G)
            .rest(60)
            .shake(100)
            .rest(10)
            .build();
        assert!(run(&mut engine, &ticks).is_empty());
    }

    #[test]
    fn taps_too_far_apart_do_not_pair() {
        let mut engine: TapEngine = TapEngine::default();
        let ticks = TraceBuilder::new(0, DEMO_REST_G)
            .rest(60)
            .tap()
            .rest(40)
            .tap()
            .rest(5)
            .build();
        assert!(run(&mut engine, &ticks).is_empty());
        assert!(engine.pending_first_tap().is_some());
    }

    #[test]
    fn acquisition_gap_keeps_pairing_on_wall_time() {
        let mut engine: TapEngine = TapEngine::default();
        // 7 dropped ticks stand in for the 7 rest ticks of the scenario.
        let ticks = TraceBuilder::new(0, DEMO_REST_G)
            .rest(60)
            .tap()
            .dropout(7)
            .tap()
            .build();
        assert_eq!(run(&mut engine, &ticks).len(), 1);
    }

    #[test]
    fn recalibration_returns_to_nominal() {
        let mut engine: TapEngine = TapEngine::default();
        run(&mut engine, &TraceBuilder::new(0, DEMO_REST_G).rest(60).build());
        assert!(engine.is_calibrated());

        engine.request_recalibration();
        assert!(!engine.is_calibrated());
        assert_eq!(engine.gravity_reference(), 1.0);

        run(&mut engine, &TraceBuilder::new(2_000, DEMO_REST_G).rest(50).build());
        assert!(engine.is_calibrated());
        assert!((engine.gravity_reference() - DEMO_REST_G).abs() < 1e-3);
    }

    #[test]
    fn diagnostics_report_latest_magnitude() {
        let mut engine: TapEngine = TapEngine::default();
        run(&mut engine, &TraceBuilder::new(0, 1.1).rest(3).build());
        let snapshot = engine.diagnostics();
        assert!(!snapshot.calibrated);
        assert_eq!(snapshot.gravity_reference, 1.0);
        assert!((snapshot.current_magnitude - 1.1).abs() < 1e-3);
    }
}
