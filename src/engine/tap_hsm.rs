use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::config::TapConfig;
use crate::events::TapEvent;

/// Per-tick verdicts the machine consumes. Built by [`super::TapEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapInput {
    pub now_ms: u64,
    pub smoothed: f32,
    pub posture_stable: bool,
    pub near_gravity: bool,
    pub direction_ok: bool,
}

impl TapInput {
    fn quiescent(&self) -> bool {
        self.posture_stable || self.near_gravity
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TapPhase {
    #[default]
    Idle,
    InProgress,
}

/// A confirmed tap waiting for its partner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTap {
    pub magnitude: f32,
    pub at_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairReject {
    TimingOutOfRange,
    InconsistentMagnitude,
    DoubleTapCooldown,
}

/// What the machine did on the most recent tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapTrace {
    pub now_ms: u64,
    pub phase: TapPhase,
    pub spike: f32,
    pub gated: bool,
    pub confirmed: bool,
    pub timed_out: bool,
    pub reject: Option<PairReject>,
}

#[derive(Default)]
struct DispatchContext {
    event: TapEvent,
}

/// Rise/fall impulse detection plus double-tap pairing.
pub struct TapStateMachine {
    machine: statig::blocking::StateMachine<TapHsm>,
}

impl TapStateMachine {
    pub fn new(config: TapConfig) -> Self {
        Self {
            machine: TapHsm::new(config).state_machine(),
        }
    }

    pub fn tick(&mut self, input: TapInput) -> TapEvent {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&input, &mut context);
        context.event
    }

    pub fn trace(&self) -> TapTrace {
        self.machine.inner().last_trace
    }

    pub fn phase(&self) -> TapPhase {
        match self.machine.state() {
            State::Idle { .. } => TapPhase::Idle,
            State::InProgress { .. } => TapPhase::InProgress,
        }
    }

    pub fn pending_first_tap(&self) -> Option<PendingTap> {
        self.machine.inner().pending
    }

    pub fn cooldown_remaining_ms(&self) -> u64 {
        self.machine.inner().cooldown_remaining_ms
    }

    pub fn last_double_tap_ms(&self) -> Option<u64> {
        self.machine.inner().last_double_tap_ms
    }
}

struct TapHsm {
    config: TapConfig,
    tap_start_ms: u64,
    cooldown_remaining_ms: u64,
    pending: Option<PendingTap>,
    last_double_tap_ms: Option<u64>,
    last_smoothed: f32,
    last_tick_ms: Option<u64>,
    last_trace: TapTrace,
}

impl TapHsm {
    fn new(config: TapConfig) -> Self {
        Self {
            tap_start_ms: 0,
            cooldown_remaining_ms: 0,
            pending: None,
            last_double_tap_ms: None,
            last_smoothed: config.gravity_nominal,
            last_tick_ms: None,
            last_trace: TapTrace::default(),
            config,
        }
    }

    /// Wall-clock cooldown: skipped ticks still count against it.
    fn advance_clock(&mut self, now_ms: u64) {
        let elapsed = self
            .last_tick_ms
            .map_or(self.config.sampling_interval_ms, |last| {
                now_ms.saturating_sub(last)
            });
        self.cooldown_remaining_ms = self.cooldown_remaining_ms.saturating_sub(elapsed);
        self.last_tick_ms = Some(now_ms);
    }

    fn begin_trace(&mut self, input: &TapInput, phase: TapPhase) -> f32 {
        let spike = input.smoothed - self.last_smoothed;
        self.last_trace = TapTrace {
            now_ms: input.now_ms,
            phase,
            spike,
            ..TapTrace::default()
        };
        spike
    }

    /// Lone-tap expiry and spike bookkeeping shared by every handled tick.
    fn finish_tick(&mut self, input: &TapInput) {
        if let Some(pending) = self.pending {
            if input.now_ms.saturating_sub(pending.at_ms) > self.config.double_tap_max_ms {
                log::debug!("Double tap window expired, dropping lone tap");
                self.pending = None;
            }
        }
        self.last_smoothed = input.smoothed;
    }

    fn taps_are_consistent(&self, first: f32, second: f32) -> bool {
        if first <= 0.0 || second <= 0.0 {
            return false;
        }
        let ratio = first.max(second) / first.min(second);
        ratio < self.config.consistency_ratio
    }

    fn in_double_tap_cooldown(&self, now_ms: u64) -> bool {
        self.last_double_tap_ms.is_some_and(|last| {
            now_ms.saturating_sub(last) <= self.config.double_tap_cooldown_ms
        })
    }

    fn judge_pair(&self, first: PendingTap, magnitude: f32, now_ms: u64) -> Result<u64, PairReject> {
        let dt = now_ms.saturating_sub(first.at_ms);
        if dt < self.config.double_tap_min_ms || dt > self.config.double_tap_max_ms {
            log::debug!("Double tap timing out of range: {} ms", dt);
            return Err(PairReject::TimingOutOfRange);
        }
        if !self.taps_are_consistent(first.magnitude, magnitude) {
            log::debug!(
                "Inconsistent tap magnitudes: {:.2} vs {:.2}",
                first.magnitude,
                magnitude
            );
            return Err(PairReject::InconsistentMagnitude);
        }
        if self.in_double_tap_cooldown(now_ms) {
            log::debug!("Double tap in cooldown period");
            return Err(PairReject::DoubleTapCooldown);
        }
        Ok(dt)
    }

    /// A confirmed tap either becomes the pending first tap, completes a
    /// double-tap, or replaces a pending tap it could not pair with.
    fn register_confirmed_tap(&mut self, magnitude: f32, now_ms: u64) -> TapEvent {
        let this_tap = PendingTap {
            magnitude,
            at_ms: now_ms,
        };

        let Some(first) = self.pending else {
            log::debug!("First tap confirmed (mag: {:.2})", magnitude);
            self.pending = Some(this_tap);
            return TapEvent::None;
        };

        match self.judge_pair(first, magnitude, now_ms) {
            Ok(dt) => {
                log::info!(
                    "Double tap confirmed (dt: {} ms, mag1: {:.2}, mag2: {:.2})",
                    dt,
                    first.magnitude,
                    magnitude
                );
                self.pending = None;
                self.last_double_tap_ms = Some(now_ms);
                TapEvent::DoubleTapDetected
            }
            Err(reason) => {
                self.last_trace.reject = Some(reason);
                self.pending = Some(this_tap);
                TapEvent::None
            }
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl TapHsm {
    #[state]
    fn idle(&mut self, event: &TapInput) -> Outcome<State> {
        self.advance_clock(event.now_ms);

        // New impulses only start while the ring is otherwise quiet.
        if !event.quiescent() {
            self.last_trace = TapTrace {
                now_ms: event.now_ms,
                phase: TapPhase::Idle,
                gated: true,
                ..TapTrace::default()
            };
            return Handled;
        }

        let spike = self.begin_trace(event, TapPhase::Idle);
        let starts = self.cooldown_remaining_ms == 0
            && spike > self.config.spike_threshold
            && event.smoothed > self.config.peak_threshold
            && (event.direction_ok || event.near_gravity);

        if starts {
            log::debug!(
                "Tap start detected (smoothed: {:.2}, spike: {:.2})",
                event.smoothed,
                spike
            );
            self.tap_start_ms = event.now_ms;
            self.last_trace.phase = TapPhase::InProgress;
            self.finish_tick(event);
            return Transition(State::in_progress());
        }

        self.finish_tick(event);
        Handled
    }

    #[state]
    fn in_progress(&mut self, context: &mut DispatchContext, event: &TapInput) -> Outcome<State> {
        self.advance_clock(event.now_ms);

        let spike = self.begin_trace(event, TapPhase::InProgress);
        let elapsed = event.now_ms.saturating_sub(self.tap_start_ms);

        if elapsed >= self.config.min_duration_ms && spike < self.config.fall_threshold() {
            log::debug!("Tap end detected (duration: {} ms)", elapsed);
            self.cooldown_remaining_ms = self.config.tap_cooldown_ms;
            self.last_trace.phase = TapPhase::Idle;
            self.last_trace.confirmed = true;
            context.event = self.register_confirmed_tap(event.smoothed, event.now_ms);
            self.finish_tick(event);
            return Transition(State::idle());
        }

        if elapsed > self.config.impulse_timeout_ms() {
            log::debug!("Tap timeout after {} ms", elapsed);
            self.last_trace.phase = TapPhase::Idle;
            self.last_trace.timed_out = true;
            self.finish_tick(event);
            return Transition(State::idle());
        }

        self.finish_tick(event);
        Handled
    }
}
