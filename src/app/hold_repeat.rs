//! Hold-repeat controller — button-driven blink rate acceleration.
//!
//! ## Buttons
//!
//! | Button | Role       | Press                          | Hold                    |
//! |--------|------------|--------------------------------|-------------------------|
//! | K1     | Accelerate | one step shorter, start repeat | one step per repeat     |
//! | K2     | Reset      | default period, stop repeat    | —                       |
//! | K3     | Decelerate | one step longer, start repeat  | one step per repeat     |
//!
//! ## Per-button state
//!
//! ```text
//!            Pressed (opposite Idle): step, arm repeat, direction = X
//!            Pressed (opposite Held): nothing else
//!   ┌──────┐ ─────────────────────────────────────────▶ ┌──────┐
//!   │ Idle │                                            │ Held │
//!   └──────┘ ◀───────────────────────────────────────── └──────┘
//!            Released: if X drives, stop repeat, direction = None
//!            K2 Pressed: forced from any state
//! ```
//!
//! The first accel button to be held drives `direction` until it is
//! released.  A button pressed while the opposite one is held stays
//! passive, and its release has no effect on the period or direction.

use core::time::Duration;

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info, warn};

use crate::config::{AdjustStep, BlinkConfig, PeriodBounds};
use crate::drivers::button::Button;
use crate::error::Error;
use crate::events::{ButtonEdge, ButtonId, ButtonRole, EventSource, Transition};

use super::blink::BlinkEngine;
use super::events::{AppEvent, ChangeCause};
use super::ports::{EventSink, TimerPort};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Which way held buttons are currently pushing the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    None,
    /// Shorter period, faster blinking (K1).
    Accelerating,
    /// Longer period, slower blinking (K3).
    Decelerating,
}

impl Direction {
    const fn of(role: ButtonRole) -> Self {
        match role {
            ButtonRole::Accelerate => Self::Accelerating,
            ButtonRole::Decelerate => Self::Decelerating,
            ButtonRole::Reset => Self::None,
        }
    }
}

/// Local state of one accel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    #[default]
    Idle,
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelState {
    pub period: Duration,
    pub bounds: PeriodBounds,
    pub step: AdjustStep,
    pub direction: Direction,
}

impl AccelState {
    pub fn from_config(config: &BlinkConfig) -> Self {
        let bounds = config.bounds();
        Self {
            period: bounds.clamp(config.period()),
            bounds,
            step: config.step,
            direction: Direction::None,
        }
    }

    /// Move the period one step in `direction`, clamped to the bounds.
    /// Returns the new period.
    pub fn step_toward(&mut self, direction: Direction) -> Duration {
        let next = match direction {
            Direction::None => self.period,
            Direction::Accelerating => self.step.shorten(self.period),
            Direction::Decelerating => self.step.lengthen(self.period),
        };
        self.period = self.bounds.clamp(next);
        self.period
    }
}

/// Whatever consumes the adjusted period.
pub trait PeriodTarget {
    /// Apply `period` and return the value actually used.
    fn update_period(&mut self, period: Duration) -> Duration;
}

impl<P: OutputPin, T: TimerPort> PeriodTarget for BlinkEngine<P, T> {
    fn update_period(&mut self, period: Duration) -> Duration {
        BlinkEngine::update_period(self, period)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct HoldRepeatController<P, T> {
    accel: AccelState,
    default_period: Duration,
    buttons: [Button<P>; 3],
    accelerate_hold: HoldState,
    decelerate_hold: HoldState,
    repeat_timer: T,
    repeat_interval: Duration,
}

impl<P: InputPin, T: TimerPort> HoldRepeatController<P, T> {
    /// `buttons` must be ordered K1, K2, K3.
    pub fn new(config: &BlinkConfig, buttons: [Button<P>; 3], repeat_timer: T) -> Self {
        debug_assert!(
            buttons.iter().zip(ButtonId::ALL).all(|(b, id)| b.id() == id),
            "buttons must be ordered K1, K2, K3"
        );
        let accel = AccelState::from_config(config);
        Self {
            accel,
            default_period: accel.period,
            buttons,
            accelerate_hold: HoldState::Idle,
            decelerate_hold: HoldState::Idle,
            repeat_timer,
            repeat_interval: config.repeat_interval(),
        }
    }

    /// Seed the button levels and make sure the repeat timer is idle.
    ///
    /// A button that cannot be read is assumed released; a repeat timer that
    /// cannot be disarmed is an init failure.
    pub fn start(&mut self) -> Result<(), Error> {
        for button in &mut self.buttons {
            match button.sync() {
                Ok(pressed) => debug!("hold: {} initially {}", button.id(), if pressed { "pressed" } else { "released" }),
                Err(e) => warn!("hold: initial read of {} failed: {:?}", button.id(), e),
            }
        }
        self.repeat_timer.disarm()?;
        Ok(())
    }

    // ── Notification handlers ─────────────────────────────────

    /// Handle a readiness notification on `id`'s line.
    pub fn on_button_ready(
        &mut self,
        id: ButtonId,
        target: &mut impl PeriodTarget,
        sink: &mut impl EventSink,
    ) {
        let edge = match self.buttons[id.index()].reconcile() {
            Ok(Some(edge)) => edge,
            Ok(None) => {
                debug!("hold: stale wake on {}", id);
                return;
            }
            Err(e) => {
                warn!("hold: reading {} failed: {:?}", id, e);
                return;
            }
        };
        self.on_button_edge(edge, target, sink);
    }

    /// Apply a confirmed button edge.
    pub fn on_button_edge(
        &mut self,
        edge: ButtonEdge,
        target: &mut impl PeriodTarget,
        sink: &mut impl EventSink,
    ) {
        match (edge.source.role(), edge.transition) {
            (ButtonRole::Reset, Transition::Pressed) => self.reset(target, sink),
            (ButtonRole::Reset, Transition::Released) => {}
            (role, Transition::Pressed) => self.press(Direction::of(role), target, sink),
            (role, Transition::Released) => self.release(Direction::of(role), sink),
        }
    }

    /// Handle a repeat-timer readiness notification.
    pub fn on_repeat_timer_expired(
        &mut self,
        target: &mut impl PeriodTarget,
        sink: &mut impl EventSink,
    ) {
        match self.repeat_timer.consume_expirations() {
            Ok(0) => return,
            Ok(1) => {}
            Ok(n) => {
                warn!("hold: repeat timer expired {} times", n);
                sink.emit(&AppEvent::TimerOverrun {
                    source: EventSource::RepeatTimer,
                    expirations: n,
                });
            }
            Err(e) => warn!("hold: clearing repeat expiry failed: {}", e),
        }

        if self.accel.direction == Direction::None {
            debug!("hold: repeat expiry with no button driving, ignored");
            return;
        }
        self.step(ChangeCause::Repeat, target, sink);
        self.arm_repeat();
    }

    /// Restore the default period and drop every hold.  Idempotent.
    pub fn reset(&mut self, target: &mut impl PeriodTarget, sink: &mut impl EventSink) {
        self.stop_repeat();
        self.accelerate_hold = HoldState::Idle;
        self.decelerate_hold = HoldState::Idle;
        self.set_direction(Direction::None, sink);

        let from = self.accel.period;
        let to = target.update_period(self.default_period);
        self.accel.period = to;
        if from != to {
            sink.emit(&AppEvent::PeriodChanged {
                from,
                to,
                cause: ChangeCause::Reset,
            });
        }
        info!("hold: reset to {:?}", to);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn accel_state(&self) -> &AccelState {
        &self.accel
    }

    pub fn direction(&self) -> Direction {
        self.accel.direction
    }

    /// Local hold state of `id`.  K2 is never held.
    pub fn hold_state(&self, id: ButtonId) -> HoldState {
        match id.role() {
            ButtonRole::Accelerate => self.accelerate_hold,
            ButtonRole::Decelerate => self.decelerate_hold,
            ButtonRole::Reset => HoldState::Idle,
        }
    }

    pub fn button(&self, id: ButtonId) -> &Button<P> {
        &self.buttons[id.index()]
    }

    pub fn repeat_timer(&self) -> &T {
        &self.repeat_timer
    }

    // ── Internal ──────────────────────────────────────────────

    fn press(&mut self, direction: Direction, target: &mut impl PeriodTarget, sink: &mut impl EventSink) {
        let (own, opposite) = self.holds(direction);
        if own == HoldState::Held {
            return;
        }
        self.set_hold(direction, HoldState::Held);
        if opposite == HoldState::Held {
            info!("hold: {:?} press ignored, opposite button is held", direction);
            return;
        }

        self.set_direction(direction, sink);
        self.step(ChangeCause::Press, target, sink);
        self.arm_repeat();
    }

    fn release(&mut self, direction: Direction, sink: &mut impl EventSink) {
        let (own, _) = self.holds(direction);
        if own == HoldState::Idle {
            return;
        }
        self.set_hold(direction, HoldState::Idle);
        if self.accel.direction == direction {
            self.stop_repeat();
            self.set_direction(Direction::None, sink);
        }
    }

    fn step(&mut self, cause: ChangeCause, target: &mut impl PeriodTarget, sink: &mut impl EventSink) {
        let from = self.accel.period;
        let wanted = self.accel.step_toward(self.accel.direction);
        let to = target.update_period(wanted);
        self.accel.period = to;
        if from == to {
            debug!("hold: period pinned at {:?}", to);
            return;
        }
        debug!("hold: period {:?} -> {:?} ({:?})", from, to, cause);
        sink.emit(&AppEvent::PeriodChanged { from, to, cause });
    }

    /// (own, opposite) hold states for an accel direction.
    fn holds(&self, direction: Direction) -> (HoldState, HoldState) {
        match direction {
            Direction::Accelerating => (self.accelerate_hold, self.decelerate_hold),
            Direction::Decelerating => (self.decelerate_hold, self.accelerate_hold),
            Direction::None => (HoldState::Idle, HoldState::Idle),
        }
    }

    fn set_hold(&mut self, direction: Direction, state: HoldState) {
        match direction {
            Direction::Accelerating => self.accelerate_hold = state,
            Direction::Decelerating => self.decelerate_hold = state,
            Direction::None => {}
        }
    }

    fn set_direction(&mut self, to: Direction, sink: &mut impl EventSink) {
        let from = self.accel.direction;
        if from != to {
            self.accel.direction = to;
            sink.emit(&AppEvent::DirectionChanged { from, to });
        }
    }

    fn arm_repeat(&mut self) {
        if let Err(e) = self.repeat_timer.arm(self.repeat_interval, None) {
            warn!("hold: arming repeat timer failed ({}), auto-repeat paused", e);
        }
    }

    fn stop_repeat(&mut self) {
        if let Err(e) = self.repeat_timer.disarm() {
            warn!("hold: disarming repeat timer failed: {}", e);
        }
    }
}
