//! Blink engine — software-timed LED blinking.
//!
//! The engine owns [`BlinkState`], the status LED and the blink timer.  Each
//! expiry toggles the LED and re-arms the timer **one-shot** with the length
//! of the phase just entered, so a period change lands on the next
//! half-cycle without touching an in-flight timer.
//!
//! ```text
//!   ┌──────── period ────────┐
//!   ┌── on ──┐                ┌── on ──┐
//! ──┘        └──── off ───────┘        └────
//!   ^arm(on)  ^arm(off)       ^arm(on)
//! ```

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use log::{error, info, warn};

use crate::config::{BlinkConfig, DutyCycle, PeriodBounds};
use crate::drivers::status_led::StatusLed;
use crate::error::{Error, TimerError};
use crate::events::EventSource;

use super::events::AppEvent;
use super::ports::{EventSink, TimerPort};

// ---------------------------------------------------------------------------
// Phase arithmetic
// ---------------------------------------------------------------------------

/// One half of a blink period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    On,
    Off,
}

impl Phase {
    pub const fn opposite(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    pub const fn led_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Length of `phase` within one period.
///
/// The on-phase is `period × duty / 100` (truncated to whole nanoseconds) and
/// the off-phase is the remainder, so the two always sum to `period` exactly.
pub fn phase_delay(period: Duration, duty: DutyCycle, phase: Phase) -> Duration {
    let total = period.as_nanos();
    let on = total * u128::from(duty.percent()) / 100;
    let nanos = match phase {
        Phase::On => on,
        Phase::Off => total - on,
    };
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// The phase that follows `current` and how long to arm the timer for.
///
/// A zero-length phase is skipped: at 0 % or 100 % duty the LED stays put
/// and the timer is re-armed for a whole period.
pub fn next_phase(period: Duration, duty: DutyCycle, current: Phase) -> (Phase, Duration) {
    let wanted = current.opposite();
    let delay = phase_delay(period, duty, wanted);
    if delay.is_zero() {
        (current, period)
    } else {
        (wanted, delay)
    }
}

/// The phase to start in: on, unless the on-phase has zero length.
pub fn initial_phase(period: Duration, duty: DutyCycle) -> (Phase, Duration) {
    next_phase(period, duty, Phase::Off)
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkState {
    pub period: Duration,
    pub duty: DutyCycle,
    pub led_on: bool,
}

impl BlinkState {
    pub fn on_time(&self) -> Duration {
        phase_delay(self.period, self.duty, Phase::On)
    }

    pub fn off_time(&self) -> Duration {
        phase_delay(self.period, self.duty, Phase::Off)
    }

    fn phase(&self) -> Phase {
        if self.led_on { Phase::On } else { Phase::Off }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct BlinkEngine<P, T> {
    state: BlinkState,
    bounds: PeriodBounds,
    led: StatusLed<P>,
    timer: T,
    toggles: u64,
}

impl<P: OutputPin, T: TimerPort> BlinkEngine<P, T> {
    /// Build the engine from configuration.  Does **not** touch the LED or
    /// the timer; call [`start`](Self::start) next.
    pub fn new(config: &BlinkConfig, led: StatusLed<P>, timer: T) -> Self {
        let bounds = config.bounds();
        Self {
            state: BlinkState {
                period: bounds.clamp(config.period()),
                duty: config.duty(),
                led_on: false,
            },
            bounds,
            led,
            timer,
            toggles: 0,
        }
    }

    /// Drive the LED into its first phase and arm the blink timer for it.
    /// Failing to arm is an init failure; a failed LED write is not.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<(), Error> {
        let (phase, delay) = initial_phase(self.state.period, self.state.duty);
        if let Err(e) = self.led.set(phase.led_on()) {
            warn!("blink: initial LED write failed: {:?}", e);
        }
        self.state.led_on = phase.led_on();
        self.timer.arm(delay, None).inspect_err(|e| {
            error!("blink: initial arm for {:?} failed: {}", delay, e);
        })?;
        info!(
            "blink: started, period={:?} duty={}% first phase={:?} for {:?}",
            self.state.period,
            self.state.duty.percent(),
            phase,
            delay
        );
        sink.emit(&AppEvent::Started {
            period: self.state.period,
            duty: self.state.duty,
        });
        Ok(())
    }

    /// Handle a blink-timer readiness notification.
    ///
    /// Only a failed re-arm is returned; everything else is logged.
    pub fn on_blink_timer_expired(&mut self, sink: &mut impl EventSink) -> Result<(), Error> {
        match self.timer.consume_expirations() {
            Ok(0) => return Ok(()),
            Ok(1) => {}
            Ok(n) => {
                warn!("blink: timer expired {} times", n);
                sink.emit(&AppEvent::TimerOverrun {
                    source: EventSource::BlinkTimer,
                    expirations: n,
                });
            }
            Err(e) => warn!("blink: clearing expiry failed ({}), toggling anyway", e),
        }

        let (phase, delay) = next_phase(self.state.period, self.state.duty, self.state.phase());
        if let Err(e) = self.led.set(phase.led_on()) {
            warn!("blink: LED write failed: {:?}", e);
        }
        self.state.led_on = phase.led_on();
        self.toggles += 1;

        self.timer.arm(delay, None).map_err(|e| {
            error!("blink: re-arm for {:?} failed: {}, blink timing lost", delay, e);
            Error::Timer(TimerError::ArmFailed)
        })
    }

    /// Set a new period, clamped to the configured bounds.  Takes effect at
    /// the next toggle.  Returns the period actually applied.
    pub fn update_period(&mut self, new_period: Duration) -> Duration {
        let period = self.bounds.clamp(new_period);
        self.state.period = period;
        period
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    pub fn bounds(&self) -> PeriodBounds {
        self.bounds
    }

    /// Number of phase changes handled since start.
    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    pub fn led(&self) -> &StatusLed<P> {
        &self.led
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
