//! Virtual-clock simulator for the full dispatcher.
//!
//! A [`World`] holds simulated time, the two timers, the button levels and
//! a script of future level changes.  [`SimMux::wait`] jumps the clock
//! straight to the next deadline, fires whatever is due and hands the batch
//! to the dispatcher, so seconds of blinking run in microseconds and every
//! timestamp is exact.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use smartled::app::blink::BlinkEngine;
use smartled::app::dispatcher::EventDispatcher;
use smartled::app::hold_repeat::HoldRepeatController;
use smartled::app::ports::{Interest, Multiplexer, Register, TimerPort};
use smartled::config::BlinkConfig;
use smartled::drivers::button::Button;
use smartled::drivers::status_led::StatusLed;
use smartled::error::{Error, GpioError, MuxError, TimerError};
use smartled::events::{ButtonId, EventSource, ReadySet};

use crate::mock_hw::RecordingSink;

const BLINK: usize = 0;
const REPEAT: usize = 1;

#[derive(Default, Clone, Copy)]
struct Slot {
    deadline: Option<Duration>,
    interval: Option<Duration>,
    expirations: u64,
}

#[derive(Default)]
pub struct World {
    now: Duration,
    horizon: Duration,
    timers: [Slot; 2],
    levels: [bool; 3],
    pending: [bool; 3],
    script: Vec<(Duration, ButtonId, bool)>,
    led: Vec<(Duration, bool)>,
    registered: Vec<(EventSource, Interest)>,
    reverse_batches: bool,
}

#[allow(dead_code)]
impl World {
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Every LED write as `(time, on)`.
    pub fn led_log(&self) -> &[(Duration, bool)] {
        &self.led
    }

    pub fn registered(&self) -> &[(EventSource, Interest)] {
        &self.registered
    }

    pub fn repeat_armed(&self) -> bool {
        self.timers[REPEAT].deadline.is_some()
    }

    pub fn blink_armed(&self) -> bool {
        self.timers[BLINK].deadline.is_some()
    }

    /// Hand each batch to the dispatcher in reverse order.
    pub fn reverse_batches(&mut self, on: bool) {
        self.reverse_batches = on;
    }

    fn tag(slot: usize) -> EventSource {
        if slot == BLINK {
            EventSource::BlinkTimer
        } else {
            EventSource::RepeatTimer
        }
    }

    fn is_registered(&self, source: EventSource) -> bool {
        self.registered.iter().any(|(s, _)| *s == source)
    }

    fn ready_now(&self) -> Vec<EventSource> {
        let timers = (0..2)
            .filter(|&i| self.timers[i].expirations > 0)
            .map(Self::tag);
        let buttons = ButtonId::ALL
            .into_iter()
            .filter(|id| self.pending[id.index()])
            .map(EventSource::Button);
        timers
            .chain(buttons)
            .filter(|s| self.is_registered(*s))
            .collect()
    }

    fn next_deadline(&self) -> Option<Duration> {
        let timers = self.timers.iter().filter_map(|t| t.deadline);
        let script = self.script.iter().map(|(t, _, _)| *t);
        timers.chain(script).min()
    }

    fn advance_to(&mut self, t: Duration) {
        self.now = t;
        for slot in &mut self.timers {
            while let Some(deadline) = slot.deadline.filter(|d| *d <= t) {
                slot.expirations += 1;
                slot.deadline = slot.interval.map(|i| deadline + i);
            }
        }
        let (due, later): (Vec<_>, Vec<_>) = self.script.drain(..).partition(|(at, _, _)| *at <= t);
        self.script = later;
        for (_, id, pressed) in due {
            if self.levels[id.index()] != pressed {
                self.levels[id.index()] = pressed;
                self.pending[id.index()] = true;
            }
        }
    }
}

pub type Shared = Rc<RefCell<World>>;

// ── Simulated collaborators ───────────────────────────────────

pub struct SimTimer {
    world: Shared,
    slot: usize,
}

impl TimerPort for SimTimer {
    fn arm(&mut self, initial: Duration, repeat: Option<Duration>) -> Result<(), TimerError> {
        let mut w = self.world.borrow_mut();
        let now = w.now;
        w.timers[self.slot] = Slot {
            deadline: Some(now + initial),
            interval: repeat,
            expirations: 0,
        };
        Ok(())
    }

    fn disarm(&mut self) -> Result<(), TimerError> {
        self.world.borrow_mut().timers[self.slot] = Slot::default();
        Ok(())
    }

    fn consume_expirations(&mut self) -> Result<u64, TimerError> {
        Ok(core::mem::take(&mut self.world.borrow_mut().timers[self.slot].expirations))
    }
}

/// Active-high button line.  Reading clears the pending notification, as a
/// read of a sysfs `value` file does.
pub struct SimPin {
    world: Shared,
    id: ButtonId,
}

impl ErrorType for SimPin {
    type Error = GpioError;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        let mut w = self.world.borrow_mut();
        w.pending[self.id.index()] = false;
        Ok(w.levels[self.id.index()])
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|h| !h)
    }
}

pub struct SimLed {
    world: Shared,
}

impl ErrorType for SimLed {
    type Error = GpioError;
}

impl OutputPin for SimLed {
    fn set_low(&mut self) -> Result<(), GpioError> {
        let mut w = self.world.borrow_mut();
        let now = w.now;
        w.led.push((now, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        let mut w = self.world.borrow_mut();
        let now = w.now;
        w.led.push((now, true));
        Ok(())
    }
}

pub struct SimMux {
    world: Shared,
}

impl Register<SimTimer> for SimMux {
    fn register(&mut self, _: &SimTimer, tag: EventSource, interest: Interest) -> Result<(), MuxError> {
        self.world.borrow_mut().registered.push((tag, interest));
        Ok(())
    }
}

impl Register<SimPin> for SimMux {
    fn register(&mut self, _: &SimPin, tag: EventSource, interest: Interest) -> Result<(), MuxError> {
        self.world.borrow_mut().registered.push((tag, interest));
        Ok(())
    }
}

impl Multiplexer for SimMux {
    /// Fails once nothing is due before the horizon; that is how a
    /// simulation run ends.
    fn wait(&mut self, ready: &mut ReadySet) -> Result<(), MuxError> {
        let mut w = self.world.borrow_mut();
        loop {
            let mut batch = w.ready_now();
            if !batch.is_empty() {
                if w.reverse_batches {
                    batch.reverse();
                }
                ready.clear();
                for source in batch {
                    ready.push(source).map_err(|_| MuxError::WaitFailed)?;
                }
                return Ok(());
            }
            match w.next_deadline() {
                Some(t) if t <= w.horizon => w.advance_to(t),
                _ => return Err(MuxError::WaitFailed),
            }
        }
    }
}

// ── Harness ───────────────────────────────────────────────────

pub type SimDispatcher = EventDispatcher<SimLed, SimPin, SimTimer, SimMux, RecordingSink>;

pub struct Sim {
    pub dispatcher: SimDispatcher,
    pub world: Shared,
}

#[allow(dead_code)]
impl Sim {
    /// Build and start a dispatcher at t = 0.
    pub fn start(config: &BlinkConfig) -> Self {
        let world: Shared = Rc::new(RefCell::new(World::default()));
        let timer = |slot| SimTimer {
            world: world.clone(),
            slot,
        };
        let buttons = ButtonId::ALL.map(|id| {
            let pin = SimPin {
                world: world.clone(),
                id,
            };
            Button::new(id, pin, true)
        });

        let led = StatusLed::new(SimLed {
            world: world.clone(),
        });
        let blink = BlinkEngine::new(config, led, timer(BLINK));
        let hold = HoldRepeatController::new(config, buttons, timer(REPEAT));
        let mux = SimMux {
            world: world.clone(),
        };
        let mut dispatcher = EventDispatcher::new(blink, hold, mux, RecordingSink::new());
        dispatcher.start().unwrap();
        Self { dispatcher, world }
    }

    /// Change a button level at absolute time `at`.
    pub fn schedule(&self, at: Duration, id: ButtonId, pressed: bool) {
        self.world.borrow_mut().script.push((at, id, pressed));
    }

    /// Hold `id` over `[from, to)`.
    pub fn hold(&self, id: ButtonId, from: Duration, to: Duration) {
        self.schedule(from, id, true);
        self.schedule(to, id, false);
    }

    /// Dispatch everything due up to and including `t`, then park the
    /// clock at `t`.
    pub fn run_until(&mut self, t: Duration) {
        self.world.borrow_mut().horizon = t;
        loop {
            match self.dispatcher.run_once() {
                Ok(_) => {}
                Err(Error::Mux(MuxError::WaitFailed)) => break,
                Err(e) => panic!("dispatcher failed: {e}"),
            }
        }
        self.world.borrow_mut().now = t;
    }

    pub fn period(&self) -> Duration {
        self.dispatcher.blink().state().period
    }

    pub fn sink(&self) -> &RecordingSink {
        self.dispatcher.sink()
    }
}
