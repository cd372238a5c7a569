//! Mock hardware for integration tests.
//!
//! Every mock is a cheap clonable handle onto shared state, so a test can
//! keep one copy while the engine under test owns the other, then poke the
//! line level or inspect the recorded calls.

use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use smartled::app::blink::BlinkEngine;
use smartled::app::events::{AppEvent, ChangeCause};
use smartled::app::hold_repeat::{Direction, HoldRepeatController};
use smartled::app::ports::{EventSink, TimerPort};
use smartled::config::{AdjustStep, BlinkConfig};
use smartled::drivers::button::Button;
use smartled::drivers::status_led::StatusLed;
use smartled::error::{GpioError, TimerError};
use smartled::events::ButtonId;

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// 1000 ms / 50 %, −50 ms per step, 200 ms repeat, floor at 100 ms.
pub fn reference_config() -> BlinkConfig {
    BlinkConfig {
        period_ms: 1000,
        duty_percent: 50,
        min_period_ms: 100,
        max_period_ms: 2000,
        step: AdjustStep::Fixed { ms: 50 },
        repeat_interval_ms: 200,
        ..BlinkConfig::default()
    }
}

// ── Timer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Arm {
        initial: Duration,
        repeat: Option<Duration>,
    },
    Disarm,
}

#[derive(Default)]
struct TimerInner {
    calls: Vec<TimerCall>,
    armed: bool,
    pending: u64,
    fail_arm: bool,
    fail_read: bool,
}

#[derive(Clone, Default)]
pub struct MockTimer(Rc<RefCell<TimerInner>>);

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TimerCall> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn is_armed(&self) -> bool {
        self.0.borrow().armed
    }

    /// Initial delay of the most recent arm.
    pub fn last_arm(&self) -> Option<Duration> {
        self.0.borrow().calls.iter().rev().find_map(|c| match c {
            TimerCall::Arm { initial, .. } => Some(*initial),
            TimerCall::Disarm => None,
        })
    }

    /// Pretend the timer fired `n` times.
    pub fn expire(&self, n: u64) {
        self.0.borrow_mut().pending += n;
    }

    pub fn fail_arm(&self, fail: bool) {
        self.0.borrow_mut().fail_arm = fail;
    }

    pub fn fail_read(&self, fail: bool) {
        self.0.borrow_mut().fail_read = fail;
    }
}

impl TimerPort for MockTimer {
    fn arm(&mut self, initial: Duration, repeat: Option<Duration>) -> Result<(), TimerError> {
        let mut t = self.0.borrow_mut();
        t.calls.push(TimerCall::Arm { initial, repeat });
        if t.fail_arm {
            return Err(TimerError::ArmFailed);
        }
        t.armed = true;
        t.pending = 0;
        Ok(())
    }

    fn disarm(&mut self) -> Result<(), TimerError> {
        let mut t = self.0.borrow_mut();
        t.calls.push(TimerCall::Disarm);
        t.armed = false;
        t.pending = 0;
        Ok(())
    }

    fn consume_expirations(&mut self) -> Result<u64, TimerError> {
        let mut t = self.0.borrow_mut();
        if t.fail_read {
            return Err(TimerError::ReadFailed);
        }
        Ok(core::mem::take(&mut t.pending))
    }
}

// ── Button line ───────────────────────────────────────────────

/// Input line whose level the test drives.  `None` makes reads fail.
#[derive(Clone)]
pub struct MockPin {
    line: u32,
    level: Rc<Cell<Option<bool>>>,
}

#[allow(dead_code)]
impl MockPin {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            level: Rc::new(Cell::new(Some(false))),
        }
    }

    pub fn drive(&self, high: bool) {
        self.level.set(Some(high));
    }

    pub fn break_line(&self) {
        self.level.set(None);
    }
}

impl ErrorType for MockPin {
    type Error = GpioError;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        self.level.get().ok_or(GpioError::ReadFailed(self.line))
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|h| !h)
    }
}

// ── LED line ──────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockLed {
    writes: Rc<RefCell<Vec<bool>>>,
    fail: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.borrow().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.set(fail);
    }

    fn record(&self, on: bool) -> Result<(), GpioError> {
        if self.fail.get() {
            return Err(GpioError::WriteFailed(10));
        }
        self.writes.borrow_mut().push(on);
        Ok(())
    }
}

impl ErrorType for MockLed {
    type Error = GpioError;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.record(false)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.record(true)
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every period change as `(new period, cause)`.
    pub fn period_changes(&self) -> Vec<(Duration, ChangeCause)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PeriodChanged { to, cause, .. } => Some((*to, *cause)),
                _ => None,
            })
            .collect()
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::DirectionChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn overruns(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::TimerOverrun { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: engine + controller on mocks ────────────────────────

/// Blink engine and hold-repeat controller wired to mocks and started.
pub struct Rig {
    pub blink: BlinkEngine<MockLed, MockTimer>,
    pub hold: HoldRepeatController<MockPin, MockTimer>,
    pub sink: RecordingSink,
    pub led: MockLed,
    pub blink_timer: MockTimer,
    pub repeat_timer: MockTimer,
    pub pins: [MockPin; 3],
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: &BlinkConfig) -> Self {
        let led = MockLed::new();
        let blink_timer = MockTimer::new();
        let repeat_timer = MockTimer::new();
        let pins = [MockPin::new(0), MockPin::new(2), MockPin::new(3)];

        let buttons = ButtonId::ALL.map(|id| {
            Button::new(id, pins[id.index()].clone(), config.lines.buttons_active_high)
        });
        let mut blink = BlinkEngine::new(config, StatusLed::new(led.clone()), blink_timer.clone());
        let mut hold = HoldRepeatController::new(config, buttons, repeat_timer.clone());
        let mut sink = RecordingSink::new();

        hold.start().unwrap();
        blink.start(&mut sink).unwrap();

        Self {
            blink,
            hold,
            sink,
            led,
            blink_timer,
            repeat_timer,
            pins,
        }
    }

    pub fn press(&mut self, id: ButtonId) {
        self.pins[id.index()].drive(true);
        self.notify(id);
    }

    pub fn release(&mut self, id: ButtonId) {
        self.pins[id.index()].drive(false);
        self.notify(id);
    }

    /// Deliver an edge notification without changing the level.
    pub fn notify(&mut self, id: ButtonId) {
        self.hold.on_button_ready(id, &mut self.blink, &mut self.sink);
    }

    /// Fire the repeat timer once, as the kernel would while it is armed.
    pub fn repeat(&mut self) {
        if self.repeat_timer.is_armed() {
            self.repeat_timer.expire(1);
        }
        self.hold.on_repeat_timer_expired(&mut self.blink, &mut self.sink);
    }

    pub fn period(&self) -> Duration {
        self.blink.state().period
    }
}
