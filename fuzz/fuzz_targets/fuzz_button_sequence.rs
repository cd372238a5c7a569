//! Fuzz target: hold-repeat controller under arbitrary event sequences
//!
//! Each input byte is one event: the low two bits pick the kind (level
//! change, read error, repeat expiry, blink expiry) and the next bits pick
//! the button.  Verifies:
//! - No panics under arbitrary sequences
//! - The period always stays inside the configured bounds
//! - A driving direction always has its button held
//!
//! cargo fuzz run fuzz_button_sequence

#![no_main]

use core::time::Duration;
use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use libfuzzer_sys::fuzz_target;
use smartled::app::blink::BlinkEngine;
use smartled::app::events::AppEvent;
use smartled::app::hold_repeat::{Direction, HoldRepeatController, HoldState};
use smartled::app::ports::{EventSink, TimerPort};
use smartled::config::BlinkConfig;
use smartled::drivers::button::Button;
use smartled::drivers::status_led::StatusLed;
use smartled::error::{GpioError, TimerError};
use smartled::events::ButtonId;

// ── Minimal in-memory collaborators ───────────────────────────

#[derive(Clone)]
struct Line(Rc<Cell<Option<bool>>>);

impl ErrorType for Line {
    type Error = GpioError;
}

impl InputPin for Line {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        self.0.get().ok_or(GpioError::ReadFailed(0))
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|h| !h)
    }
}

struct Led;

impl ErrorType for Led {
    type Error = GpioError;
}

impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), GpioError> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Timer(Rc<Cell<u64>>);

impl TimerPort for Timer {
    fn arm(&mut self, _: Duration, _: Option<Duration>) -> Result<(), TimerError> {
        Ok(())
    }

    fn disarm(&mut self) -> Result<(), TimerError> {
        self.0.set(0);
        Ok(())
    }

    fn consume_expirations(&mut self) -> Result<u64, TimerError> {
        Ok(self.0.replace(0))
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = BlinkConfig::default();
    let bounds = config.bounds();

    let lines: [Line; 3] = core::array::from_fn(|_| Line(Rc::new(Cell::new(Some(false)))));
    let buttons = ButtonId::ALL.map(|id| Button::new(id, lines[id.index()].clone(), true));
    let blink_timer = Timer::default();
    let repeat_timer = Timer::default();

    let mut blink = BlinkEngine::new(&config, StatusLed::new(Led), blink_timer.clone());
    let mut hold = HoldRepeatController::new(&config, buttons, repeat_timer.clone());
    let mut sink = NullSink;
    hold.start().unwrap();
    blink.start(&mut sink).unwrap();

    for &byte in data {
        let id = ButtonId::ALL[usize::from(byte >> 2) % 3];
        let line = &lines[id.index()];
        match byte & 0b11 {
            0 => {
                line.0.set(Some(byte & 0x80 != 0));
                hold.on_button_ready(id, &mut blink, &mut sink);
            }
            1 => {
                line.0.set(None);
                hold.on_button_ready(id, &mut blink, &mut sink);
                line.0.set(Some(false));
            }
            2 => {
                repeat_timer.0.set(u64::from(byte >> 4));
                hold.on_repeat_timer_expired(&mut blink, &mut sink);
            }
            _ => {
                blink_timer.0.set(u64::from(byte >> 4));
                blink.on_blink_timer_expired(&mut sink).unwrap();
            }
        }

        let period = blink.state().period;
        assert!(bounds.contains(period));
        assert_eq!(hold.accel_state().period, period);
        match hold.direction() {
            Direction::Accelerating => assert_eq!(hold.hold_state(ButtonId::K1), HoldState::Held),
            Direction::Decelerating => assert_eq!(hold.hold_state(ButtonId::K3), HoldState::Held),
            Direction::None => {}
        }
    }
});
