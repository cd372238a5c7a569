//! Board bring-up — wires the Linux adapters into a running dispatcher.
//!
//! Every step here is an init failure if it goes wrong: the caller gets the
//! typed error and the daemon exits non-zero.  Lines opened before the
//! failure are unexported again as they drop.

use log::info;

use crate::app::blink::BlinkEngine;
use crate::app::dispatcher::EventDispatcher;
use crate::app::hold_repeat::HoldRepeatController;
use crate::config::BlinkConfig;
use crate::drivers::button::Button;
use crate::drivers::status_led::StatusLed;
use crate::error::{Error, GpioError};
use crate::events::ButtonId;

use super::epoll::EpollMux;
use super::log_sink::LogEventSink;
use super::sysfs_gpio::{Edge, SysfsGpio, SysfsLine};
use super::timerfd::TimerFdTimer;

/// The dispatcher as assembled on the board.
pub type LinuxDispatcher =
    EventDispatcher<SysfsLine, SysfsLine, TimerFdTimer, EpollMux, LogEventSink>;

/// Open every line and timer named by `config`, register them and start
/// blinking.
pub fn bring_up(config: &BlinkConfig) -> Result<LinuxDispatcher, Error> {
    bring_up_with(&SysfsGpio::new(), config)
}

/// [`bring_up`] against an explicit GPIO class directory.
pub fn bring_up_with(gpio: &SysfsGpio, config: &BlinkConfig) -> Result<LinuxDispatcher, Error> {
    config.validate()?;
    let lines = &config.lines;

    let led = StatusLed::new(gpio.open_output(lines.led)?);

    // Both edges on every button: the reset button's release has to
    // refresh its level too, or the next press would read as stale.
    let button = |id: ButtonId, line: u32| -> Result<Button<SysfsLine>, GpioError> {
        let pin = gpio.open_input(line, Edge::Both)?;
        Ok(Button::new(id, pin, lines.buttons_active_high))
    };
    let buttons = [
        button(ButtonId::K1, lines.k1)?,
        button(ButtonId::K2, lines.k2)?,
        button(ButtonId::K3, lines.k3)?,
    ];

    let blink = BlinkEngine::new(config, led, TimerFdTimer::new("blink timer")?);
    let hold = HoldRepeatController::new(config, buttons, TimerFdTimer::new("repeat timer")?);
    let mux = EpollMux::new()?;

    let mut dispatcher = EventDispatcher::new(blink, hold, mux, LogEventSink::new());
    dispatcher.start()?;
    info!(
        "board: led=gpio{} k1=gpio{} k2=gpio{} k3=gpio{} up",
        lines.led, lines.k1, lines.k2, lines.k3
    );
    Ok(dispatcher)
}
