//! Event dispatcher — the top-level reactive loop.
//!
//! ```text
//!                 ┌────────────── Multiplexer::wait ──────────────┐
//!                 │                                               │
//!   BlinkTimer ───┤──▶ BlinkEngine::on_blink_timer_expired        │
//!   RepeatTimer ──┤──▶ HoldRepeatController::on_repeat_timer_...  │
//!   Button(K*) ───┘──▶ HoldRepeatController::on_button_ready      │
//!                                                                 │
//!   handlers may re-arm timers ──────────────────────────────────┘
//! ```
//!
//! Single-threaded and strictly reactive: the only suspension point is the
//! multiplexer wait, and every handler runs to completion.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};
use log::{error, info};

use crate::error::Error;
use crate::events::{ButtonId, EventSource, ReadySet};

use super::blink::BlinkEngine;
use super::hold_repeat::HoldRepeatController;
use super::ports::{EventSink, Interest, Multiplexer, Register, TimerPort};

pub struct EventDispatcher<L, B, T, M, E> {
    blink: BlinkEngine<L, T>,
    hold: HoldRepeatController<B, T>,
    mux: M,
    sink: E,
    ready: ReadySet,
}

impl<L, B, T, M, E> EventDispatcher<L, B, T, M, E>
where
    L: OutputPin,
    B: InputPin,
    T: TimerPort,
    M: Multiplexer + Register<B> + Register<T>,
    E: EventSink,
{
    pub fn new(blink: BlinkEngine<L, T>, hold: HoldRepeatController<B, T>, mux: M, sink: E) -> Self {
        Self {
            blink,
            hold,
            mux,
            sink,
            ready: ReadySet::new(),
        }
    }

    /// Seed the buttons, register every source and start blinking.
    ///
    /// Any failure here is an init failure.
    pub fn start(&mut self) -> Result<(), Error> {
        // Seeding reads each button line first, which also clears the
        // notification sysfs raises for a freshly opened value file.
        self.hold.start()?;

        <M as Register<T>>::register(
            &mut self.mux,
            self.blink.timer(),
            EventSource::BlinkTimer,
            Interest::Readable,
        )?;
        <M as Register<T>>::register(
            &mut self.mux,
            self.hold.repeat_timer(),
            EventSource::RepeatTimer,
            Interest::Readable,
        )?;
        for id in ButtonId::ALL {
            <M as Register<B>>::register(
                &mut self.mux,
                self.hold.button(id).pin(),
                EventSource::Button(id),
                Interest::Priority,
            )?;
        }

        self.blink.start(&mut self.sink)?;
        info!("dispatcher: {} sources registered, entering loop", EventSource::ALL.len());
        Ok(())
    }

    /// Wait for one batch of ready sources and dispatch each of them.
    /// Returns the batch size.
    pub fn run_once(&mut self) -> Result<usize, Error> {
        self.mux
            .wait(&mut self.ready)
            .inspect_err(|e| error!("dispatcher: wait failed: {}", e))?;

        let batch = self.ready.clone();
        for &source in &batch {
            self.dispatch(source)?;
        }
        Ok(batch.len())
    }

    /// Dispatch until the wait or a handler fails fatally.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        loop {
            self.run_once()?;
        }
    }

    fn dispatch(&mut self, source: EventSource) -> Result<(), Error> {
        match source {
            EventSource::BlinkTimer => self.blink.on_blink_timer_expired(&mut self.sink),
            EventSource::RepeatTimer => {
                self.hold.on_repeat_timer_expired(&mut self.blink, &mut self.sink);
                Ok(())
            }
            EventSource::Button(id) => {
                self.hold.on_button_ready(id, &mut self.blink, &mut self.sink);
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn blink(&self) -> &BlinkEngine<L, T> {
        &self.blink
    }

    pub fn hold(&self) -> &HoldRepeatController<B, T> {
        &self.hold
    }

    pub fn mux(&self) -> &M {
        &self.mux
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }
}
