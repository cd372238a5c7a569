//! Level-reconciled push-button driver.
//!
//! ## Hardware
//!
//! Momentary switch on a sysfs GPIO line with edge notification on both
//! edges.  The notification only says "something changed"; it can race
//! with a fast press/release pair, so every wake is reconciled against the
//! line level before it becomes a [`ButtonEdge`].
//!
//! | Last known | Level read | Result                 |
//! |------------|------------|------------------------|
//! | released   | pressed    | `Some(Pressed)`        |
//! | pressed    | released   | `Some(Released)`       |
//! | same       | same       | `None` (stale wake)    |
//! | any        | read error | `Err`, state unchanged |

use embedded_hal::digital::InputPin;

use crate::events::{ButtonEdge, ButtonId, Transition};

pub struct Button<P> {
    id: ButtonId,
    pin: P,
    active_high: bool,
    pressed: bool,
}

impl<P: InputPin> Button<P> {
    /// Wrap `pin`.  Assumed released until [`sync`](Self::sync) reads it.
    pub fn new(id: ButtonId, pin: P, active_high: bool) -> Self {
        Self {
            id,
            pin,
            active_high,
            pressed: false,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Last confirmed state.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Adopt the current line level without producing an edge.  Used at
    /// start-up; on sysfs the read also clears the pending notification.
    pub fn sync(&mut self) -> Result<bool, P::Error> {
        self.pressed = self.read_pressed()?;
        Ok(self.pressed)
    }

    /// Reconcile a readiness notification with the line level.
    pub fn reconcile(&mut self) -> Result<Option<ButtonEdge>, P::Error> {
        let pressed = self.read_pressed()?;
        if pressed == self.pressed {
            return Ok(None);
        }
        self.pressed = pressed;
        let transition = if pressed {
            Transition::Pressed
        } else {
            Transition::Released
        };
        Ok(Some(ButtonEdge {
            source: self.id,
            transition,
        }))
    }

    fn read_pressed(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        Ok(high == self.active_high)
    }
}
