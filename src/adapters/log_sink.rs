//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (syslog in the daemon, whatever the host installs in
//! tests).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { period, duty } => {
                info!("START | period={}ms duty={}%", period.as_millis(), duty.percent());
            }
            AppEvent::PeriodChanged { from, to, cause } => {
                info!(
                    "PERIOD | {}ms -> {}ms ({:?})",
                    from.as_millis(),
                    to.as_millis(),
                    cause
                );
            }
            AppEvent::DirectionChanged { from, to } => {
                info!("ACCEL | {:?} -> {:?}", from, to);
            }
            AppEvent::TimerOverrun { source, expirations } => {
                warn!("OVERRUN | {} expired {} times", source, expirations);
            }
        }
    }
}
