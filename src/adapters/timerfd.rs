//! timerfd adapter for [`TimerPort`].
//!
//! `CLOCK_MONOTONIC`, non-blocking, close-on-exec.  The descriptor becomes
//! readable on expiry; reading it yields the number of expirations since
//! the last read and clears the readiness.

use core::time::Duration;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};

use log::{error, warn};
use nix::errno::Errno;
use nix::sys::time::TimeSpec;
use nix::sys::timerfd::{ClockId, Expiration, TimerFd, TimerFlags, TimerSetTimeFlags};

use crate::app::ports::TimerPort;
use crate::error::TimerError;

pub struct TimerFdTimer {
    fd: TimerFd,
    name: &'static str,
}

impl TimerFdTimer {
    /// Create a disarmed timer.  `name` only appears in log lines.
    pub fn new(name: &'static str) -> Result<Self, TimerError> {
        let fd = TimerFd::new(
            ClockId::CLOCK_MONOTONIC,
            TimerFlags::TFD_NONBLOCK | TimerFlags::TFD_CLOEXEC,
        )
        .map_err(|e| {
            error!("{}: timerfd_create failed: {}", name, e);
            TimerError::CreateFailed
        })?;
        Ok(Self { fd, name })
    }
}

impl TimerPort for TimerFdTimer {
    fn arm(&mut self, initial: Duration, repeat: Option<Duration>) -> Result<(), TimerError> {
        // A zero it_value would disarm instead of firing immediately.
        let initial = TimeSpec::from_duration(initial.max(Duration::from_nanos(1)));
        let expiration = match repeat {
            None => Expiration::OneShot(initial),
            Some(interval) => Expiration::IntervalDelayed(initial, TimeSpec::from_duration(interval)),
        };
        self.fd.set(expiration, TimerSetTimeFlags::empty()).map_err(|e| {
            warn!("{}: timerfd_settime failed: {}", self.name, e);
            TimerError::ArmFailed
        })
    }

    fn disarm(&mut self) -> Result<(), TimerError> {
        self.fd.unset().map_err(|e| {
            warn!("{}: disarm failed: {}", self.name, e);
            TimerError::DisarmFailed
        })
    }

    fn consume_expirations(&mut self) -> Result<u64, TimerError> {
        let mut buf = [0u8; 8];
        match nix::unistd::read(self.fd.as_fd().as_raw_fd(), &mut buf) {
            Ok(8) => Ok(u64::from_ne_bytes(buf)),
            Ok(n) => {
                warn!("{}: short read of {} bytes", self.name, n);
                Err(TimerError::ReadFailed)
            }
            Err(Errno::EAGAIN) => Ok(0),
            Err(e) => {
                warn!("{}: read failed: {}", self.name, e);
                Err(TimerError::ReadFailed)
            }
        }
    }
}

impl AsFd for TimerFdTimer {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}
