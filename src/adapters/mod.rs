//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter      | Implements                   | Connects to              |
//! |--------------|------------------------------|--------------------------|
//! | `log_sink`   | EventSink                    | `log` facade (syslog)    |
//! | `sysfs_gpio` | InputPin, OutputPin          | `/sys/class/gpio`        |
//! | `timerfd`    | TimerPort                    | Linux timerfd            |
//! | `epoll`      | Multiplexer, Register        | Linux epoll              |
//! | `board`      | —                            | bring-up of all of them  |
//!
//! Everything except `log_sink` needs the `linux` feature.

pub mod log_sink;

#[cfg(feature = "linux")]
pub mod board;
#[cfg(feature = "linux")]
pub mod epoll;
#[cfg(feature = "linux")]
pub mod sysfs_gpio;
#[cfg(feature = "linux")]
pub mod timerfd;
