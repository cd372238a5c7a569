//! smartled — status LED blink controller.
//!
//! Exposes the controller core for integration testing and for the daemon
//! binary.  The Linux adapters (sysfs GPIO, timerfd, epoll) are built with
//! the `linux` feature, which is on by default.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
