//! smartled daemon — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SysfsLine ×4      TimerFdTimer ×2    EpollMux   LogEventSink│
//! │  (In/OutputPin)    (TimerPort)        (Mux)      (EventSink) │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │ EventDispatcher                                        │  │
//! │  │   BlinkEngine · HoldRepeatController                   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, error, info};
use syslog::Facility;

use smartled::adapters::board;
use smartled::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Logging ────────────────────────────────────────────
    syslog::init(Facility::LOG_DAEMON, LevelFilter::Info, Some("smartled"))
        .map_err(|e| anyhow!("syslog init failed: {e}"))?;

    // ── 2. Configuration ──────────────────────────────────────
    let config = cli.load_config().inspect_err(|e| error!("{:#}", e))?;
    info!(
        "smartled {} starting: period={}ms duty={}%",
        env!("CARGO_PKG_VERSION"),
        config.period_ms,
        config.duty_percent
    );

    // ── 3. Board bring-up ─────────────────────────────────────
    let mut dispatcher = board::bring_up(&config)
        .inspect_err(|e| error!("bring-up failed: {}", e))
        .context("board bring-up")?;

    // ── 4. Event loop ─────────────────────────────────────────
    let Err(e) = dispatcher.run();
    error!("event loop stopped: {}", e);
    Err(e).context("event loop")
}
