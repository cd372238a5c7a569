//! Command-line interface definitions.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::BlinkConfig;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "smartled")]
#[command(about = "Status LED blink controller with hold-to-accelerate buttons")]
pub struct Cli {
    /// Initial duty cycle in percent (values above 100 are clamped)
    #[arg(value_name = "DUTY")]
    pub duty: Option<u32>,

    /// Initial and reset blink period in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub period_ms: Option<u32>,

    /// JSON configuration file; command-line values override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Build the effective configuration: defaults, then the file, then the
    /// command line.
    pub fn load_config(&self) -> Result<BlinkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let bytes = fs::read(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                BlinkConfig::from_json(&bytes)
                    .with_context(|| format!("loading config {}", path.display()))?
            }
            None => BlinkConfig::default(),
        };

        if let Some(ms) = self.period_ms {
            config.period_ms = ms;
        }
        if let Some(duty) = self.duty {
            config.apply_duty(u8::try_from(duty).unwrap_or(u8::MAX));
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
