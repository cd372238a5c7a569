//! Controller configuration parameters
//!
//! All tunable parameters for the status LED controller.  Defaults match the
//! board wiring in [`pins`](crate::pins); a JSON file and the command line
//! can override them at start-up.  Nothing is persisted across restarts.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Share of one blink period the LED spends on, clamped to 0–100 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DutyCycle(u8);

impl DutyCycle {
    pub const MAX_PERCENT: u8 = 100;

    /// Build a duty cycle, clamping anything above 100 %.
    pub const fn new(percent: u8) -> Self {
        if percent > Self::MAX_PERCENT {
            Self(Self::MAX_PERCENT)
        } else {
            Self(percent)
        }
    }

    pub const fn percent(self) -> u8 {
        self.0
    }
}

/// Inclusive `[min, max]` range every period adjustment is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub min: Duration,
    pub max: Duration,
}

impl PeriodBounds {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Clamp `period` into the range.  Never panics, even for an inverted range.
    pub fn clamp(&self, period: Duration) -> Duration {
        period.max(self.min).min(self.max)
    }

    pub fn contains(&self, period: Duration) -> bool {
        period >= self.min && period <= self.max
    }
}

/// How far one accelerate/decelerate step moves the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdjustStep {
    /// Add or subtract a fixed number of milliseconds.
    Fixed { ms: u32 },
    /// Multiply (decelerate) or divide (accelerate) by `percent / 100`.
    /// Must be above 100.
    Scale { percent: u16 },
}

impl AdjustStep {
    /// One step toward faster blinking, before clamping.
    pub fn shorten(self, period: Duration) -> Duration {
        match self {
            Self::Fixed { ms } => period.saturating_sub(Duration::from_millis(u64::from(ms))),
            Self::Scale { percent } => period
                .checked_mul(100)
                .and_then(|p| p.checked_div(u32::from(percent)))
                .unwrap_or(period),
        }
    }

    /// One step toward slower blinking, before clamping.
    pub fn lengthen(self, period: Duration) -> Duration {
        match self {
            Self::Fixed { ms } => period.saturating_add(Duration::from_millis(u64::from(ms))),
            Self::Scale { percent } => period
                .checked_mul(u32::from(percent))
                .map_or(Duration::MAX, |p| p / 100),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration document
// ---------------------------------------------------------------------------

/// GPIO line numbers and button polarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub led: u32,
    pub k1: u32,
    pub k2: u32,
    pub k3: u32,
    /// `true` if a button line reads `1` while pressed.
    pub buttons_active_high: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            led: pins::STATUS_LED_GPIO,
            k1: pins::BUTTON_K1_GPIO,
            k2: pins::BUTTON_K2_GPIO,
            k3: pins::BUTTON_K3_GPIO,
            buttons_active_high: true,
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    // --- Blink ---
    /// Default (and reset) blink period in milliseconds
    pub period_ms: u32,
    /// LED on-time share of each period (0-100%)
    pub duty_percent: u8,

    // --- Acceleration ---
    /// Shortest period the buttons can reach (milliseconds)
    pub min_period_ms: u32,
    /// Longest period the buttons can reach (milliseconds)
    pub max_period_ms: u32,
    /// Size of one accelerate/decelerate step
    pub step: AdjustStep,
    /// Interval between repeated steps while a button is held (milliseconds)
    pub repeat_interval_ms: u32,

    // --- Wiring ---
    pub lines: LineConfig,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            // Blink: 2 Hz, half on
            period_ms: 500,
            duty_percent: 50,

            // Acceleration
            min_period_ms: 50,
            max_period_ms: 5000,
            step: AdjustStep::Fixed { ms: 50 },
            repeat_interval_ms: 200,

            lines: LineConfig::default(),
        }
    }
}

impl BlinkConfig {
    /// Parse a JSON document and validate it.  Missing fields take defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|e| {
            log::warn!("config: parse error at line {}: {}", e.line(), e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.  Values are never silently clamped here;
    /// clamping the duty cycle is the command line's job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_ms == 0 {
            return Err(ConfigError::ValidationFailed("period_ms must be > 0"));
        }
        if self.duty_percent > DutyCycle::MAX_PERCENT {
            return Err(ConfigError::ValidationFailed("duty_percent must be <= 100"));
        }
        if self.min_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("min_period_ms must be > 0"));
        }
        if self.min_period_ms > self.max_period_ms {
            return Err(ConfigError::ValidationFailed(
                "min_period_ms must not exceed max_period_ms",
            ));
        }
        if !self.bounds().contains(self.period()) {
            return Err(ConfigError::ValidationFailed(
                "period_ms must lie within [min_period_ms, max_period_ms]",
            ));
        }
        match self.step {
            AdjustStep::Fixed { ms: 0 } => {
                return Err(ConfigError::ValidationFailed("fixed step must be > 0 ms"));
            }
            AdjustStep::Scale { percent } if percent <= 100 => {
                return Err(ConfigError::ValidationFailed("scale step must be > 100%"));
            }
            _ => {}
        }
        if self.repeat_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("repeat_interval_ms must be > 0"));
        }
        Ok(())
    }

    /// Override the duty cycle, clamping to 100 %.  Returns the value applied.
    pub fn apply_duty(&mut self, percent: u8) -> DutyCycle {
        let duty = DutyCycle::new(percent);
        if duty.percent() != percent {
            log::warn!("duty cycle {}% clamped to {}%", percent, duty.percent());
        }
        self.duty_percent = duty.percent();
        duty
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(u64::from(self.period_ms))
    }

    pub fn duty(&self) -> DutyCycle {
        DutyCycle::new(self.duty_percent)
    }

    pub fn bounds(&self) -> PeriodBounds {
        PeriodBounds::new(
            Duration::from_millis(u64::from(self.min_period_ms)),
            Duration::from_millis(u64::from(self.max_period_ms)),
        )
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.repeat_interval_ms))
    }
}
