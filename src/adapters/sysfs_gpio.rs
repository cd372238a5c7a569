//! sysfs GPIO adapter.
//!
//! Opens lines under `/sys/class/gpio` and exposes them through the
//! `embedded-hal` digital traits.  Bring-up of one line:
//!
//! ```text
//!   unexport (stale, best effort) → export → direction → [edge] → open value
//! ```
//!
//! The `value` attribute is read and written positionally at offset 0, so
//! the same descriptor can be re-read after every edge notification without
//! seeking.  A line is unexported again when its [`SysfsLine`] is dropped.

use std::fs::{self, File, OpenOptions};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::{debug, warn};

use crate::error::GpioError;
use crate::pins::SYSFS_GPIO_ROOT;

/// Value written to a line's `edge` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    Rising,
    Falling,
    Both,
}

impl Edge {
    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Both => "both",
        }
    }
}

/// Handle on a sysfs GPIO class directory.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsGpio {
    pub fn new() -> Self {
        Self::with_root(SYSFS_GPIO_ROOT)
    }

    /// Use a different class directory (tests point this at a scratch dir).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Export `line`, clearing any export left over from a previous run.
    pub fn export(&self, line: u32) -> Result<(), GpioError> {
        if self.unexport(line).is_ok() {
            debug!("gpio{}: cleared previous export", line);
        }
        fs::write(self.root.join("export"), line.to_string()).map_err(|e| {
            warn!("gpio{}: export failed: {}", line, e);
            GpioError::ExportFailed(line)
        })
    }

    pub fn unexport(&self, line: u32) -> Result<(), GpioError> {
        unexport_at(&self.root, line)
    }

    /// Export `line` as an output and open its value attribute.
    pub fn open_output(&self, line: u32) -> Result<SysfsLine, GpioError> {
        self.export(line)?;
        self.write_attr(line, "direction", "out")
            .map_err(|_| GpioError::DirectionFailed(line))?;
        self.open_value(line, true)
    }

    /// Export `line` as an input with edge notification on `edge`.
    pub fn open_input(&self, line: u32, edge: Edge) -> Result<SysfsLine, GpioError> {
        self.export(line)?;
        self.write_attr(line, "direction", "in")
            .map_err(|_| GpioError::DirectionFailed(line))?;
        self.write_attr(line, "edge", edge.as_str())
            .map_err(|_| GpioError::EdgeFailed(line))?;
        self.open_value(line, false)
    }

    fn line_dir(&self, line: u32) -> PathBuf {
        self.root.join(format!("gpio{line}"))
    }

    fn write_attr(&self, line: u32, attr: &str, value: &str) -> std::io::Result<()> {
        fs::write(self.line_dir(line).join(attr), value).inspect_err(|e| {
            warn!("gpio{}: writing {:?} to {} failed: {}", line, value, attr, e);
        })
    }

    fn open_value(&self, line: u32, writable: bool) -> Result<SysfsLine, GpioError> {
        let value = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(self.line_dir(line).join("value"))
            .map_err(|e| {
                warn!("gpio{}: opening value failed: {}", line, e);
                GpioError::OpenFailed(line)
            })?;
        Ok(SysfsLine {
            line,
            value,
            root: self.root.clone(),
        })
    }
}

fn unexport_at(root: &Path, line: u32) -> Result<(), GpioError> {
    fs::write(root.join("unexport"), line.to_string()).map_err(|_| GpioError::ExportFailed(line))
}

/// One exported GPIO line with its `value` attribute held open.
#[derive(Debug)]
pub struct SysfsLine {
    line: u32,
    value: File,
    root: PathBuf,
}

impl SysfsLine {
    pub fn line(&self) -> u32 {
        self.line
    }

    fn read_level(&self) -> Result<bool, GpioError> {
        let mut buf = [0u8; 1];
        match self.value.read_at(&mut buf, 0) {
            Ok(1) => {}
            Ok(_) => return Err(GpioError::ReadFailed(self.line)),
            Err(e) => {
                warn!("gpio{}: read failed: {}", self.line, e);
                return Err(GpioError::ReadFailed(self.line));
            }
        }
        match buf[0] {
            b'0' => Ok(false),
            b'1' => Ok(true),
            _ => Err(GpioError::InvalidLevel(self.line)),
        }
    }

    fn write_level(&self, high: bool) -> Result<(), GpioError> {
        let byte: &[u8] = if high { b"1" } else { b"0" };
        match self.value.write_at(byte, 0) {
            Ok(1) => Ok(()),
            Ok(_) => Err(GpioError::WriteFailed(self.line)),
            Err(e) => {
                warn!("gpio{}: write failed: {}", self.line, e);
                Err(GpioError::WriteFailed(self.line))
            }
        }
    }
}

impl ErrorType for SysfsLine {
    type Error = GpioError;
}

impl InputPin for SysfsLine {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        self.read_level()
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.read_level().map(|high| !high)
    }
}

impl OutputPin for SysfsLine {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.write_level(false)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.write_level(true)
    }
}

impl AsFd for SysfsLine {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.value.as_fd()
    }
}

impl Drop for SysfsLine {
    fn drop(&mut self) {
        if unexport_at(&self.root, self.line).is_err() {
            debug!("gpio{}: unexport on drop failed", self.line);
        }
    }
}
