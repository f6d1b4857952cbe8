//! Indicator device drivers.
//!
//! The daemon only needs one capability from a device: set a color. The
//! [`Indicator`] trait keeps device specifics out of the rest of the code;
//! [`LampController`] sits on top and drops repeated identical colors so
//! drivers see one command per actual change.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::error::LampError;

/// Color shown on the indicator lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampColor {
    /// Lamp off.
    Off,
    /// Failure somewhere.
    Red,
    /// Degraded but functional.
    Amber,
    /// All healthy.
    Green,
    /// Stream link lost.
    Blue,
    /// Connected but no state received yet.
    White,
}

impl LampColor {
    /// Wire command understood by the serial lamp firmware.
    #[must_use]
    pub fn as_command(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::White => "white",
        }
    }
}

impl fmt::Display for LampColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

impl FromStr for LampColor {
    type Err = LampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "red" => Ok(Self::Red),
            "amber" => Ok(Self::Amber),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "white" => Ok(Self::White),
            other => Err(LampError::Indicator(format!("unknown color: {other}"))),
        }
    }
}

/// An output device that can render one color.
pub trait Indicator {
    /// Render the given color on the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects the command.
    fn set_color(&mut self, color: LampColor) -> Result<(), LampError>;
}

impl Indicator for Box<dyn Indicator> {
    fn set_color(&mut self, color: LampColor) -> Result<(), LampError> {
        (**self).set_color(color)
    }
}

/// Development driver: logs the color instead of driving hardware.
#[derive(Debug, Default)]
pub struct ConsoleIndicator;

impl ConsoleIndicator {
    /// Create a console indicator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for ConsoleIndicator {
    fn set_color(&mut self, color: LampColor) -> Result<(), LampError> {
        info!(color = %color, "indicator");
        Ok(())
    }
}

/// Drives a lamp over a serial character device with one-line ASCII
/// commands (`red\n`, `off\n`, ...).
#[derive(Debug)]
pub struct SerialIndicator {
    device: File,
}

impl SerialIndicator {
    /// Open the device file.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened for writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LampError> {
        let device = OpenOptions::new()
            .write(true)
            .create(true)
            .open(path.as_ref())
            .map_err(|e| {
                LampError::Indicator(format!(
                    "failed to open device '{}': {}",
                    path.as_ref().display(),
                    e
                ))
            })?;
        Ok(Self { device })
    }
}

impl Indicator for SerialIndicator {
    fn set_color(&mut self, color: LampColor) -> Result<(), LampError> {
        self.device.write_all(color.as_command().as_bytes())?;
        self.device.write_all(b"\n")?;
        self.device.flush()?;
        Ok(())
    }
}

/// Deduplicating front for an indicator: forwards a color only when it
/// differs from the last one shown.
#[derive(Debug)]
pub struct LampController<I> {
    indicator: I,
    last: Option<LampColor>,
}

impl<I: Indicator> LampController<I> {
    /// Wrap an indicator.
    pub fn new(indicator: I) -> Self {
        Self {
            indicator,
            last: None,
        }
    }

    /// Show a color, skipping the device write when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects the command.
    pub fn show(&mut self, color: LampColor) -> Result<(), LampError> {
        if self.last == Some(color) {
            return Ok(());
        }
        self.indicator.set_color(color)?;
        self.last = Some(color);
        Ok(())
    }

    /// The wrapped indicator.
    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}
