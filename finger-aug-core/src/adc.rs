//! Analog input through the Linux IIO sysfs interface.

use crate::error::ControllerError;
use log::trace;
use std::fs;
use std::path::{Path, PathBuf};

const IIO_DEVICES: &str = "/sys/bus/iio/devices";

/// One IIO voltage channel.
#[derive(Debug, Clone)]
pub struct IioAdc {
    path: PathBuf,
}

impl IioAdc {
    /// The `in_voltage{channel}_raw` file of IIO device `device`.
    pub fn for_channel(device: u8, channel: u8) -> Self {
        Self::with_path(
            Path::new(IIO_DEVICES)
                .join(format!("iio:device{}", device))
                .join(format!("in_voltage{}_raw", channel)),
        )
    }

    /// Read samples from an arbitrary file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file samples are read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one raw sample in ADC counts.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::AdcRead`] if the file cannot be read
    /// - [`ControllerError::InvalidSample`] if it does not hold an unsigned count
    pub fn read_raw(&self) -> Result<u16, ControllerError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| ControllerError::AdcRead {
            path: self.path.display().to_string(),
            source,
        })?;

        let value = contents.trim();
        trace!("{} = {}", self.path.display(), value);
        value
            .parse::<u16>()
            .map_err(|_| ControllerError::InvalidSample {
                path: self.path.display().to_string(),
                value: value.to_string(),
            })
    }
}
