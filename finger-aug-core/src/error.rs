//! Error types for the grip controller.

/// Errors that can occur while driving the finger augmentation hardware.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// A GPIO pin could not be claimed or accessed.
    #[cfg(target_os = "linux")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    /// The servo PWM channel could not be configured.
    #[cfg(target_os = "linux")]
    #[error("PWM error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    /// Communication with the display over I2C failed.
    #[cfg(target_os = "linux")]
    #[error("I2C error: {0}")]
    I2c(#[from] rppal::i2c::Error),

    /// Reading the analog input failed.
    #[error("Failed to read ADC sample from {path}")]
    AdcRead {
        /// The sysfs file that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The analog input returned something that is not a sample.
    #[error("Invalid ADC sample {value:?} from {path}")]
    InvalidSample {
        /// The sysfs file that was read.
        path: String,
        /// The raw contents, trimmed.
        value: String,
    },

    /// A pin, channel or bus could not be claimed during setup.
    #[error("Failed to bind {component}: {source}")]
    Bind {
        /// What was being claimed.
        component: &'static str,
        /// Why it could not be claimed.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Attempted to open a second board while one is still alive.
    #[error("Board already claimed - only one instance allowed")]
    AlreadyInitialized,

    /// A component was used before setup or after it was released.
    #[error("{0} is not set up")]
    NotConfigured(&'static str),

    /// The text does not fit on the display.
    #[error("Text {text:?} does not fit on a {max}-digit display")]
    TextTooLong {
        /// The rejected text.
        text: String,
        /// Number of digits available.
        max: usize,
    },

    /// The character has no seven-segment glyph.
    #[error("No seven-segment glyph for {0:?}")]
    UnsupportedCharacter(char),

    /// The device configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ControllerError {
    pub(crate) fn bind(
        component: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Bind {
            component,
            source: Box::new(source),
        }
    }
}
