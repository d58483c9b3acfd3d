//! Grip-level arithmetic.
//!
//! The potentiometer sample is reduced in two steps: the raw ADC count is
//! quantized, and the quantized value is turned into a servo duty cycle. The
//! grip level shown on the display is the distance of that duty cycle (in
//! whole percent) from the center value of 8.
//!
//! | quantized | duty       | level |
//! |-----------|------------|-------|
//! | 0..=49    | 3.00..3.98 | 5     |
//! | 50..=99   | 4.00..4.98 | 4     |
//! | 100..=149 | 5.00..5.98 | 3     |
//! | 150..=199 | 6.00..6.98 | 2     |
//! | 200..=249 | 7.00..7.98 | 1     |
//! | 250..=255 | 8.00..8.10 | 0     |

/// Raw ADC counts per quantization step.
pub const QUANTIZE_STEP: u16 = 16;

/// Quantization steps per percent of duty cycle.
pub const DUTY_DIVISOR: f64 = 50.0;

/// Duty cycle (percent) with the potentiometer at zero.
pub const DUTY_OFFSET: f64 = 3.0;

/// Duty cycle (whole percent) the grip level is measured from.
pub const LEVEL_CENTER: i64 = 8;

/// Duty cycle that leaves the grip line without tension.
pub const NEUTRAL_DUTY: f64 = 8.5;

/// Shown when the button stops the device.
pub const OFF_TEXT: &str = "OFF";

/// Shown once the hardware has been cleaned up.
pub const DEAD_TEXT: &str = "DEAD";

/// Reduce a raw ADC sample to the unit used for change detection.
pub fn quantize(raw: u16) -> u32 {
    u32::from(raw / QUANTIZE_STEP)
}

/// Servo duty cycle, in percent, for a quantized sample.
pub fn duty_from_quantized(quantized: u32) -> f64 {
    f64::from(quantized) / DUTY_DIVISOR + DUTY_OFFSET
}

/// Grip level for a quantized sample.
///
/// Not clamped: a 12-bit ADC keeps this within `0..=5`, wider samples give
/// larger values.
pub fn level_from_quantized(quantized: u32) -> u32 {
    // duty is always positive, so the cast truncates exactly like floor
    let whole_duty = duty_from_quantized(quantized).floor() as i64;
    (whole_duty - LEVEL_CENTER).unsigned_abs() as u32
}

/// Display text while the device is running.
pub fn status_text(level: u32) -> String {
    format!("ON{}", level)
}
