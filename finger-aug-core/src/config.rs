//! Device configuration.

use crate::error::ControllerError;
use std::time::Duration;

/// Pin, bus and timing assignments for one device.
///
/// Captured once when the controller is set up and read-only afterwards.
/// GPIO numbers are BCM numbers on the Raspberry Pi header.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    /// Button hold threshold. Kept for wiring compatibility; the control loop
    /// does not read it.
    pub reset_time: Duration,
    /// Active-low push button.
    pub button_pin: u8,
    /// LED lit while the device is off.
    pub red_led_pin: u8,
    /// LED lit while the device is on.
    pub green_led_pin: u8,
    /// Linux IIO device index of the ADC.
    pub adc_device: u8,
    /// Voltage channel the potentiometer is wired to.
    pub adc_channel: u8,
    /// Hardware PWM channel driving the servo (0 or 1).
    pub servo_channel: u8,
    /// I2C bus of the HT16K33 display.
    pub i2c_bus: u8,
    /// I2C address of the HT16K33 display.
    pub i2c_address: u16,
    /// Pause after every display refresh.
    pub display_settle: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            reset_time: Duration::from_secs(2),
            button_pin: 17,
            red_led_pin: 27,
            green_led_pin: 22,
            adc_device: 0,
            adc_channel: 0,
            servo_channel: 0,
            i2c_bus: 1,
            i2c_address: 0x70,
            display_settle: Duration::from_millis(100),
        }
    }
}

impl DeviceConfig {
    /// Check that the assignments can be wired up at all.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidConfig`] if two GPIO roles share a pin, the
    /// PWM channel does not exist or the I2C address is not a 7-bit address.
    pub fn validate(&self) -> Result<(), ControllerError> {
        let pins = [self.button_pin, self.red_led_pin, self.green_led_pin];
        if pins[0] == pins[1] || pins[0] == pins[2] || pins[1] == pins[2] {
            return Err(ControllerError::InvalidConfig(format!(
                "button, red LED and green LED need distinct pins (got {:?})",
                pins
            )));
        }
        if self.servo_channel > 1 {
            return Err(ControllerError::InvalidConfig(format!(
                "PWM channel {} does not exist (expected 0 or 1)",
                self.servo_channel
            )));
        }
        if self.i2c_address > 0x7F {
            return Err(ControllerError::InvalidConfig(format!(
                "I2C address {:#x} is not a 7-bit address",
                self.i2c_address
            )));
        }
        Ok(())
    }
}
