//! Hardware seam between the control loop and the device.

use crate::config::DeviceConfig;
use crate::error::ControllerError;

/// The two status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    /// Lit while the device is off.
    Red,
    /// Lit while the device is on.
    Green,
}

/// Trait for board implementations.
///
/// This allows for mock implementations in tests. Every call is a blocking,
/// fire-and-forget operation on one piece of hardware.
pub trait Board {
    /// Claim the pins and buses named in `config`: the button as an input,
    /// both LEDs as outputs, the ADC, the servo PWM and the display.
    fn setup(&mut self, config: &DeviceConfig) -> Result<(), ControllerError>;

    /// Switch a status LED on or off.
    fn set_led(&mut self, led: Led, on: bool) -> Result<(), ControllerError>;

    /// Current logic level of the button pin.
    fn button_is_high(&mut self) -> Result<bool, ControllerError>;

    /// One raw sample from the potentiometer, in ADC counts.
    fn read_analog_raw(&mut self) -> Result<u16, ControllerError>;

    /// Position the servo. `duty` is a duty cycle in percent.
    fn set_servo_duty(&mut self, duty: f64) -> Result<(), ControllerError>;

    /// Stop driving the servo and release its channel.
    fn servo_cleanup(&mut self) -> Result<(), ControllerError>;

    /// Render a short string across the display digits.
    fn display_text(&mut self, text: &str) -> Result<(), ControllerError>;

    /// Enable or disable the colon between the middle digits.
    fn display_colon(&mut self, on: bool) -> Result<(), ControllerError>;

    /// Give the GPIO pins back.
    fn release(&mut self) -> Result<(), ControllerError>;
}
