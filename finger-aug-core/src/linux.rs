//! Board implementation for the Raspberry Pi header.

use crate::adc::IioAdc;
use crate::board::{Board, Led};
use crate::config::DeviceConfig;
use crate::display::Ht16k33;
use crate::error::ControllerError;

use log::{debug, info, trace};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::pwm::{Channel, Polarity, Pwm};
use std::sync::atomic::{AtomicBool, Ordering};

/// Standard hobby servo frame rate (20 ms period).
const SERVO_FREQUENCY_HZ: f64 = 50.0;

/// Guard to ensure only one board claims the header at a time.
static BOARD_CLAIMED: AtomicBool = AtomicBool::new(false);

struct Pins {
    button: InputPin,
    red_led: OutputPin,
    green_led: OutputPin,
}

/// The physical device.
///
/// Created unbound; [`Board::setup`] claims GPIO, PWM, I2C and the ADC.
/// Calls on a component before setup, or after it has been released, fail
/// with [`ControllerError::NotConfigured`].
///
/// # Example
///
/// ```no_run
/// use finger_aug_core::{DeviceConfig, GripController, LinuxBoard};
///
/// let board = LinuxBoard::new()?;
/// let mut controller = GripController::setup(DeviceConfig::default(), board)?;
/// controller.cleanup()?;
/// # Ok::<(), finger_aug_core::ControllerError>(())
/// ```
pub struct LinuxBoard {
    pins: Option<Pins>,
    adc: Option<IioAdc>,
    servo: Option<Pwm>,
    display: Option<Ht16k33>,
}

impl LinuxBoard {
    /// Reserve the board for this process.
    ///
    /// The guard is released when the board is dropped.
    ///
    /// # Errors
    ///
    /// [`ControllerError::AlreadyInitialized`] if another board still exists.
    pub fn new() -> Result<Self, ControllerError> {
        if BOARD_CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(ControllerError::AlreadyInitialized);
        }

        Ok(Self {
            pins: None,
            adc: None,
            servo: None,
            display: None,
        })
    }

    fn pins(&mut self) -> Result<&mut Pins, ControllerError> {
        self.pins.as_mut().ok_or(ControllerError::NotConfigured("GPIO"))
    }

    fn servo(&self) -> Result<&Pwm, ControllerError> {
        self.servo.as_ref().ok_or(ControllerError::NotConfigured("servo"))
    }

    fn display(&mut self) -> Result<&mut Ht16k33, ControllerError> {
        self.display
            .as_mut()
            .ok_or(ControllerError::NotConfigured("display"))
    }
}

fn pwm_channel(index: u8) -> Result<Channel, ControllerError> {
    match index {
        0 => Ok(Channel::Pwm0),
        1 => Ok(Channel::Pwm1),
        other => Err(ControllerError::InvalidConfig(format!(
            "PWM channel {} does not exist (expected 0 or 1)",
            other
        ))),
    }
}

impl Board for LinuxBoard {
    fn setup(&mut self, config: &DeviceConfig) -> Result<(), ControllerError> {
        let gpio = Gpio::new().map_err(|e| ControllerError::bind("GPIO", e))?;
        let pin = |number: u8, role: &'static str| {
            gpio.get(number).map_err(|e| ControllerError::bind(role, e))
        };
        let pins = Pins {
            button: pin(config.button_pin, "button pin")?.into_input(),
            red_led: pin(config.red_led_pin, "red LED pin")?.into_output_low(),
            green_led: pin(config.green_led_pin, "green LED pin")?.into_output_low(),
        };
        debug!(
            "GPIO claimed: button={}, red={}, green={}",
            config.button_pin, config.red_led_pin, config.green_led_pin
        );

        let adc = IioAdc::for_channel(config.adc_device, config.adc_channel);
        debug!("ADC at {}", adc.path().display());

        let servo = Pwm::with_frequency(
            pwm_channel(config.servo_channel)?,
            SERVO_FREQUENCY_HZ,
            0.0,
            Polarity::Normal,
            true,
        )
        .map_err(|e| ControllerError::bind("servo PWM", e))?;

        let display = Ht16k33::new(config.i2c_bus, config.i2c_address)
            .map_err(|e| ControllerError::bind("display", e))?;

        self.pins = Some(pins);
        self.adc = Some(adc);
        self.servo = Some(servo);
        self.display = Some(display);
        info!("board ready");
        Ok(())
    }

    fn set_led(&mut self, led: Led, on: bool) -> Result<(), ControllerError> {
        let pins = self.pins()?;
        let pin = match led {
            Led::Red => &mut pins.red_led,
            Led::Green => &mut pins.green_led,
        };
        if on {
            pin.set_high();
        } else {
            pin.set_low();
        }
        Ok(())
    }

    fn button_is_high(&mut self) -> Result<bool, ControllerError> {
        Ok(self.pins()?.button.is_high())
    }

    fn read_analog_raw(&mut self) -> Result<u16, ControllerError> {
        self.adc
            .as_ref()
            .ok_or(ControllerError::NotConfigured("ADC"))?
            .read_raw()
    }

    fn set_servo_duty(&mut self, duty: f64) -> Result<(), ControllerError> {
        trace!("servo duty {:.2}%", duty);
        self.servo()?.set_duty_cycle(duty / 100.0)?;
        Ok(())
    }

    fn servo_cleanup(&mut self) -> Result<(), ControllerError> {
        let servo = self
            .servo
            .take()
            .ok_or(ControllerError::NotConfigured("servo"))?;
        servo.set_duty_cycle(0.0)?;
        servo.disable()?;
        debug!("servo stopped");
        Ok(())
    }

    fn display_text(&mut self, text: &str) -> Result<(), ControllerError> {
        self.display()?.text(text)
    }

    fn display_colon(&mut self, on: bool) -> Result<(), ControllerError> {
        self.display()?.set_colon(on)
    }

    fn release(&mut self) -> Result<(), ControllerError> {
        // rppal puts each pin back in its original mode when it is dropped
        if self.pins.take().is_some() {
            debug!("GPIO released");
        }
        Ok(())
    }
}

impl Drop for LinuxBoard {
    fn drop(&mut self) {
        BOARD_CLAIMED.store(false, Ordering::SeqCst);
    }
}
