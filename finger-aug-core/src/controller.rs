//! Grip controller: the polling loop that ties the board together.

use crate::board::{Board, Led};
use crate::config::DeviceConfig;
use crate::error::ControllerError;
use crate::grip::{
    DEAD_TEXT, NEUTRAL_DUTY, OFF_TEXT, duty_from_quantized, level_from_quantized, quantize,
    status_text,
};
use crate::state::RunState;

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// One potentiometer reading and what it was reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// ADC counts as read.
    pub raw: u16,
    /// Raw counts divided by 16.
    pub quantized: u32,
    /// Grip level derived from the quantized value.
    pub level: u32,
}

/// Why [`GripController::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The button was pressed and the device is now off.
    ButtonPressed,
    /// The interrupt flag was raised before the button was pressed.
    Interrupted,
}

/// The finger augmentation controller.
///
/// Owns the board and the run state. Two states: running (initial) and
/// stopped (terminal, entered on a button press). Hardware is cleaned up by
/// [`cleanup`](Self::cleanup), or on drop if that was never called.
///
/// # Example
///
/// ```
/// use finger_aug_core::{DeviceConfig, GripController, MockBoard, RunOutcome};
/// use std::sync::atomic::AtomicBool;
///
/// let mock = MockBoard::new().with_samples([1600]).press_button_on_read(2);
/// let mut controller = GripController::setup(DeviceConfig::default(), mock.clone())?;
///
/// let outcome = controller.run(&AtomicBool::new(false))?;
/// assert_eq!(outcome, RunOutcome::ButtonPressed);
/// controller.cleanup()?;
/// # Ok::<(), finger_aug_core::ControllerError>(())
/// ```
pub struct GripController<B: Board> {
    config: DeviceConfig,
    board: B,
    state: RunState,
    cleaned_up: bool,
}

impl<B: Board> GripController<B> {
    /// Validate `config` and configure the board for it.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::InvalidConfig`] if the assignments are inconsistent
    /// - whatever the board reports if a pin or bus cannot be bound
    pub fn setup(config: DeviceConfig, mut board: B) -> Result<Self, ControllerError> {
        config.validate()?;
        board.setup(&config)?;
        info!(
            "controller set up (reset time {:?} is not used by the loop)",
            config.reset_time
        );

        Ok(Self {
            config,
            board,
            state: RunState::new(),
            cleaned_up: false,
        })
    }

    /// The configuration the controller was set up with.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// A snapshot of the run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The board being driven.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Read the potentiometer and refresh the display if the quantized value
    /// moved.
    ///
    /// The display shows `"ON<level>"` with the colon lit. It is only
    /// rewritten when the quantized value differs from the last one, which may
    /// rewrite an unchanged level.
    pub fn sample_level(&mut self) -> Result<Sample, ControllerError> {
        let raw = self.board.read_analog_raw()?;
        let quantized = quantize(raw);
        let level = level_from_quantized(quantized);

        if self.state.last_displayed != Some(quantized) {
            debug!(
                "sample changed: raw={}, quantized={}, level={}",
                raw, quantized, level
            );
            self.board.display_colon(true)?;
            self.board.display_text(&status_text(level))?;
            thread::sleep(self.config.display_settle);
        }
        self.state.last_displayed = Some(quantized);

        Ok(Sample {
            raw,
            quantized,
            level,
        })
    }

    /// Position the servo for a quantized sample.
    pub fn drive_actuator(&mut self, quantized: u32) -> Result<(), ControllerError> {
        self.board.set_servo_duty(duty_from_quantized(quantized))
    }

    /// `true` while the button is held. The button is wired active-low.
    pub fn poll_button(&mut self) -> Result<bool, ControllerError> {
        Ok(!self.board.button_is_high()?)
    }

    /// Run one pass of the loop body.
    ///
    /// Returns whether the controller is still running afterwards. Once
    /// stopped, further calls do nothing and return `false`.
    pub fn step(&mut self) -> Result<bool, ControllerError> {
        if !self.state.running {
            return Ok(false);
        }

        self.board.set_led(Led::Green, true)?;
        let sample = self.sample_level()?;
        self.drive_actuator(sample.quantized)?;

        if self.poll_button()? {
            self.switch_off()?;
        }
        Ok(self.state.running)
    }

    /// Loop until the button is pressed or `interrupt` is raised.
    ///
    /// The flag is checked before every pass; a pass that has started always
    /// completes.
    pub fn run(&mut self, interrupt: &AtomicBool) -> Result<RunOutcome, ControllerError> {
        info!("running");
        loop {
            if interrupt.load(Ordering::SeqCst) {
                info!("interrupted");
                return Ok(RunOutcome::Interrupted);
            }
            if !self.step()? {
                return Ok(RunOutcome::ButtonPressed);
            }
        }
    }

    fn switch_off(&mut self) -> Result<(), ControllerError> {
        info!("button pressed, switching off");
        self.board.set_servo_duty(NEUTRAL_DUTY)?;
        self.board.display_text(OFF_TEXT)?;
        self.board.set_led(Led::Green, false)?;
        self.board.set_led(Led::Red, true)?;
        self.state.running = false;
        Ok(())
    }

    /// Blank the LEDs, show the terminal message and release the hardware.
    ///
    /// Every step is attempted even if an earlier one fails; the first
    /// failure is returned. Calling this again does nothing.
    pub fn cleanup(&mut self) -> Result<(), ControllerError> {
        if self.cleaned_up {
            debug!("cleanup already done");
            return Ok(());
        }
        self.cleaned_up = true;
        self.state.running = false;

        let mut first_error = None;
        let mut check = |step: &str, result: Result<(), ControllerError>| {
            if let Err(e) = result {
                warn!("cleanup: {} failed: {}", step, e);
                first_error.get_or_insert(e);
            }
        };

        check("display text", self.board.display_text(DEAD_TEXT));
        check("display colon", self.board.display_colon(false));
        check("red LED", self.board.set_led(Led::Red, false));
        check("green LED", self.board.set_led(Led::Green, false));
        check("GPIO release", self.board.release());
        check("servo", self.board.servo_cleanup());

        info!("hardware cleaned up");
        first_error.map_or(Ok(()), Err)
    }
}

impl<B: Board> Drop for GripController<B> {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("cleanup on drop failed: {}", e);
        }
    }
}
