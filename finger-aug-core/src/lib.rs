//! Grip controller for a sixth-finger augmentation.
//!
//! A potentiometer sets the grip level (0-5). The controller polls it, drives
//! a servo that tensions the finger's grip line, shows the level on an
//! HT16K33 seven-segment display and lights a green LED while running. A
//! press of the button returns the servo to its no-tension position, shows
//! `OFF`, lights the red LED and ends the loop.
//!
//! # Hardware
//!
//! - HT16K33 four-digit display on I2C
//! - Push button (active-low)
//! - Red and green LEDs
//! - Potentiometer on an IIO-exposed ADC
//! - Hobby servo on a hardware PWM channel
//!
//! # Example
//!
//! ```no_run
//! use finger_aug_core::{DeviceConfig, GripController, LinuxBoard};
//! use std::sync::atomic::AtomicBool;
//!
//! fn main() -> Result<(), finger_aug_core::ControllerError> {
//!     let board = LinuxBoard::new()?;
//!     let mut controller = GripController::setup(DeviceConfig::default(), board)?;
//!
//!     let stop = AtomicBool::new(false);
//!     let outcome = controller.run(&stop)?;
//!     println!("stopped: {:?}", outcome);
//!
//!     controller.cleanup()
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockBoard`] to run the loop without hardware:
//!
//! ```
//! use finger_aug_core::{DeviceConfig, GripController, MockBoard};
//! use std::time::Duration;
//!
//! let config = DeviceConfig {
//!     display_settle: Duration::ZERO,
//!     ..Default::default()
//! };
//! let mock = MockBoard::new().with_samples([4095]);
//! let mut controller = GripController::setup(config, mock.clone()).unwrap();
//! controller.step().unwrap();
//! assert_eq!(mock.display_texts(), vec!["ON0".to_string()]);
//! ```

#![warn(missing_docs)]

mod adc;
mod board;
mod config;
mod controller;
pub mod display;
mod error;
pub mod grip;
#[cfg(target_os = "linux")]
mod linux;
mod mock;
mod state;

// Re-export public API
pub use adc::IioAdc;
pub use board::{Board, Led};
pub use config::DeviceConfig;
pub use controller::{GripController, RunOutcome, Sample};
pub use error::ControllerError;
#[cfg(target_os = "linux")]
pub use linux::LinuxBoard;
pub use mock::{BoardEvent, MockBoard};
pub use state::RunState;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn test_config() -> DeviceConfig {
        let _ = env_logger::builder().is_test(true).try_init();
        DeviceConfig {
            display_settle: Duration::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_samples_refresh_display_once() {
        let mock = MockBoard::new().with_samples([100, 100]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        controller.sample_level().unwrap();
        controller.sample_level().unwrap();

        assert_eq!(mock.display_texts().len(), 1);
        assert_eq!(mock.count(&BoardEvent::DisplayColon(true)), 1);
    }

    #[test]
    fn test_differing_samples_refresh_display_twice() {
        let mock = MockBoard::new().with_samples([100, 200]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        controller.sample_level().unwrap();
        controller.sample_level().unwrap();

        assert_eq!(mock.display_texts().len(), 2);
    }

    #[test]
    fn test_same_quantum_different_raw_is_skipped() {
        // 16 and 31 both quantize to 1
        let mock = MockBoard::new().with_samples([16, 31]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let first = controller.sample_level().unwrap();
        let second = controller.sample_level().unwrap();

        assert_eq!(first.quantized, second.quantized);
        assert_eq!(mock.display_texts(), vec!["ON5".to_string()]);
        assert_eq!(controller.state().last_displayed, Some(1));
    }

    #[test]
    fn test_repeated_level_still_refreshes_on_new_quantum() {
        // 16 -> q=1 and 400 -> q=25 are both level 5
        let mock = MockBoard::new().with_samples([16, 400]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let first = controller.sample_level().unwrap();
        let second = controller.sample_level().unwrap();

        assert_eq!(
            first,
            Sample {
                raw: 16,
                quantized: 1,
                level: 5
            }
        );
        assert_eq!(second.quantized, 25);
        assert_eq!(second.level, 5);
        assert_eq!(
            mock.display_texts(),
            vec!["ON5".to_string(), "ON5".to_string()]
        );
    }

    #[test]
    fn test_step_drives_servo_from_quantized_value() {
        let mock = MockBoard::new().with_samples([1600, 4095]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        assert!(controller.step().unwrap());
        assert!(controller.step().unwrap());

        let duties = mock.servo_duties();
        assert_eq!(duties.len(), 2);
        assert_eq!(duties[0], 5.0);
        assert!((duties[1] - 8.1).abs() < 1e-9);
        assert_eq!(mock.display_texts(), vec!["ON3".to_string(), "ON0".to_string()]);
    }

    #[test]
    fn test_green_led_set_every_pass() {
        let mock = MockBoard::new().with_samples([0]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        for _ in 0..3 {
            controller.step().unwrap();
        }

        assert_eq!(mock.count(&BoardEvent::Led(Led::Green, true)), 3);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Red, true)), 0);
    }

    #[test]
    fn test_button_press_stops_on_that_pass() {
        let mock = MockBoard::new().with_samples([800]).press_button_on_read(2);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let outcome = controller.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(outcome, RunOutcome::ButtonPressed);
        assert_eq!(mock.button_reads(), 3);
        assert!(!controller.state().running);

        let events = mock.events();
        let tail = &events[events.len() - 4..];
        assert_eq!(
            tail,
            &[
                BoardEvent::ServoDuty(8.5),
                BoardEvent::DisplayText("OFF".to_string()),
                BoardEvent::Led(Led::Green, false),
                BoardEvent::Led(Led::Red, true),
            ]
        );
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mock = MockBoard::new().press_button_on_read(0);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        assert!(!controller.step().unwrap());
        let recorded = mock.events().len();

        assert!(!controller.step().unwrap());
        let outcome = controller.run(&AtomicBool::new(false)).unwrap();
        assert_eq!(outcome, RunOutcome::ButtonPressed);
        assert_eq!(mock.events().len(), recorded);
    }

    #[test]
    fn test_interrupt_flag_ends_run() {
        let mock = MockBoard::new();
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let outcome = controller.run(&AtomicBool::new(true)).unwrap();

        assert_eq!(outcome, RunOutcome::Interrupted);
        assert_eq!(mock.events(), vec![BoardEvent::Setup]);
        assert!(controller.state().running);
    }

    fn assert_released_once(mock: &MockBoard) {
        assert_eq!(mock.count(&BoardEvent::Led(Led::Red, false)), 1);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Green, false)), 1);
        assert_eq!(mock.count(&BoardEvent::Released), 1);
        assert_eq!(mock.count(&BoardEvent::ServoCleanup), 1);
    }

    #[test]
    fn test_interrupt_mid_run_finishes_pass() {
        let interrupted = Arc::new(AtomicBool::new(false));
        let mock = MockBoard::new()
            .with_samples([100, 900, 2000])
            .interrupt_on_read(2, Arc::clone(&interrupted));
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let outcome = controller.run(&interrupted).unwrap();

        assert_eq!(outcome, RunOutcome::Interrupted);
        assert!(interrupted.load(Ordering::SeqCst));
        assert_eq!(controller.board().button_reads(), 3);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Green, true)), 3);
        assert_eq!(mock.servo_duties().len(), 3);
        assert!(controller.state().running);

        controller.cleanup().unwrap();

        assert_released_once(&mock);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Red, true)), 0);
        assert_eq!(mock.events().last(), Some(&BoardEvent::ServoCleanup));
    }

    #[test]
    fn test_cleanup_after_button_run() {
        let mock = MockBoard::new().with_samples([3500]).press_button_on_read(1);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let outcome = controller.run(&AtomicBool::new(false)).unwrap();
        assert_eq!(outcome, RunOutcome::ButtonPressed);

        controller.cleanup().unwrap();
        controller.cleanup().unwrap();

        // green goes low once when switching off and once more in cleanup
        assert_eq!(mock.count(&BoardEvent::Led(Led::Green, false)), 2);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Red, true)), 1);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Red, false)), 1);
        assert_eq!(mock.count(&BoardEvent::Released), 1);
        assert_eq!(mock.count(&BoardEvent::ServoCleanup), 1);
        assert_eq!(
            mock.display_texts(),
            vec!["ON1".to_string(), "OFF".to_string(), "DEAD".to_string()]
        );
    }

    #[test]
    fn test_cleanup_keeps_going_after_failure() {
        let mock = MockBoard::new().failing_display();
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        let result = controller.cleanup();

        assert!(matches!(
            result,
            Err(ControllerError::NotConfigured("display"))
        ));
        assert_released_once(&mock);
        assert_eq!(mock.count(&BoardEvent::DisplayColon(false)), 1);
        assert!(mock.display_texts().is_empty());

        let recorded = mock.events().len();
        assert!(controller.cleanup().is_ok());
        drop(controller);
        assert_eq!(mock.events().len(), recorded);
    }

    #[test]
    fn test_failed_cleanup_on_drop_does_not_panic() {
        let mock = MockBoard::new().failing_display();
        {
            let _controller = GripController::setup(test_config(), mock.clone()).unwrap();
        }

        assert_released_once(&mock);
    }

    #[test]
    fn test_controller_keeps_its_config() {
        let config = DeviceConfig {
            button_pin: 5,
            i2c_address: 0x71,
            ..test_config()
        };
        let controller = GripController::setup(config.clone(), MockBoard::new()).unwrap();

        assert_eq!(controller.config(), &config);
        assert_eq!(controller.config().display_settle, Duration::ZERO);
    }

    #[test]
    fn test_cleanup_releases_everything_once() {
        let mock = MockBoard::new().with_samples([100]);
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();
        controller.step().unwrap();

        controller.cleanup().unwrap();
        controller.cleanup().unwrap();
        drop(controller);

        assert_eq!(mock.count(&BoardEvent::ServoCleanup), 1);
        assert_eq!(mock.count(&BoardEvent::Released), 1);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Red, false)), 1);
        assert_eq!(mock.count(&BoardEvent::Led(Led::Green, false)), 1);
        assert_eq!(mock.display_texts().last().map(String::as_str), Some("DEAD"));
        assert_eq!(mock.events().last(), Some(&BoardEvent::ServoCleanup));
    }

    #[test]
    fn test_cleanup_without_run() {
        let mock = MockBoard::new();
        let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();

        controller.cleanup().unwrap();

        assert_eq!(
            mock.events(),
            vec![
                BoardEvent::Setup,
                BoardEvent::DisplayText("DEAD".to_string()),
                BoardEvent::DisplayColon(false),
                BoardEvent::Led(Led::Red, false),
                BoardEvent::Led(Led::Green, false),
                BoardEvent::Released,
                BoardEvent::ServoCleanup,
            ]
        );
    }

    #[test]
    fn test_drop_cleans_up() {
        let mock = MockBoard::new().with_samples([100]);
        {
            let mut controller = GripController::setup(test_config(), mock.clone()).unwrap();
            controller.step().unwrap();
        }

        assert_eq!(mock.count(&BoardEvent::ServoCleanup), 1);
        assert_eq!(mock.count(&BoardEvent::Released), 1);
    }

    #[test]
    fn test_setup_failure_propagates() {
        let mock = MockBoard::new().failing_setup();
        let result = GripController::setup(test_config(), mock.clone());

        match result {
            Err(ControllerError::Bind { component, .. }) => assert_eq!(component, "button pin"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("setup should have failed"),
        }
        assert!(mock.events().is_empty());
    }

    #[test]
    fn test_invalid_config_never_touches_board() {
        let mock = MockBoard::new();
        let config = DeviceConfig {
            red_led_pin: 17,
            ..test_config()
        };

        let result = GripController::setup(config, mock.clone());

        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
        assert!(mock.events().is_empty());
    }
}
