//! Mock board for testing.

use crate::board::{Board, Led};
use crate::config::DeviceConfig;
use crate::error::ControllerError;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One call made against a [`MockBoard`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// `setup` succeeded.
    Setup,
    /// An LED was switched.
    Led(Led, bool),
    /// The servo was positioned at this duty cycle.
    ServoDuty(f64),
    /// The servo was cleaned up.
    ServoCleanup,
    /// Text was written to the display.
    DisplayText(String),
    /// The colon was switched.
    DisplayColon(bool),
    /// The GPIO pins were released.
    Released,
}

#[derive(Debug, Default)]
struct MockState {
    samples: VecDeque<u16>,
    last_sample: u16,
    press_on_read: Option<u64>,
    button_reads: u64,
    interrupt_on_read: Option<(u64, Arc<AtomicBool>)>,
    fail_setup: bool,
    fail_display: bool,
    events: Vec<BoardEvent>,
}

/// A mock board for testing.
///
/// This allows testing the control loop without any hardware attached.
/// Clones share their state, so keep one around to inspect what the
/// controller did with the other.
///
/// # Example
///
/// ```
/// use finger_aug_core::{BoardEvent, DeviceConfig, GripController, MockBoard};
///
/// let mock = MockBoard::new().with_samples([16]);
/// let mut controller = GripController::setup(DeviceConfig::default(), mock.clone()).unwrap();
/// controller.sample_level().unwrap();
/// assert_eq!(mock.display_texts(), vec!["ON5".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBoard {
    state: Arc<Mutex<MockState>>,
}

impl MockBoard {
    /// Create a mock that reads 0 from the ADC and never sees the button.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw ADC samples. Once they run out the last one repeats.
    pub fn with_samples(self, samples: impl IntoIterator<Item = u16>) -> Self {
        self.lock().samples.extend(samples);
        self
    }

    /// Make the button read low on the `read`-th poll (0-based) and after.
    pub fn press_button_on_read(self, read: u64) -> Self {
        self.lock().press_on_read = Some(read);
        self
    }

    /// Raise `flag` on the `read`-th poll of the button (0-based), as a
    /// Ctrl-C arriving in the middle of that pass would.
    pub fn interrupt_on_read(self, read: u64, flag: Arc<AtomicBool>) -> Self {
        self.lock().interrupt_on_read = Some((read, flag));
        self
    }

    /// Make `setup` fail as if the button pin could not be bound.
    pub fn failing_setup(self) -> Self {
        self.lock().fail_setup = true;
        self
    }

    /// Make every `display_text` call fail. Failed calls are not recorded.
    pub fn failing_display(self) -> Self {
        self.lock().fail_display = true;
        self
    }

    /// Every call recorded so far.
    pub fn events(&self) -> Vec<BoardEvent> {
        self.lock().events.clone()
    }

    /// Number of recorded calls equal to `event`.
    pub fn count(&self, event: &BoardEvent) -> usize {
        self.lock().events.iter().filter(|e| *e == event).count()
    }

    /// Texts written to the display, in order.
    pub fn display_texts(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                BoardEvent::DisplayText(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Duty cycles sent to the servo, in order.
    pub fn servo_duties(&self) -> Vec<f64> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                BoardEvent::ServoDuty(duty) => Some(*duty),
                _ => None,
            })
            .collect()
    }

    /// How many times the button has been polled.
    pub fn button_reads(&self) -> u64 {
        self.lock().button_reads
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: BoardEvent) {
        self.lock().events.push(event);
    }
}

impl Board for MockBoard {
    fn setup(&mut self, _config: &DeviceConfig) -> Result<(), ControllerError> {
        if self.lock().fail_setup {
            return Err(ControllerError::bind(
                "button pin",
                io::Error::new(io::ErrorKind::ResourceBusy, "pin already in use"),
            ));
        }
        self.record(BoardEvent::Setup);
        Ok(())
    }

    fn set_led(&mut self, led: Led, on: bool) -> Result<(), ControllerError> {
        self.record(BoardEvent::Led(led, on));
        Ok(())
    }

    fn button_is_high(&mut self) -> Result<bool, ControllerError> {
        let mut state = self.lock();
        let read = state.button_reads;
        state.button_reads += 1;
        if let Some((at, flag)) = &state.interrupt_on_read {
            if read == *at {
                flag.store(true, Ordering::SeqCst);
            }
        }
        let pressed = state.press_on_read.is_some_and(|at| read >= at);
        Ok(!pressed)
    }

    fn read_analog_raw(&mut self) -> Result<u16, ControllerError> {
        let mut state = self.lock();
        if let Some(sample) = state.samples.pop_front() {
            state.last_sample = sample;
        }
        Ok(state.last_sample)
    }

    fn set_servo_duty(&mut self, duty: f64) -> Result<(), ControllerError> {
        self.record(BoardEvent::ServoDuty(duty));
        Ok(())
    }

    fn servo_cleanup(&mut self) -> Result<(), ControllerError> {
        self.record(BoardEvent::ServoCleanup);
        Ok(())
    }

    fn display_text(&mut self, text: &str) -> Result<(), ControllerError> {
        if self.lock().fail_display {
            return Err(ControllerError::NotConfigured("display"));
        }
        self.record(BoardEvent::DisplayText(text.to_string()));
        Ok(())
    }

    fn display_colon(&mut self, on: bool) -> Result<(), ControllerError> {
        self.record(BoardEvent::DisplayColon(on));
        Ok(())
    }

    fn release(&mut self) -> Result<(), ControllerError> {
        self.record(BoardEvent::Released);
        Ok(())
    }
}
