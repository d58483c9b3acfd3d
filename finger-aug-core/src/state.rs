//! Controller run state.

/// Mutable state of a running controller.
///
/// Use [`GripController::state`](crate::GripController::state) to obtain a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    /// Quantized sample behind the text currently on the display. `None`
    /// until the first sample, so that sample always refreshes it.
    pub last_displayed: Option<u32>,
    /// `true` until a button press is observed. There is no way back.
    pub running: bool,
}

impl RunState {
    /// Fresh state: nothing displayed yet, running.
    pub fn new() -> Self {
        Self {
            last_displayed: None,
            running: true,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
