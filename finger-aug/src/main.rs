use finger_aug_core::ControllerError;

#[cfg(target_os = "linux")]
fn main() -> Result<(), ControllerError> {
    use finger_aug_core::{DeviceConfig, GripController, LinuxBoard};
    use log::info;

    init_logging();
    info!("Program Start");

    let interrupted = interrupt::install_handler();

    let board = LinuxBoard::new()?;
    let mut controller = GripController::setup(DeviceConfig::default(), board)?;

    let outcome = controller.run(&interrupted);
    let cleanup = controller.cleanup();

    info!("stopped: {:?}", outcome?);
    cleanup?;
    info!("Program Complete");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() -> Result<(), ControllerError> {
    init_logging();
    log::error!("this controller drives Linux GPIO, PWM and I2C; no board on this platform");
    Err(ControllerError::NotConfigured("board"))
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(target_os = "linux")]
mod interrupt {
    use log::warn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Ctrl-C only raises the flag; the loop notices it before its next pass.
    pub fn install_handler() -> Arc<AtomicBool> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!("no interrupt handler, Ctrl-C will skip cleanup: {}", e);
        }
        interrupted
    }
}
