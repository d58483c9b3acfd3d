//! Example: Print the grip level the potentiometer is set to.
//!
//! Run with: `RUST_LOG=info cargo run --example read_grip -- [samples]`
//!
//! Only reads the ADC, so the servo stays where it is.

use finger_aug_core::grip::{duty_from_quantized, level_from_quantized, quantize};
use finger_aug_core::{ControllerError, DeviceConfig, IioAdc};
use log::info;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), ControllerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let samples = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(20);

    let config = DeviceConfig::default();
    let adc = IioAdc::for_channel(config.adc_device, config.adc_channel);
    info!("reading {} samples from {}", samples, adc.path().display());

    for _ in 0..samples {
        let raw = adc.read_raw()?;
        let quantized = quantize(raw);
        info!(
            "raw={:4} quantized={:3} level={} duty={:.2}%",
            raw,
            quantized,
            level_from_quantized(quantized),
            duty_from_quantized(quantized)
        );
        thread::sleep(Duration::from_millis(250));
    }

    Ok(())
}
