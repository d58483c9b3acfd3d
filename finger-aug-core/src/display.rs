//! HT16K33 four-digit seven-segment backpack.
//!
//! The encoding half is pure and usable anywhere; the I2C driver is only
//! built on Linux.

use crate::error::ControllerError;

/// Number of digits on the display.
pub const DIGITS: usize = 4;

/// Display RAM offset of each digit, left to right.
const DIGIT_ADDRESSES: [usize; DIGITS] = [0, 2, 6, 8];
/// Display RAM offset of the colon.
const COLON_ADDRESS: usize = 4;
const COLON_SEGMENT: u8 = 0x02;
/// Bytes of display RAM covering the four digits and the colon.
pub const RAM_LEN: usize = 10;

/// Segment pattern for a character, bit 0 = segment a through bit 6 = segment g.
pub fn segments_for(ch: char) -> Option<u8> {
    let bits = match ch {
        ' ' => 0x00,
        '-' => 0x40,
        '_' => 0x08,
        '0' | 'O' => 0x3F,
        '1' | 'I' => 0x06,
        '2' => 0x5B,
        '3' => 0x4F,
        '4' => 0x66,
        '5' | 'S' => 0x6D,
        '6' => 0x7D,
        '7' => 0x07,
        '8' => 0x7F,
        '9' => 0x6F,
        'A' => 0x77,
        'b' | 'B' => 0x7C,
        'C' => 0x39,
        'c' => 0x58,
        'd' | 'D' => 0x5E,
        'E' => 0x79,
        'F' => 0x71,
        'G' => 0x3D,
        'H' => 0x76,
        'h' => 0x74,
        'J' => 0x1E,
        'L' => 0x38,
        'N' => 0x37,
        'n' => 0x54,
        'o' => 0x5C,
        'P' => 0x73,
        'r' => 0x50,
        't' => 0x78,
        'U' => 0x3E,
        'u' => 0x1C,
        'y' => 0x6E,
        _ => return None,
    };
    Some(bits)
}

/// Encode up to [`DIGITS`] characters, left-aligned and padded with blanks.
///
/// # Errors
///
/// - [`ControllerError::TextTooLong`] if the text has more than [`DIGITS`] characters
/// - [`ControllerError::UnsupportedCharacter`] if a character has no glyph
pub fn encode_text(text: &str) -> Result<[u8; DIGITS], ControllerError> {
    if text.chars().count() > DIGITS {
        return Err(ControllerError::TextTooLong {
            text: text.to_string(),
            max: DIGITS,
        });
    }

    let mut digits = [0u8; DIGITS];
    for (slot, ch) in digits.iter_mut().zip(text.chars()) {
        *slot = segments_for(ch)
            .or_else(|| segments_for(ch.to_ascii_uppercase()))
            .or_else(|| segments_for(ch.to_ascii_lowercase()))
            .ok_or(ControllerError::UnsupportedCharacter(ch))?;
    }
    Ok(digits)
}

/// What the display currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Segment patterns, left to right.
    pub digits: [u8; DIGITS],
    /// Whether the colon is lit.
    pub colon: bool,
}

impl Frame {
    /// Display RAM contents starting at address 0.
    pub fn to_ram(&self) -> [u8; RAM_LEN] {
        let mut ram = [0u8; RAM_LEN];
        for (address, bits) in DIGIT_ADDRESSES.iter().zip(self.digits) {
            ram[*address] = bits;
        }
        if self.colon {
            ram[COLON_ADDRESS] = COLON_SEGMENT;
        }
        ram
    }
}

#[cfg(target_os = "linux")]
pub use driver::Ht16k33;

#[cfg(target_os = "linux")]
mod driver {
    use super::{Frame, RAM_LEN, encode_text};
    use crate::error::ControllerError;
    use log::{debug, trace};
    use rppal::i2c::I2c;

    const CMD_OSCILLATOR_ON: u8 = 0x21;
    const CMD_DISPLAY_ON: u8 = 0x81;
    const CMD_BRIGHTNESS: u8 = 0xE0;
    const MAX_BRIGHTNESS: u8 = 0x0F;

    /// HT16K33 display on a Linux I2C bus.
    ///
    /// The last frame stays lit after the driver is dropped.
    pub struct Ht16k33 {
        i2c: I2c,
        frame: Frame,
    }

    impl Ht16k33 {
        /// Open the display, switch it on at full brightness and blank it.
        ///
        /// # Errors
        ///
        /// [`ControllerError::I2c`] if the bus cannot be opened or the device
        /// does not acknowledge.
        pub fn new(bus: u8, address: u16) -> Result<Self, ControllerError> {
            let mut i2c = I2c::with_bus(bus)?;
            i2c.set_slave_address(address)?;
            i2c.write(&[CMD_OSCILLATOR_ON])?;
            i2c.write(&[CMD_DISPLAY_ON])?;
            i2c.write(&[CMD_BRIGHTNESS | MAX_BRIGHTNESS])?;
            debug!("HT16K33 ready on bus {} at {:#04x}", bus, address);

            let mut display = Self {
                i2c,
                frame: Frame::default(),
            };
            display.flush()?;
            Ok(display)
        }

        /// Show `text`, keeping the colon as it is.
        pub fn text(&mut self, text: &str) -> Result<(), ControllerError> {
            self.frame.digits = encode_text(text)?;
            self.flush()
        }

        /// Light or clear the colon, keeping the digits as they are.
        pub fn set_colon(&mut self, on: bool) -> Result<(), ControllerError> {
            self.frame.colon = on;
            self.flush()
        }

        fn flush(&mut self) -> Result<(), ControllerError> {
            let mut payload = [0u8; RAM_LEN + 1];
            payload[1..].copy_from_slice(&self.frame.to_ram());
            trace!("HT16K33 write {:02x?}", payload);
            self.i2c.write(&payload)?;
            Ok(())
        }
    }
}
