//! SSD1306 OLED on the Heltec board (I2C, 128x64).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use esp_hal::Blocking;
use esp_hal::i2c::master::I2c;
use log::info;
use relay_core::Error;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

/// Concrete display driver type.
pub type Display =
    Ssd1306<I2CInterface<I2c<'static, Blocking>>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Pulse the reset line and bring the panel up in buffered graphics mode.
pub fn init<RST, D>(i2c: I2c<'static, Blocking>, reset: &mut RST, delay: &mut D) -> Result<Display, Error>
where
    RST: OutputPin,
    D: DelayNs,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();

    display
        .reset(reset, delay)
        .map_err(|_| Error::DisplayInitFailure)?;
    display.init().map_err(|_| Error::DisplayInitFailure)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::DisplayInitFailure)?;

    info!("Display initialized");
    Ok(display)
}
