//! Display pages for the 128x64 monochrome OLED.
//!
//! Each page is an [`embedded_graphics::Drawable`] built from a borrowed
//! snapshot of the device state, so the shared state lock is only held while
//! the snapshot is copied and never while the display is being driven.

mod device_info;
mod logs;
mod relay_status;
mod wifi_status;

pub use device_info::DeviceInfoPage;
pub use logs::LogsPage;
pub use relay_status::RelayStatusPage;
pub use wifi_status::WifiStatusPage;

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::config::LOG_CAPACITY;
use crate::log_ring::LogRing;
use crate::screen::Screen;
use crate::state::{DeviceInfo, NetworkStatus};

/// Height of one [`FONT_6X10`] text row.
pub(crate) const ROW_HEIGHT_PX: i32 = 10;

/// Everything a page needs to draw itself.
pub struct RenderSnapshot<'a> {
    pub screen: Screen,
    pub relays: &'a [bool],
    pub network: &'a NetworkStatus,
    pub device: &'a DeviceInfo,
    pub log: &'a LogRing<LOG_CAPACITY>,
}

/// Clear the display and draw the active page.
pub fn render<D>(display: &mut D, snapshot: &RenderSnapshot<'_>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    display.clear(BinaryColor::Off)?;
    match snapshot.screen {
        Screen::RelayStatus => RelayStatusPage::new(snapshot.relays).draw(display),
        Screen::WifiStatus => WifiStatusPage::new(snapshot.network).draw(display),
        Screen::DeviceInfo => DeviceInfoPage::new(snapshot.device).draw(display),
        Screen::Logs => LogsPage::new(snapshot.log).draw(display),
    }
}

/// Boot splash shown while the network comes up.
pub fn draw_splash<D>(display: &mut D, version: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    display.clear(BinaryColor::Off)?;
    draw_text(display, "relay-panel", Point::new(31, 18), &FONT_6X10)?;
    draw_text(display, version, Point::new(31, 34), &FONT_5X8)?;
    Ok(())
}

pub(crate) fn draw_text<D>(
    display: &mut D,
    text: &str,
    top_left: Point,
    font: &MonoFont<'_>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font, BinaryColor::On);
    Text::with_baseline(text, top_left, style, Baseline::Top).draw(display)?;
    Ok(())
}

/// Draw the page title on the first row.
pub(crate) fn draw_title<D>(display: &mut D, screen: Screen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_text(display, screen.title(), Point::zero(), &FONT_6X10)
}

/// Draw `lines` as consecutive rows under the title.
pub(crate) fn draw_rows<D>(display: &mut D, lines: &[&str]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for (row, line) in lines.iter().enumerate() {
        let y = ROW_HEIGHT_PX * (row as i32 + 1) + 2;
        draw_text(display, line, Point::new(0, y), &FONT_6X10)?;
    }
    Ok(())
}
