//! Hardware identity and uptime.

use core::fmt::Write as _;

use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::String;

use super::{draw_rows, draw_title};
use crate::screen::Screen;
use crate::state::DeviceInfo;

/// Longest formatted row: `u64::MAX` seconds of uptime needs 27 bytes.
const ROW_LEN: usize = 32;

pub struct DeviceInfoPage<'a> {
    info: &'a DeviceInfo,
}

impl<'a> DeviceInfoPage<'a> {
    pub fn new(info: &'a DeviceInfo) -> Self {
        Self { info }
    }
}

impl Drawable for DeviceInfoPage<'_> {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        draw_title(display, Screen::DeviceInfo)?;

        let mut chip: String<ROW_LEN> = String::new();
        let _ = write!(chip, "Chip: {}", self.info.chip);

        let m = self.info.mac;
        let mut mac: String<24> = String::new();
        let _ = write!(
            mac,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        );

        let mut heap: String<ROW_LEN> = String::new();
        let _ = write!(heap, "Heap: {} B", self.info.free_heap_bytes);

        let uptime = format_uptime(self.info.uptime_secs);

        draw_rows(
            display,
            &[chip.as_str(), mac.as_str(), heap.as_str(), uptime.as_str()],
        )
    }
}

/// `Up: <h>h<mm>m<ss>s`
fn format_uptime(secs: u64) -> String<ROW_LEN> {
    let mut uptime = String::new();
    let _ = write!(
        uptime,
        "Up: {}h{:02}m{:02}s",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    );
    uptime
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_display::TestDisplay;

    #[test]
    fn test_draws_below_title() {
        let mut info = DeviceInfo::new("ESP32-S3");
        info.mac = [0x34, 0x85, 0x18, 0x0A, 0xBC, 0xDE];
        info.free_heap_bytes = 48_512;
        info.uptime_secs = 3_723;

        let mut display = TestDisplay::new();
        DeviceInfoPage::new(&info).draw(&mut display).unwrap();
        assert!(display.lit_pixels_in_rows(0..10) > 0);
        assert!(display.lit_pixels_in_rows(12..52) > 0);
    }

    #[test]
    fn test_uptime_format() {
        assert_eq!(format_uptime(0).as_str(), "Up: 0h00m00s");
        assert_eq!(format_uptime(3_723).as_str(), "Up: 1h02m03s");
        assert_eq!(
            format_uptime(u64::MAX).as_str(),
            "Up: 5124095576030431h00m15s"
        );
    }

    #[test]
    fn test_extreme_values_still_draw() {
        let mut info = DeviceInfo::new("ESP32-S3");
        info.free_heap_bytes = usize::MAX;
        info.uptime_secs = u64::MAX;

        let mut display = TestDisplay::new();
        DeviceInfoPage::new(&info).draw(&mut display).unwrap();
        // Heap and uptime rows.
        assert!(display.lit_pixels_in_rows(32..52) > 0);
    }
}
