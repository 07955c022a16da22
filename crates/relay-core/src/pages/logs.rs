//! The most recent log lines, oldest at the top.

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::{ROW_HEIGHT_PX, draw_text, draw_title};
use crate::config::{LOG_CAPACITY, LOG_VISIBLE_LINES};
use crate::log_ring::LogRing;
use crate::screen::Screen;

const LINE_HEIGHT_PX: i32 = 9;

pub struct LogsPage<'a> {
    log: &'a LogRing<LOG_CAPACITY>,
}

impl<'a> LogsPage<'a> {
    pub fn new(log: &'a LogRing<LOG_CAPACITY>) -> Self {
        Self { log }
    }
}

impl Drawable for LogsPage<'_> {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        draw_title(display, Screen::Logs)?;
        for (row, line) in self.log.recent_in_order(LOG_VISIBLE_LINES).enumerate() {
            let y = ROW_HEIGHT_PX + row as i32 * LINE_HEIGHT_PX;
            draw_text(display, line, Point::new(0, y), &FONT_5X8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_display::TestDisplay;

    #[test]
    fn test_startup_slots_are_blank() {
        let mut log = LogRing::new();
        log.append("Relay 1: on");

        let mut display = TestDisplay::new();
        LogsPage::new(&log).draw(&mut display).unwrap();

        // Only the bottom line holds text; the five above it are unused slots.
        let last_line = ROW_HEIGHT_PX as usize + 5 * LINE_HEIGHT_PX as usize;
        assert_eq!(display.lit_pixels_in_rows(ROW_HEIGHT_PX as usize..last_line), 0);
        assert!(display.lit_pixels_in_rows(last_line..last_line + 8) > 0);
    }
}
