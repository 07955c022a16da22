//! Relay table: one cell per relay, filled while the relay is on, with the
//! relay number underneath.

use core::fmt::Write as _;

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use heapless::String;

use super::{draw_text, draw_title};
use crate::config::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use crate::screen::Screen;

const WIDTH: i32 = DISPLAY_WIDTH_PX as i32;
const HEIGHT: i32 = DISPLAY_HEIGHT_PX as i32;
/// The table takes the lower two thirds of the screen.
const CELL_HEIGHT: i32 = HEIGHT / 3;
const CELL_INSET: i32 = 3;
const GLYPH_WIDTH: i32 = 6;
const GLYPH_HEIGHT: i32 = 8;

pub struct RelayStatusPage<'a> {
    states: &'a [bool],
}

impl<'a> RelayStatusPage<'a> {
    pub fn new(states: &'a [bool]) -> Self {
        Self { states }
    }

    fn cell_width(&self) -> i32 {
        WIDTH / self.states.len().max(1) as i32
    }
}

impl Drawable for RelayStatusPage<'_> {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        draw_title(display, Screen::RelayStatus)?;

        let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        let fill = PrimitiveStyle::with_fill(BinaryColor::On);
        let cell_width = self.cell_width();
        let count = self.states.len() as i32;

        for i in 0..=count {
            let x = i * cell_width;
            Line::new(Point::new(x, CELL_HEIGHT), Point::new(x, HEIGHT))
                .into_styled(stroke)
                .draw(display)?;
        }
        for y in [CELL_HEIGHT, CELL_HEIGHT * 2, HEIGHT - 1] {
            Line::new(Point::new(0, y), Point::new(WIDTH - 2, y))
                .into_styled(stroke)
                .draw(display)?;
        }

        for (i, on) in self.states.iter().enumerate() {
            let left = i as i32 * cell_width;
            if *on {
                Rectangle::new(
                    Point::new(left + CELL_INSET, CELL_HEIGHT + CELL_INSET),
                    Size::new(
                        (cell_width - 2 * CELL_INSET + 1) as u32,
                        (CELL_HEIGHT - 2 * CELL_INSET + 1) as u32,
                    ),
                )
                .into_styled(fill)
                .draw(display)?;
            }

            let mut label: String<4> = String::new();
            let _ = write!(label, "{}", i + 1);
            let text_width = label.len() as i32 * GLYPH_WIDTH;
            let x = left + (cell_width - text_width) / 2 + 1;
            let y = CELL_HEIGHT * 2 + (CELL_HEIGHT - GLYPH_HEIGHT) / 2;
            draw_text(display, &label, Point::new(x, y), &FONT_6X10)?;
        }
        Ok(())
    }
}
