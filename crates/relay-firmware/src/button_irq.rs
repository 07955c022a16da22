//! Edge interrupt for the PRG push button
//!
//! The handler only reads the pin level and timestamps it; classification is
//! done by [`DebouncedButton`](relay_core::button::DebouncedButton) and the
//! resulting events are consumed by the render task.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use esp_hal::gpio::{Event, Input, Io};
use esp_hal::{handler, ram};
use relay_core::button::ButtonLevel;

use crate::app_state::BUTTON;

static BUTTON_INPUT: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));

/// Take ownership of the (active-low) button pin and start listening on both edges.
pub fn install(io: &mut Io<'_>, mut input: Input<'static>) {
    io.set_interrupt_handler(button_handler);
    critical_section::with(|cs| {
        input.listen(Event::AnyEdge);
        BUTTON_INPUT.borrow_ref_mut(cs).replace(input);
    });
}

#[handler]
#[ram]
fn button_handler() {
    let now_ms = Instant::now().as_millis();
    critical_section::with(|cs| {
        let mut input = BUTTON_INPUT.borrow_ref_mut(cs);
        let Some(input) = input.as_mut() else {
            return;
        };
        if input.is_interrupt_set() {
            let level = if input.is_low() {
                ButtonLevel::Pressed
            } else {
                ButtonLevel::Released
            };
            BUTTON.on_edge(level, now_ms);
            input.clear_interrupt();
        }
    });
}
