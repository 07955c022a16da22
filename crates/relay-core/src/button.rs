//! Debounced push button with short / long press classification.
//!
//! ## Delivery
//!
//! Raw level changes arrive either from a GPIO edge interrupt
//! ([`DebouncedButton::on_edge`]) or from a loop sampling the pin
//! ([`DebouncedButton::sample`]). Both paths only update the press session
//! and push classified events into a bounded queue; the coordinator drains
//! the queue from task context and does the real work.
//!
//! ## Gestures
//!
//! | Gesture     | Condition                                   | Event        |
//! |-------------|---------------------------------------------|--------------|
//! | Bounce      | Released after less than `debounce_ms`      | none         |
//! | Short press | Released in `[debounce_ms, long_press_ms)`  | `ShortPress` |
//! | Long press  | Still held at `long_press_ms` (poller)      | `LongPress`  |
//!
//! A long press fires while the button is still held, so [`poll`](DebouncedButton::poll)
//! must run periodically. Releasing after a long press emits nothing.
//!
//! The session lives in a blocking mutex, so with
//! [`CriticalSectionRawMutex`](embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex)
//! an interrupt and the polling task never observe a half-updated session.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::config::{BUTTON_EVENT_QUEUE_DEPTH, ButtonTiming};

/// Logical level of the button line, independent of pin polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLevel {
    Pressed,
    Released,
}

/// Classified button gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PressSession {
    start_ms: u64,
    /// Set once the long press has been emitted for this session.
    long_fired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ButtonState {
    level: ButtonLevel,
    session: Option<PressSession>,
}

impl ButtonState {
    const IDLE: Self = Self {
        level: ButtonLevel::Released,
        session: None,
    };

    fn apply_edge(&mut self, level: ButtonLevel, now_ms: u64, timing: &ButtonTiming) -> Option<ButtonEvent> {
        if level == self.level {
            return None;
        }
        self.level = level;

        match level {
            ButtonLevel::Pressed => {
                self.session = Some(PressSession {
                    start_ms: now_ms,
                    long_fired: false,
                });
                None
            }
            ButtonLevel::Released => {
                let session = self.session.take()?;
                if session.long_fired {
                    return None;
                }
                let held_ms = now_ms.saturating_sub(session.start_ms);
                // A hold that reached the long-press threshold belongs to the
                // poller; releasing it never turns into a short press.
                if held_ms >= timing.debounce_ms && held_ms < timing.long_press_ms {
                    Some(ButtonEvent::ShortPress)
                } else {
                    None
                }
            }
        }
    }

    fn check_long_press(&mut self, now_ms: u64, timing: &ButtonTiming) -> Option<ButtonEvent> {
        let session = self.session.as_mut()?;
        if session.long_fired || now_ms.saturating_sub(session.start_ms) < timing.long_press_ms {
            return None;
        }
        session.long_fired = true;
        Some(ButtonEvent::LongPress)
    }
}

pub struct DebouncedButton<M: RawMutex> {
    timing: ButtonTiming,
    state: Mutex<M, Cell<ButtonState>>,
    events: Channel<M, ButtonEvent, BUTTON_EVENT_QUEUE_DEPTH>,
}

impl<M: RawMutex> DebouncedButton<M> {
    pub const fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            state: Mutex::new(Cell::new(ButtonState::IDLE)),
            events: Channel::new(),
        }
    }

    pub fn timing(&self) -> ButtonTiming {
        self.timing
    }

    /// Record a level change reported by an edge interrupt.
    ///
    /// Safe to call from interrupt context: it never blocks and never waits
    /// for the consumer. Repeated reports of the current level are ignored.
    pub fn on_edge(&self, level: ButtonLevel, now_ms: u64) {
        let event = self.state.lock(|cell| {
            let mut state = cell.get();
            let event = state.apply_edge(level, now_ms, &self.timing);
            cell.set(state);
            event
        });
        if let Some(event) = event {
            self.emit(event);
        }
    }

    /// Feed a sampled pin level (polling mode) and check for a long press.
    pub fn sample(&self, level: ButtonLevel, now_ms: u64) {
        self.on_edge(level, now_ms);
        self.poll(now_ms);
    }

    /// Emit a long press once the current press has been held long enough.
    pub fn poll(&self, now_ms: u64) {
        let event = self.state.lock(|cell| {
            let mut state = cell.get();
            let event = state.check_long_press(now_ms, &self.timing);
            cell.set(state);
            event
        });
        if let Some(event) = event {
            self.emit(event);
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.state.lock(|cell| cell.get().level == ButtonLevel::Pressed)
    }

    /// Take the next classified event, if any.
    pub fn try_next_event(&self) -> Option<ButtonEvent> {
        self.events.try_receive().ok()
    }

    /// Wait for the next classified event.
    pub async fn next_event(&self) -> ButtonEvent {
        self.events.receive().await
    }

    fn emit(&self, event: ButtonEvent) {
        debug!("Button event: {:?}", event);
        if self.events.try_send(event).is_err() {
            warn!("Button event queue full, dropping {:?}", event);
        }
    }
}
