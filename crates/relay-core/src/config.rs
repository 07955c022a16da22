//! Compile-time configuration for the relay panel.
//!
//! Pin numbers live in the firmware crate; everything here is board
//! independent and shared with the simulator.

/// Number of relay outputs on the board.
pub const RELAY_COUNT: usize = 7;

/// `batch_toggle` switches everything on when fewer than this many relays are on.
pub const BATCH_TOGGLE_THRESHOLD: usize = 3;

/// Minimum press duration accepted as a real press.
pub const DEBOUNCE_MS: u64 = 50;

/// Hold duration that turns a press into a long press.
pub const LONG_PRESS_MS: u64 = 2000;

/// Depth of the button event queue between the edge source and the coordinator.
pub const BUTTON_EVENT_QUEUE_DEPTH: usize = 4;

/// Number of entries kept in the log ring.
pub const LOG_CAPACITY: usize = 8;

/// Number of log lines shown on the Logs screen.
pub const LOG_VISIBLE_LINES: usize = 6;

/// Maximum length of a single log entry. Longer lines are clipped by the display.
pub const LOG_ENTRY_LEN: usize = 32;

/// Period of the render / long-press poll loop.
pub const RENDER_PERIOD_MS: u64 = 200;

/// Idle period of the network service loop.
pub const NET_POLL_MS: u64 = 10;

/// TCP port of the control surface.
pub const HTTP_PORT: u16 = 80;

pub const DISPLAY_WIDTH_PX: u32 = 128;
pub const DISPLAY_HEIGHT_PX: u32 = 64;

/// Thresholds used by [`DebouncedButton`](crate::button::DebouncedButton).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTiming {
    pub debounce_ms: u64,
    pub long_press_ms: u64,
}

impl ButtonTiming {
    pub const DEFAULT: Self = Self {
        debounce_ms: DEBOUNCE_MS,
        long_press_ms: LONG_PRESS_MS,
    };
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}
