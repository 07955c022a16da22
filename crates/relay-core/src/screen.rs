//! Screen selection
//!
//! The active page is a small cyclic state machine advanced by short presses.
//! It is read by the render loop and the long-press dispatcher, so the value
//! lives behind a blocking mutex and is only touched inside a critical section.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use log::debug;

/// Pages the display can show, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    RelayStatus,
    WifiStatus,
    DeviceInfo,
    Logs,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::RelayStatus,
        Screen::WifiStatus,
        Screen::DeviceInfo,
        Screen::Logs,
    ];

    /// The page after this one, wrapping back to the first.
    pub const fn next(self) -> Self {
        match self {
            Screen::RelayStatus => Screen::WifiStatus,
            Screen::WifiStatus => Screen::DeviceInfo,
            Screen::DeviceInfo => Screen::Logs,
            Screen::Logs => Screen::RelayStatus,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Screen::RelayStatus => "Relay Status:",
            Screen::WifiStatus => "WiFi Status:",
            Screen::DeviceInfo => "Device Info:",
            Screen::Logs => "Logs:",
        }
    }
}

/// Holds the active [`Screen`].
pub struct ScreenSelector<M: RawMutex> {
    current: Mutex<M, Cell<Screen>>,
}

impl<M: RawMutex> ScreenSelector<M> {
    /// Start on [`Screen::RelayStatus`].
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(Cell::new(Screen::RelayStatus)),
        }
    }

    pub fn current(&self) -> Screen {
        self.current.lock(|cell| cell.get())
    }

    /// Move to the next page and return it.
    pub fn advance(&self) -> Screen {
        let next = self.current.lock(|cell| {
            let next = cell.get().next();
            cell.set(next);
            next
        });
        debug!("Screen advanced to {:?}", next);
        next
    }
}

impl<M: RawMutex> Default for ScreenSelector<M> {
    fn default() -> Self {
        Self::new()
    }
}
