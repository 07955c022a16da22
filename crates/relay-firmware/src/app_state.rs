//! Process-wide state shared between the interrupt handler and the tasks
//!
//! Re-exports the hardware-independent state types from `relay_core` and
//! pins them to the concrete ESP32 relay output type.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_hal::gpio::Output;
use relay_core::button::DebouncedButton;
use relay_core::config::{ButtonTiming, RELAY_COUNT};
use relay_core::credentials::NetworkReset;
use relay_core::screen::ScreenSelector;
use relay_core::state::{DeviceState, NetworkStatus, SharedDeviceState};
use static_cell::StaticCell;

pub use relay_core::state::{DeviceInfo, LinkState};

/// One relay output.
pub type RelayPin = Output<'static>;

pub type FirmwareDeviceState = DeviceState<RelayPin, RELAY_COUNT>;
pub type FirmwareSharedState = SharedDeviceState<RelayPin, RELAY_COUNT>;

/// Fed by the GPIO interrupt, drained by the render task.
pub static BUTTON: DebouncedButton<CriticalSectionRawMutex> =
    DebouncedButton::new(ButtonTiming::DEFAULT);

pub static SCREENS: ScreenSelector<CriticalSectionRawMutex> = ScreenSelector::new();

/// Raised by a long press on the WiFi page, served by the connection task.
pub static NETWORK_RESET: NetworkReset<CriticalSectionRawMutex> = NetworkReset::new();

/// Latest Wi-Fi snapshot, written by the connection task.
pub static NETWORK_STATUS: Mutex<CriticalSectionRawMutex, RefCell<NetworkStatus>> =
    Mutex::new(RefCell::new(NetworkStatus::new()));

static DEVICE_STATE: StaticCell<FirmwareSharedState> = StaticCell::new();

/// Build the relay bank and event log. Can only be called once.
pub fn init_device_state(pins: [RelayPin; RELAY_COUNT]) -> &'static FirmwareSharedState {
    DEVICE_STATE.init(SharedDeviceState::new(DeviceState::new(pins)))
}

pub fn network_status() -> NetworkStatus {
    NETWORK_STATUS.lock(|status| status.borrow().clone())
}

pub fn update_network_status(f: impl FnOnce(&mut NetworkStatus)) {
    NETWORK_STATUS.lock(|status| f(&mut status.borrow_mut()));
}

/// Log an unrecoverable error and restart the chip.
pub fn restart_on_fatal(error: relay_core::Error) -> ! {
    log::error!("Fatal: {}", error);
    esp_hal::system::software_reset()
}
