//! Application-wide state for the relay panel
//!
//! [`DeviceState`] groups the relay bank with the log ring so that every
//! mutation can record itself. It is built once at start-up and shared
//! between the render task and the network task through [`SharedDeviceState`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex as AsyncMutex;
use embedded_hal::digital::OutputPin;
use heapless::String;

use crate::config::{LOG_CAPACITY, RELAY_COUNT};
use crate::error::Result;
use crate::log_ring::LogRing;
use crate::relay::RelayBank;

pub struct DeviceState<P, const N: usize = RELAY_COUNT>
where
    P: OutputPin,
{
    pub relays: RelayBank<P, N>,
    pub log: LogRing<LOG_CAPACITY>,
}

impl<P, const N: usize> DeviceState<P, N>
where
    P: OutputPin,
{
    pub fn new(pins: [P; N]) -> Self {
        Self {
            relays: RelayBank::new(pins),
            log: LogRing::new(),
        }
    }

    pub fn set_relay(&mut self, id: usize, on: bool) -> Result<()> {
        self.relays.set(id, on, &mut self.log)
    }

    pub fn batch_toggle(&mut self) -> Result<bool> {
        self.relays.batch_toggle(&mut self.log)
    }

    pub fn chase_step(&mut self, index: usize) -> Result<()> {
        self.relays.chase_step(index, &mut self.log)
    }

    /// Append a free-form line to the event log.
    pub fn record(&mut self, entry: &str) {
        self.log.append(entry);
    }
}

pub type SharedDeviceState<P, const N: usize = RELAY_COUNT> =
    AsyncMutex<CriticalSectionRawMutex, DeviceState<P, N>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Read-only snapshot of Wi-Fi connectivity supplied by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatus {
    pub link: LinkState,
    pub ssid: String<32>,
    pub ipv4: Option<[u8; 4]>,
}

impl NetworkStatus {
    pub const fn new() -> Self {
        Self {
            link: LinkState::Disconnected,
            ssid: String::new(),
            ipv4: None,
        }
    }
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only snapshot of hardware identity supplied by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub chip: &'static str,
    pub mac: [u8; 6],
    pub free_heap_bytes: usize,
    pub uptime_secs: u64,
}

impl DeviceInfo {
    pub const fn new(chip: &'static str) -> Self {
        Self {
            chip,
            mac: [0; 6],
            free_heap_bytes: 0,
            uptime_secs: 0,
        }
    }
}
