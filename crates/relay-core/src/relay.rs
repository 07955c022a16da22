//! Relay bank controller
//!
//! The bank owns one [`OutputPin`] per relay together with the state last
//! written to it. Every mutation drives the pin first and only records the new
//! state once the write succeeded, so `states()` always mirrors the hardware.

use core::fmt::Write as _;

use embedded_hal::digital::{OutputPin, PinState};
use heapless::String;
use log::{debug, info};

use crate::config::{BATCH_TOGGLE_THRESHOLD, LOG_ENTRY_LEN};
use crate::error::{Error, Result};
use crate::log_ring::LogRing;

pub struct RelayBank<P, const N: usize>
where
    P: OutputPin,
{
    pins: [P; N],
    states: [bool; N],
}

impl<P, const N: usize> RelayBank<P, N>
where
    P: OutputPin,
{
    /// Wrap the relay pins. The recorded state starts all-off; call
    /// [`all_off`](Self::all_off) to bring the hardware in line.
    pub fn new(pins: [P; N]) -> Self {
        Self {
            pins,
            states: [false; N],
        }
    }

    /// Switch a single relay and log the change.
    pub fn set<const L: usize>(&mut self, id: usize, on: bool, log: &mut LogRing<L>) -> Result<()> {
        self.write(id, on)?;

        let mut entry: String<LOG_ENTRY_LEN> = String::new();
        let _ = write!(entry, "Relay {}: {}", id + 1, if on { "on" } else { "off" });
        log.append(&entry);
        debug!("{}", entry.as_str());
        Ok(())
    }

    pub fn get(&self, id: usize) -> Result<bool> {
        self.states
            .get(id)
            .copied()
            .ok_or(Error::OutOfRangeRelay(id))
    }

    /// Snapshot of every relay state, indexed by relay id.
    pub fn states(&self) -> [bool; N] {
        self.states
    }

    pub fn count_on(&self) -> usize {
        self.states.iter().filter(|on| **on).count()
    }

    /// Switch every relay to the same state.
    ///
    /// With fewer than [`BATCH_TOGGLE_THRESHOLD`] relays on everything is
    /// turned on, otherwise everything is turned off. Returns the new state.
    pub fn batch_toggle<const L: usize>(&mut self, log: &mut LogRing<L>) -> Result<bool> {
        let target = self.count_on() < BATCH_TOGGLE_THRESHOLD;
        self.write_all(target)?;

        let mut entry: String<LOG_ENTRY_LEN> = String::new();
        let _ = write!(entry, "Relays Toggled to: {}", target);
        log.append(&entry);
        info!("{}", entry.as_str());
        Ok(target)
    }

    /// Drive every output low without logging. Used once at boot.
    pub fn all_off(&mut self) -> Result<()> {
        self.write_all(false)
    }

    /// One step of the boot chase sequence: the relay before `index`
    /// (wrapping from the first relay to the last) is switched off and
    /// `index` is switched on.
    pub fn chase_step<const L: usize>(&mut self, index: usize, log: &mut LogRing<L>) -> Result<()> {
        if index >= N {
            return Err(Error::OutOfRangeRelay(index));
        }
        let previous = (index + N - 1) % N;
        if previous != index {
            self.set(previous, false, log)?;
        }
        self.set(index, true, log)
    }

    fn write_all(&mut self, on: bool) -> Result<()> {
        for id in 0..N {
            self.write(id, on)?;
        }
        Ok(())
    }

    fn write(&mut self, id: usize, on: bool) -> Result<()> {
        let pin = self.pins.get_mut(id).ok_or(Error::OutOfRangeRelay(id))?;
        pin.set_state(PinState::from(on))
            .map_err(|_| Error::RelayOutput(id))?;
        self.states[id] = on;
        Ok(())
    }
}
