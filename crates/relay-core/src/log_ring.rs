//! Fixed-capacity ring of recent events shown on the Logs screen.

use heapless::String;

use crate::config::{LOG_CAPACITY, LOG_ENTRY_LEN};

/// One line of the event log.
pub type LogEntry = String<LOG_ENTRY_LEN>;

/// Circular buffer of the last `L` log entries.
///
/// Slots that were never written hold an empty entry; readers see them as
/// blank lines until the ring has filled once.
#[derive(Debug, Clone)]
pub struct LogRing<const L: usize = LOG_CAPACITY> {
    entries: [LogEntry; L],
    /// Slot the next entry is written to.
    write_index: usize,
}

impl<const L: usize> LogRing<L> {
    pub const fn new() -> Self {
        Self {
            entries: [const { String::new() }; L],
            write_index: 0,
        }
    }

    /// Append an entry, overwriting the oldest one once the ring is full.
    ///
    /// Entries longer than [`LOG_ENTRY_LEN`] are cut at the last character
    /// boundary that fits.
    pub fn append(&mut self, entry: &str) {
        let slot = &mut self.entries[self.write_index];
        slot.clear();
        for ch in entry.chars() {
            if slot.push(ch).is_err() {
                break;
            }
        }
        self.write_index = (self.write_index + 1) % L;
    }

    /// The last `k` slots, oldest first.
    ///
    /// `k` is clamped to the ring capacity. Slots never written since start
    /// are yielded as empty strings.
    pub fn recent_in_order(&self, k: usize) -> impl Iterator<Item = &str> + '_ {
        let k = k.min(L);
        let start = (self.write_index + L - k) % L;
        (0..k).map(move |offset| self.entries[(start + offset) % L].as_str())
    }

    /// Most recently appended entry.
    pub fn latest(&self) -> &str {
        self.entries[(self.write_index + L - 1) % L].as_str()
    }

    pub const fn capacity(&self) -> usize {
        L
    }
}

impl<const L: usize> Default for LogRing<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::format;
    use std::vec::Vec;

    #[test]
    fn test_overwrites_oldest_when_full() {
        let mut ring: LogRing<8> = LogRing::new();
        for i in 0..11 {
            ring.append(&format!("event {i}"));
        }

        let entries: Vec<&str> = ring.recent_in_order(8).collect();
        let expected: Vec<std::string::String> = (3..11).map(|i| format!("event {i}")).collect();
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_recent_includes_blank_slots_at_startup() {
        let mut ring: LogRing<8> = LogRing::new();
        ring.append("first");
        ring.append("second");

        let entries: Vec<&str> = ring.recent_in_order(6).collect();
        assert_eq!(entries, ["", "", "", "", "first", "second"]);
    }

    #[test]
    fn test_recent_is_clamped_to_capacity() {
        let mut ring: LogRing<4> = LogRing::new();
        ring.append("a");
        assert_eq!(ring.recent_in_order(10).count(), 4);
    }

    #[test]
    fn test_long_entries_are_truncated() {
        let mut ring: LogRing<2> = LogRing::new();
        ring.append("Relays Toggled to: false, then something longer");
        assert_eq!(ring.latest().len(), LOG_ENTRY_LEN);
        assert_eq!(ring.latest(), "Relays Toggled to: false, then s");
    }
}
