//! Wires button events to screen selection and long-press actions.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use log::error;

use crate::button::{ButtonEvent, DebouncedButton};
use crate::dispatch::{LongPressOutcome, NetworkControl, dispatch_long_press};
use crate::screen::{Screen, ScreenSelector};
use crate::state::DeviceState;

/// What changed during one [`Coordinator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub screen_changed: bool,
    pub relays_changed: bool,
    pub network_reset: bool,
}

impl TickOutcome {
    pub fn needs_redraw(&self) -> bool {
        self.screen_changed || self.relays_changed
    }
}

/// Borrowing glue between the button, the screen selector and the device state.
pub struct Coordinator<'a, M: RawMutex> {
    button: &'a DebouncedButton<M>,
    screens: &'a ScreenSelector<M>,
}

impl<'a, M: RawMutex> Coordinator<'a, M> {
    pub const fn new(button: &'a DebouncedButton<M>, screens: &'a ScreenSelector<M>) -> Self {
        Self { button, screens }
    }

    pub fn screen(&self) -> Screen {
        self.screens.current()
    }

    /// Check for a long press and apply every queued button event.
    ///
    /// Runs at the start of each render tick so that a screen change is
    /// visible in the frame drawn right after it.
    pub fn tick<P, const N: usize, C>(
        &self,
        now_ms: u64,
        device: &mut DeviceState<P, N>,
        network: &mut C,
    ) -> TickOutcome
    where
        P: OutputPin,
        C: NetworkControl + ?Sized,
    {
        self.button.poll(now_ms);

        let mut outcome = TickOutcome::default();
        while let Some(event) = self.button.try_next_event() {
            self.handle_event(event, device, network, &mut outcome);
        }
        outcome
    }

    /// Apply a single event, for callers that await events instead of polling.
    pub fn handle_event<P, const N: usize, C>(
        &self,
        event: ButtonEvent,
        device: &mut DeviceState<P, N>,
        network: &mut C,
        outcome: &mut TickOutcome,
    ) where
        P: OutputPin,
        C: NetworkControl + ?Sized,
    {
        match event {
            ButtonEvent::ShortPress => {
                self.screens.advance();
                outcome.screen_changed = true;
            }
            ButtonEvent::LongPress => {
                match dispatch_long_press(self.screens.current(), device, network) {
                    Ok(LongPressOutcome::RelaysToggled(_)) => outcome.relays_changed = true,
                    Ok(LongPressOutcome::NetworkReset) => outcome.network_reset = true,
                    Ok(LongPressOutcome::Ignored) => {}
                    Err(e) => {
                        error!("Long press action failed: {:?}", e);
                        // A failed batch may have switched some relays already.
                        outcome.relays_changed = true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::ButtonLevel;
    use crate::config::ButtonTiming;
    use crate::dispatch::tests::MockNetwork;
    use crate::relay::tests::MockPin;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    struct Rig {
        button: DebouncedButton<CriticalSectionRawMutex>,
        screens: ScreenSelector<CriticalSectionRawMutex>,
        device: DeviceState<MockPin, 7>,
        network: MockNetwork,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                button: DebouncedButton::new(ButtonTiming::DEFAULT),
                screens: ScreenSelector::new(),
                device: DeviceState::new(Default::default()),
                network: MockNetwork::default(),
            }
        }

        fn tick(&mut self, now_ms: u64) -> TickOutcome {
            let coordinator = Coordinator::new(&self.button, &self.screens);
            coordinator.tick(now_ms, &mut self.device, &mut self.network)
        }
    }

    #[test]
    fn test_short_press_advances_before_render() {
        let mut rig = Rig::new();
        rig.button.on_edge(ButtonLevel::Pressed, 0);
        rig.button.on_edge(ButtonLevel::Released, 120);

        let outcome = rig.tick(200);

        assert!(outcome.screen_changed);
        assert!(outcome.needs_redraw());
        assert_eq!(rig.screens.current(), Screen::WifiStatus);
    }

    #[test]
    fn test_long_press_on_relay_screen_turns_all_on() {
        let mut rig = Rig::new();
        rig.device.set_relay(1, true).unwrap();
        rig.device.set_relay(5, true).unwrap();

        rig.button.on_edge(ButtonLevel::Pressed, 1_000);
        for t in (1_200..=3_000).step_by(200) {
            rig.tick(t);
        }

        assert_eq!(rig.device.relays.states(), [true; 7]);
        assert_eq!(rig.screens.current(), Screen::RelayStatus);

        rig.button.on_edge(ButtonLevel::Released, 3_100);
        let outcome = rig.tick(3_200);
        assert_eq!(outcome, TickOutcome::default());
    }

    #[test]
    fn test_long_press_on_wifi_screen_requests_reset() {
        let mut rig = Rig::new();
        rig.screens.advance();

        rig.button.on_edge(ButtonLevel::Pressed, 0);
        let outcome = rig.tick(2_000);

        assert!(outcome.network_reset);
        assert_eq!(rig.network.resets, 1);
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut rig = Rig::new();
        assert!(!rig.tick(200).needs_redraw());
    }
}
