//! Long-press actions keyed by the active screen.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::error::Result;
use crate::screen::Screen;
use crate::state::DeviceState;

/// Platform hook for the Wi-Fi reset action.
pub trait NetworkControl {
    /// Drop the Wi-Fi association and ask the platform to restart.
    ///
    /// On hardware this does not return to normal operation; the device
    /// reboots once the request has been handled.
    fn reset_network(&mut self);
}

/// What a long press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongPressOutcome {
    /// Every relay was switched to the contained state.
    RelaysToggled(bool),
    /// The network reset was requested.
    NetworkReset,
    /// The active screen has no long-press action.
    Ignored,
}

/// Run the long-press action for `screen`.
///
/// Defined for every screen; pages without an action return
/// [`LongPressOutcome::Ignored`].
pub fn dispatch_long_press<P, const N: usize, C>(
    screen: Screen,
    device: &mut DeviceState<P, N>,
    network: &mut C,
) -> Result<LongPressOutcome>
where
    P: OutputPin,
    C: NetworkControl + ?Sized,
{
    match screen {
        Screen::RelayStatus => {
            let state = device.batch_toggle()?;
            Ok(LongPressOutcome::RelaysToggled(state))
        }
        Screen::WifiStatus => {
            info!("Long press on WiFi screen, resetting network");
            device.record("WiFi reset requested");
            network.reset_network();
            Ok(LongPressOutcome::NetworkReset)
        }
        Screen::DeviceInfo | Screen::Logs => Ok(LongPressOutcome::Ignored),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::relay::tests::MockPin;

    #[derive(Default)]
    pub(crate) struct MockNetwork {
        pub(crate) resets: usize,
    }

    impl NetworkControl for MockNetwork {
        fn reset_network(&mut self) {
            self.resets += 1;
        }
    }

    fn device() -> DeviceState<MockPin, 7> {
        DeviceState::new(Default::default())
    }

    #[test]
    fn test_relay_screen_toggles_bank() {
        let mut device = device();
        let mut network = MockNetwork::default();
        device.set_relay(0, true).unwrap();
        device.set_relay(4, true).unwrap();

        let outcome = dispatch_long_press(Screen::RelayStatus, &mut device, &mut network).unwrap();

        assert_eq!(outcome, LongPressOutcome::RelaysToggled(true));
        assert_eq!(device.relays.states(), [true; 7]);
        assert_eq!(network.resets, 0);
    }

    #[test]
    fn test_wifi_screen_resets_network() {
        let mut device = device();
        let mut network = MockNetwork::default();

        let outcome = dispatch_long_press(Screen::WifiStatus, &mut device, &mut network).unwrap();

        assert_eq!(outcome, LongPressOutcome::NetworkReset);
        assert_eq!(network.resets, 1);
        assert_eq!(device.relays.count_on(), 0);
    }

    #[test]
    fn test_other_screens_are_noops() {
        for screen in [Screen::DeviceInfo, Screen::Logs] {
            let mut device = device();
            let mut network = MockNetwork::default();
            device.set_relay(3, true).unwrap();

            let outcome = dispatch_long_press(screen, &mut device, &mut network).unwrap();

            assert_eq!(outcome, LongPressOutcome::Ignored);
            assert_eq!(network.resets, 0);
            assert_eq!(device.relays.count_on(), 1);
        }
    }
}
