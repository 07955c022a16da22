//! End-to-end scenarios across the button, coordinator and control surface.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::{ErrorType, OutputPin};

use relay_core::button::{ButtonLevel, DebouncedButton};
use relay_core::config::ButtonTiming;
use relay_core::coordinator::Coordinator;
use relay_core::credentials::{
    self, CredentialRecord, CredentialStore, NetworkReset, WifiCredentials,
};
use relay_core::dispatch::NetworkControl;
use relay_core::http::{self, Asset, AssetStore, Request, StatusCode};
use relay_core::screen::{Screen, ScreenSelector};
use relay_core::state::{DeviceState, SharedDeviceState};

#[derive(Clone, Default)]
struct Pin {
    level: Rc<Cell<bool>>,
}

impl ErrorType for Pin {
    type Error = Infallible;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

#[derive(Default)]
struct Network {
    resets: usize,
}

impl NetworkControl for Network {
    fn reset_network(&mut self) {
        self.resets += 1;
    }
}

/// Keeps the last saved record, as the flash store does.
#[derive(Default)]
struct RecordStore {
    record: Option<CredentialRecord>,
}

impl CredentialStore for RecordStore {
    async fn load(&mut self) -> relay_core::error::Result<Option<CredentialRecord>> {
        Ok(self.record.clone())
    }

    async fn save(&mut self, record: &CredentialRecord) -> relay_core::error::Result<()> {
        self.record = Some(record.clone());
        Ok(())
    }
}

struct NoAssets;

impl AssetStore for NoAssets {
    fn asset(&self, _path: &str) -> Option<Asset> {
        None
    }
}

fn request(raw: &str, device: &mut DeviceState<Pin>) -> http::Response {
    let request = Request::parse(raw).unwrap();
    http::handle(&request, device, &NoAssets)
}

fn status_body(device: &mut DeviceState<Pin>) -> String {
    let response = request("GET /status HTTP/1.1", device);
    String::from_utf8(response.body.as_bytes().to_vec()).unwrap()
}

#[test]
fn control_endpoint_only_changes_the_requested_relay() {
    let pins: [Pin; 7] = Default::default();
    let shared: SharedDeviceState<Pin> = SharedDeviceState::new(DeviceState::new(pins.clone()));

    block_on(async {
        let mut device = shared.lock().await;
        device.set_relay(5, true).unwrap();

        let response = request("GET /relay?relay=2&state=on HTTP/1.1", &mut device);
        assert_eq!(response.status, StatusCode::Ok);

        let body = status_body(&mut device);
        assert_eq!(
            body,
            r#"{"relay0":false,"relay1":false,"relay2":true,"relay3":false,"relay4":false,"relay5":true,"relay6":false}"#
        );
    });

    let levels: Vec<bool> = pins.iter().map(|p| p.level.get()).collect();
    assert_eq!(levels, [false, false, true, false, false, true, false]);
}

#[test]
fn long_press_on_relay_screen_turns_every_relay_on() {
    static BUTTON: DebouncedButton<CriticalSectionRawMutex> =
        DebouncedButton::new(ButtonTiming::DEFAULT);
    static SCREENS: ScreenSelector<CriticalSectionRawMutex> = ScreenSelector::new();

    let pins: [Pin; 7] = Default::default();
    let mut device = DeviceState::new(pins.clone());
    let mut network = Network::default();
    device.set_relay(0, true).unwrap();
    device.set_relay(3, true).unwrap();

    let coordinator = Coordinator::new(&BUTTON, &SCREENS);
    assert_eq!(coordinator.screen(), Screen::RelayStatus);

    BUTTON.on_edge(ButtonLevel::Pressed, 10_000);
    for t in (10_200..=12_200).step_by(200) {
        coordinator.tick(t, &mut device, &mut network);
    }
    BUTTON.on_edge(ButtonLevel::Released, 12_300);
    let outcome = coordinator.tick(12_400, &mut device, &mut network);

    assert!(!outcome.screen_changed);
    assert!(pins.iter().all(|p| p.level.get()));
    assert_eq!(device.log.latest(), "Relays Toggled to: true");
    assert_eq!(coordinator.screen(), Screen::RelayStatus);
    assert_eq!(network.resets, 0);
}

#[test]
fn short_presses_cycle_through_every_screen() {
    static BUTTON: DebouncedButton<CriticalSectionRawMutex> =
        DebouncedButton::new(ButtonTiming::DEFAULT);
    static SCREENS: ScreenSelector<CriticalSectionRawMutex> = ScreenSelector::new();

    let mut device = DeviceState::new(<[Pin; 7]>::default());
    let mut network = Network::default();
    let coordinator = Coordinator::new(&BUTTON, &SCREENS);

    let mut seen = Vec::new();
    for press in 0..4u64 {
        let start = press * 1_000;
        BUTTON.on_edge(ButtonLevel::Pressed, start);
        BUTTON.on_edge(ButtonLevel::Released, start + 150);
        let outcome = coordinator.tick(start + 200, &mut device, &mut network);
        assert!(outcome.screen_changed);
        seen.push(coordinator.screen());
    }

    assert_eq!(
        seen,
        [
            Screen::WifiStatus,
            Screen::DeviceInfo,
            Screen::Logs,
            Screen::RelayStatus
        ]
    );
}

#[test]
fn long_press_on_wifi_screen_forgets_stored_credentials() {
    static BUTTON: DebouncedButton<CriticalSectionRawMutex> =
        DebouncedButton::new(ButtonTiming::DEFAULT);
    static SCREENS: ScreenSelector<CriticalSectionRawMutex> = ScreenSelector::new();
    static RESET: NetworkReset<CriticalSectionRawMutex> = NetworkReset::new();

    let defaults = WifiCredentials::new("workshop", "hunter22").unwrap();
    let mut store = RecordStore::default();
    let joined = block_on(credentials::provision(&mut store, Some(defaults.clone()))).unwrap();
    assert_eq!(joined, Some(defaults.clone()));

    let mut device = DeviceState::new(<[Pin; 7]>::default());
    let mut network = &RESET;
    let coordinator = Coordinator::new(&BUTTON, &SCREENS);

    // Short press to the WiFi screen, then hold.
    BUTTON.on_edge(ButtonLevel::Pressed, 0);
    BUTTON.on_edge(ButtonLevel::Released, 100);
    coordinator.tick(200, &mut device, &mut network);
    assert_eq!(coordinator.screen(), Screen::WifiStatus);

    BUTTON.on_edge(ButtonLevel::Pressed, 1_000);
    let outcome = coordinator.tick(3_000, &mut device, &mut network);
    BUTTON.on_edge(ButtonLevel::Released, 3_100);
    assert!(outcome.network_reset);
    assert!(RESET.is_requested());
    assert_eq!(device.relays.count_on(), 0);

    block_on(RESET.serve(&mut store)).unwrap();
    assert_eq!(store.record, Some(CredentialRecord::Cleared));

    // The next boot stays offline instead of re-seeding.
    let joined = block_on(credentials::provision(&mut store, Some(defaults))).unwrap();
    assert_eq!(joined, None);
}
