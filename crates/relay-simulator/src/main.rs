//! Desktop simulator for the relay-panel OLED UI.
//!
//! Renders relay-core pages in an SDL2 window via `embedded-graphics-simulator`
//! and drives the same button classifier, coordinator and HTTP handlers the
//! firmware uses, with mock relay pins standing in for the GPIOs.
//!
//! # Key bindings
//!
//! | Key   | Action                                     |
//! |-------|--------------------------------------------|
//! | Space | PRG button (hold for a long press)         |
//! | 1-7   | Toggle a relay through `GET /relay`        |
//! | S     | Log the `GET /status` response             |
//! | Q     | Quit                                       |

use std::convert::Infallible;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::Keycode,
};
use embedded_hal::digital::{ErrorType, OutputPin};
use log::{error, info};

use relay_core::button::{ButtonLevel, DebouncedButton};
use relay_core::config::{
    ButtonTiming, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, RELAY_COUNT, RENDER_PERIOD_MS,
};
use relay_core::coordinator::Coordinator;
use relay_core::dispatch::NetworkControl;
use relay_core::http::{self, Asset, AssetStore, Request};
use relay_core::pages::{self, RenderSnapshot};
use relay_core::screen::ScreenSelector;
use relay_core::state::{DeviceInfo, DeviceState, LinkState, NetworkStatus};

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// Event loop period between SDL polls.
const FRAME_DURATION: Duration = Duration::from_millis(20);

static BUTTON: DebouncedButton<CriticalSectionRawMutex> =
    DebouncedButton::new(ButtonTiming::DEFAULT);
static SCREENS: ScreenSelector<CriticalSectionRawMutex> = ScreenSelector::new();

/// Relay output that only reports its level changes.
struct SimPin {
    index: usize,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        log::debug!("GPIO relay {} low", self.index + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        log::debug!("GPIO relay {} high", self.index + 1);
        Ok(())
    }
}

/// Pretends to drop and re-join the access point.
struct SimNetwork {
    status: NetworkStatus,
}

impl SimNetwork {
    fn new() -> Self {
        let mut status = NetworkStatus::new();
        status.link = LinkState::Connected;
        let _ = status.ssid.push_str("sim-network");
        status.ipv4 = Some([192, 168, 4, 1]);
        Self { status }
    }
}

impl NetworkControl for SimNetwork {
    fn reset_network(&mut self) {
        info!("Network reset requested, reconnecting");
        self.status.link = LinkState::Connecting;
        self.status.ipv4 = None;
    }
}

struct SimAssets;

impl AssetStore for SimAssets {
    fn asset(&self, path: &str) -> Option<Asset> {
        match path {
            "/" => Some(Asset {
                content_type: "text/html",
                data: b"<html><body>relay-panel simulator</body></html>",
            }),
            _ => None,
        }
    }
}

type SimDevice = DeviceState<SimPin, RELAY_COUNT>;

/// Issue a request line against the control surface and log the response.
fn simulate_request(raw: &str, device: &mut SimDevice) {
    match Request::parse(raw) {
        Ok(request) => {
            let response = http::handle(&request, device, &SimAssets);
            info!(
                "{} -> {} {}",
                raw,
                response.status.code(),
                String::from_utf8_lossy(response.body.as_bytes())
            );
        }
        Err(e) => error!("Bad request {:?}: {}", raw, e),
    }
}

/// Map number keys to a zero-based relay index.
fn keycode_to_relay(keycode: Keycode) -> Option<usize> {
    match keycode {
        Keycode::Num1 | Keycode::Kp1 => Some(0),
        Keycode::Num2 | Keycode::Kp2 => Some(1),
        Keycode::Num3 | Keycode::Kp3 => Some(2),
        Keycode::Num4 | Keycode::Kp4 => Some(3),
        Keycode::Num5 | Keycode::Kp5 => Some(4),
        Keycode::Num6 | Keycode::Kp6 => Some(5),
        Keycode::Num7 | Keycode::Kp7 => Some(6),
        _ => None,
    }
}

fn draw(
    display: &mut SimulatorDisplay<BinaryColor>,
    device: &SimDevice,
    network: &SimNetwork,
    info: &DeviceInfo,
) {
    let relays = device.relays.states();
    let snapshot = RenderSnapshot {
        screen: SCREENS.current(),
        relays: &relays,
        network: &network.status,
        device: info,
        log: &device.log,
    };
    if let Err(e) = pages::render(display, &snapshot) {
        error!("Draw error: {:?}", e);
    }
}

fn main() {
    env_logger::init();
    info!("Starting relay-panel simulator");
    info!("Keys: Space=button  1-7=toggle relay  S=status  Q=Quit");

    let mut display =
        SimulatorDisplay::<BinaryColor>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new()
        .theme(BinaryColorTheme::OledBlue)
        .scale(WINDOW_SCALE)
        .build();
    let mut window = Window::new("Relay Panel Simulator", &output_settings);

    let pins: [SimPin; RELAY_COUNT] = core::array::from_fn(|index| SimPin { index });
    let mut device = SimDevice::new(pins);
    let mut network = SimNetwork::new();
    let mut info = DeviceInfo::new("Simulator");
    info.mac = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

    if let Err(e) = device.relays.all_off() {
        error!("Failed to clear relays: {}", e);
    }
    device.record("Boot");

    let coordinator = Coordinator::new(&BUTTON, &SCREENS);
    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;

    // The SDL window is lazily initialized on the first `update()` call.
    let _ = pages::draw_splash(&mut display, env!("CARGO_PKG_VERSION"));
    window.update(&display);

    let mut last_render = Instant::now();

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    if repeat {
                        continue;
                    }

                    if keycode == Keycode::Space {
                        BUTTON.sample(ButtonLevel::Pressed, now_ms());
                    } else if keycode == Keycode::S {
                        simulate_request("GET /status HTTP/1.1", &mut device);
                    } else if let Some(id) = keycode_to_relay(keycode) {
                        let state = match device.relays.get(id) {
                            Ok(true) => "off",
                            _ => "on",
                        };
                        let raw = format!("GET /relay?relay={}&state={} HTTP/1.1", id, state);
                        simulate_request(&raw, &mut device);
                    }
                }

                SimulatorEvent::KeyUp { keycode, .. } if keycode == Keycode::Space => {
                    BUTTON.sample(ButtonLevel::Released, now_ms());
                }

                _ => {}
            }
        }

        if last_render.elapsed() >= Duration::from_millis(RENDER_PERIOD_MS) {
            let now = now_ms();
            let outcome = coordinator.tick(now, &mut device, &mut network);
            if outcome.network_reset {
                // Reconnect immediately, there is no real radio to wait for.
                network = SimNetwork::new();
            }
            if outcome.screen_changed {
                info!("Screen: {}", coordinator.screen().title());
            }
            info.uptime_secs = now / 1000;

            // Uptime and the log change without button input, so every tick redraws.
            draw(&mut display, &device, &network, &info);
            last_render = Instant::now();
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
