//! Render / poll loop
//!
//! Every tick: apply pending button events (screen changes and long-press
//! actions), copy what the pages need out of the shared state, then redraw
//! the active page and push the frame to the panel.

use embassy_time::{Duration, Instant, Ticker};
use log::warn;
use relay_core::config::RENDER_PERIOD_MS;
use relay_core::coordinator::Coordinator;
use relay_core::pages::{self, RenderSnapshot};

use crate::app_state::{
    BUTTON, DeviceInfo, FirmwareSharedState, NETWORK_RESET, SCREENS, network_status,
};
use crate::display::Display;

pub const CHIP_NAME: &str = "ESP32-S3";

#[embassy_executor::task]
pub async fn render_task(mut display: Display, device: &'static FirmwareSharedState, mac: [u8; 6]) {
    let coordinator = Coordinator::new(&BUTTON, &SCREENS);
    let mut network = &NETWORK_RESET;
    let mut ticker = Ticker::every(Duration::from_millis(RENDER_PERIOD_MS));

    loop {
        let now_ms = Instant::now().as_millis();

        let (relays, log) = {
            let mut state = device.lock().await;
            let outcome = coordinator.tick(now_ms, &mut *state, &mut network);
            if outcome.network_reset {
                state.record("Restarting...");
            }
            (state.relays.states(), state.log.clone())
        };

        let network_status = network_status();
        let info = DeviceInfo {
            chip: CHIP_NAME,
            mac,
            free_heap_bytes: esp_alloc::HEAP.free(),
            uptime_secs: now_ms / 1000,
        };
        let snapshot = RenderSnapshot {
            screen: coordinator.screen(),
            relays: &relays,
            network: &network_status,
            device: &info,
            log: &log,
        };

        if let Err(e) = pages::render(&mut display, &snapshot) {
            warn!("Render failed: {:?}", e);
        }
        if let Err(e) = display.flush() {
            warn!("Display flush failed: {:?}", e);
        }

        ticker.next().await;
    }
}
