//! Wi-Fi station management
//!
//! The connection task keeps the station associated, mirrors the link state
//! into [`NETWORK_STATUS`](crate::app_state::NETWORK_STATUS) for the WiFi page
//! and performs the network reset requested by a long press: the stored
//! credentials are cleared and the chip restarts offline.

use embassy_futures::select::{Either, select};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};
use log::{info, warn};
use relay_core::credentials::{self, WifiCredentials};

use crate::app_state::{LinkState, NETWORK_RESET, update_network_status};
use crate::storage::FlashCredentialStore;
use crate::wifi_secrets;

/// Delay before retrying after a failed or lost connection.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    stack: Stack<'static>,
    mut store: FlashCredentialStore,
) {
    let credentials = match credentials::provision(&mut store, wifi_secrets::defaults()).await {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("Credential storage unavailable ({}), using build-time defaults", e);
            wifi_secrets::defaults()
        }
    };

    let Some(WifiCredentials { ssid, password }) = credentials else {
        warn!("No WiFi credentials stored, staying offline");
        NETWORK_RESET.requested().await;
        reset(&mut controller, &mut store).await
    };

    update_network_status(|status| {
        status.ssid.clear();
        let _ = status.ssid.push_str(&ssid);
    });

    loop {
        update_network_status(|status| {
            status.link = LinkState::Connecting;
            status.ipv4 = None;
        });

        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(ssid.as_str().into())
                    .with_password(password.as_str().into()),
            );
            if let Err(e) = controller.set_config(&client_config) {
                warn!("WiFi set_config failed: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
                continue;
            }
            info!("Starting WiFi station");
            if let Err(e) = controller.start_async().await {
                warn!("WiFi start failed: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
                continue;
            }
        }

        info!("Connecting to {}", ssid.as_str());
        let connect = select(controller.connect_async(), NETWORK_RESET.requested()).await;
        match connect {
            Either::First(Ok(())) => {}
            Either::First(Err(e)) => {
                warn!("WiFi connect failed: {:?}", e);
                update_network_status(|status| status.link = LinkState::Disconnected);
                Timer::after(RECONNECT_DELAY).await;
                continue;
            }
            Either::Second(()) => reset(&mut controller, &mut store).await,
        }

        stack.wait_config_up().await;
        if let Some(config) = stack.config_v4() {
            let ip = config.address.address();
            info!("WiFi link up, ip {}", ip);
            update_network_status(|status| {
                status.link = LinkState::Connected;
                status.ipv4 = Some(ip.octets());
            });
        }

        let event = select(
            controller.wait_for_event(WifiEvent::StaDisconnected),
            NETWORK_RESET.requested(),
        )
        .await;
        match event {
            Either::First(()) => {
                warn!("WiFi disconnected, retrying");
                update_network_status(|status| {
                    status.link = LinkState::Disconnected;
                    status.ipv4 = None;
                });
                Timer::after(RECONNECT_DELAY).await;
            }
            Either::Second(()) => reset(&mut controller, &mut store).await,
        }
    }
}

/// Drop the association, forget the stored credentials and reboot.
async fn reset(controller: &mut WifiController<'static>, store: &mut FlashCredentialStore) -> ! {
    info!("Resetting WiFi");
    if matches!(controller.is_started(), Ok(true)) {
        if let Err(e) = controller.disconnect_async().await {
            warn!("WiFi disconnect failed: {:?}", e);
        }
        let _ = controller.stop_async().await;
    }
    if let Err(e) = credentials::forget(store).await {
        warn!("Failed to clear WiFi credentials: {}", e);
    }
    restart()
}

fn restart() -> ! {
    info!("Restarting");
    esp_hal::system::software_reset()
}

#[embassy_executor::task]
pub async fn net_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
