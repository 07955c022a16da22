//! Wi-Fi credentials baked in by `build.rs` from `.env`.
//!
//! These only seed the credential record on first boot.

use log::warn;
use relay_core::credentials::WifiCredentials;

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

/// `None` when `.env` left the SSID empty or the values do not fit a record.
pub fn defaults() -> Option<WifiCredentials> {
    if WIFI_SSID.is_empty() {
        return None;
    }
    match WifiCredentials::new(WIFI_SSID, WIFI_PASSWORD) {
        Ok(credentials) => Some(credentials),
        Err(e) => {
            warn!("Ignoring build-time WiFi credentials: {}", e);
            None
        }
    }
}
