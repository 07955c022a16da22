//! Wi-Fi link state. A long press on this page resets the network.

use core::fmt::Write as _;

use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::String;

use super::{draw_rows, draw_title};
use crate::screen::Screen;
use crate::state::{LinkState, NetworkStatus};

pub struct WifiStatusPage<'a> {
    status: &'a NetworkStatus,
}

impl<'a> WifiStatusPage<'a> {
    pub fn new(status: &'a NetworkStatus) -> Self {
        Self { status }
    }
}

impl Drawable for WifiStatusPage<'_> {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        draw_title(display, Screen::WifiStatus)?;

        let link = match self.status.link {
            LinkState::Disconnected => "State: offline",
            LinkState::Connecting => "State: connecting",
            LinkState::Connected => "State: connected",
        };

        let mut ssid: String<40> = String::new();
        let _ = write!(ssid, "SSID: {}", self.status.ssid.as_str());

        let mut ip: String<24> = String::new();
        match self.status.ipv4 {
            Some([a, b, c, d]) => {
                let _ = write!(ip, "IP: {}.{}.{}.{}", a, b, c, d);
            }
            None => {
                let _ = ip.push_str("IP: -");
            }
        }

        draw_rows(display, &[link, ssid.as_str(), ip.as_str(), "Hold: reset WiFi"])
    }
}
