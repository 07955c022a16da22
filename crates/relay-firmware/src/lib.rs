//! ESP32-S3 firmware-specific modules for relay-panel
//!
//! This crate contains the code that cannot compile on desktop targets:
//! GPIO interrupt wiring, relay pin ownership, the SSD1306 OLED, the Wi-Fi
//! station, the credential record in flash and the TCP listener behind the
//! control surface.

#![no_std]

pub mod app_state;
pub mod assets;
pub mod button_irq;
pub mod display;
pub mod render;
pub mod server;
pub mod storage;
pub mod wifi;
pub mod wifi_secrets;
