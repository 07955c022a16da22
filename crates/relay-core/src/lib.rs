//! Hardware-independent core library for relay-panel
//!
//! This crate contains all platform-agnostic logic for the relay panel: the
//! debounced push button, the relay bank, screen selection, long-press
//! dispatch, the event log ring, persisted Wi-Fi credentials, the HTTP
//! control handlers and page rendering.
//!
//! It is `#![no_std]` so it compiles on both the ESP32-S3 target and desktop
//! hosts (for the simulator and tests).

#![no_std]

pub mod button;
pub mod config;
pub mod coordinator;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod log_ring;
pub mod pages;
pub mod relay;
pub mod screen;
pub mod state;

pub use error::Error;
