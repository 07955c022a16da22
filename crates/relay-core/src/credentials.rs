//! Persisted Wi-Fi credentials
//!
//! The station credentials live in a single record. On first boot the store
//! is seeded from the build-time defaults; a network reset overwrites the
//! record with a [`CredentialRecord::Cleared`] marker so later boots stay
//! offline instead of re-seeding.
//!
//! Record layout: `[tag]` for a cleared record, or
//! `[tag][ssid_len][ssid...][password_len][password...]` for stored ones.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use heapless::String;
use log::info;

use crate::dispatch::NetworkControl;
use crate::error::{Error, Result};

pub const SSID_LEN: usize = 32;
pub const PASSWORD_LEN: usize = 64;

/// Largest encoded [`CredentialRecord`].
pub const RECORD_LEN: usize = 3 + SSID_LEN + PASSWORD_LEN;

const TAG_CLEARED: u8 = 0x00;
const TAG_STORED: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String<SSID_LEN>,
    pub password: String<PASSWORD_LEN>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self> {
        if ssid.is_empty() {
            return Err(Error::InvalidParameter("ssid"));
        }
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|_| Error::InvalidParameter("ssid"))?,
            password: String::try_from(password).map_err(|_| Error::InvalidParameter("password"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialRecord {
    /// Credentials were forgotten by a network reset.
    Cleared,
    Stored(WifiCredentials),
}

impl CredentialRecord {
    /// Serialize into `buf`, returning the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        match self {
            CredentialRecord::Cleared => {
                let slot = buf.first_mut().ok_or(Error::InvalidParameter("record buffer"))?;
                *slot = TAG_CLEARED;
                Ok(1)
            }
            CredentialRecord::Stored(credentials) => {
                let ssid = credentials.ssid.as_bytes();
                let password = credentials.password.as_bytes();
                let total = 3 + ssid.len() + password.len();
                if buf.len() < total {
                    return Err(Error::InvalidParameter("record buffer"));
                }

                buf[0] = TAG_STORED;
                buf[1] = ssid.len() as u8;
                buf[2..2 + ssid.len()].copy_from_slice(ssid);
                let rest = &mut buf[2 + ssid.len()..];
                rest[0] = password.len() as u8;
                rest[1..1 + password.len()].copy_from_slice(password);
                Ok(total)
            }
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let corrupt = Error::InvalidParameter("credential record");
        match data.first() {
            Some(&TAG_CLEARED) => Ok(CredentialRecord::Cleared),
            Some(&TAG_STORED) => {
                let (ssid, rest) = take_field(&data[1..]).ok_or(corrupt)?;
                let (password, _) = take_field(rest).ok_or(corrupt)?;
                WifiCredentials::new(ssid, password)
                    .map(CredentialRecord::Stored)
                    .map_err(|_| corrupt)
            }
            _ => Err(corrupt),
        }
    }
}

/// Split a length-prefixed UTF-8 field off the front of `data`.
fn take_field(data: &[u8]) -> Option<(&str, &[u8])> {
    let (&len, rest) = data.split_first()?;
    let len = len as usize;
    if rest.len() < len {
        return None;
    }
    let field = core::str::from_utf8(&rest[..len]).ok()?;
    Some((field, &rest[len..]))
}

/// Non-volatile home of the [`CredentialRecord`].
pub trait CredentialStore {
    /// `Ok(None)` when nothing was ever written.
    fn load(&mut self) -> impl Future<Output = Result<Option<CredentialRecord>>>;

    fn save(&mut self, record: &CredentialRecord) -> impl Future<Output = Result<()>>;
}

/// Credentials to join with, seeding an unwritten store from `defaults`.
///
/// Returns `None` after a network reset, even when `defaults` are present.
pub async fn provision<S>(
    store: &mut S,
    defaults: Option<WifiCredentials>,
) -> Result<Option<WifiCredentials>>
where
    S: CredentialStore + ?Sized,
{
    match store.load().await? {
        Some(CredentialRecord::Stored(credentials)) => Ok(Some(credentials)),
        Some(CredentialRecord::Cleared) => Ok(None),
        None => match defaults {
            Some(credentials) => {
                info!("Seeding WiFi credentials for {}", credentials.ssid.as_str());
                store.save(&CredentialRecord::Stored(credentials.clone())).await?;
                Ok(Some(credentials))
            }
            None => Ok(None),
        },
    }
}

/// Forget the stored credentials.
pub async fn forget<S>(store: &mut S) -> Result<()>
where
    S: CredentialStore + ?Sized,
{
    info!("Clearing stored WiFi credentials");
    store.save(&CredentialRecord::Cleared).await
}

/// Hand-off between the long-press dispatcher and the task owning the
/// credential store and the radio.
pub struct NetworkReset<M: RawMutex> {
    request: Signal<M, ()>,
}

impl<M: RawMutex> NetworkReset<M> {
    pub const fn new() -> Self {
        Self {
            request: Signal::new(),
        }
    }

    pub fn is_requested(&self) -> bool {
        self.request.signaled()
    }

    /// Wait for a reset request.
    pub async fn requested(&self) {
        self.request.wait().await
    }

    /// Wait for a reset request, then forget the stored credentials.
    ///
    /// The caller restarts the device once this returns.
    pub async fn serve<S>(&self, store: &mut S) -> Result<()>
    where
        S: CredentialStore + ?Sized,
    {
        self.requested().await;
        forget(store).await
    }
}

impl<M: RawMutex> Default for NetworkReset<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> NetworkControl for &NetworkReset<M> {
    fn reset_network(&mut self) {
        self.request.signal(());
    }
}
