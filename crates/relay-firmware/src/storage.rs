//! Wi-Fi credential record in internal flash
//!
//! A small region past the application image is handed to
//! `sequential-storage` as a key-value map; the only key holds the encoded
//! [`CredentialRecord`].

use core::ops::Range;

use embassy_embedded_hal::adapter::BlockingAsync;
use embedded_storage::nor_flash::ReadNorFlash;
use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;
use log::{error, info, warn};
use relay_core::Error;
use relay_core::credentials::{CredentialRecord, CredentialStore, RECORD_LEN};
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

/// Flash sector size on the ESP32-S3 (4 KB).
const SECTOR_SIZE: u32 = 4096;

/// Start of the credential region, at the 4 MB mark minus 64 KB.
const STORAGE_START: u32 = 0x3F_0000;

/// Four sectors so the map can rotate pages while writing.
const STORAGE_END: u32 = STORAGE_START + 4 * SECTOR_SIZE;

const FLASH_RANGE: Range<u32> = STORAGE_START..STORAGE_END;

const KEY_WIFI_CREDENTIALS: u8 = 0x01;

/// Room for the key, the record and the item header.
const ITEM_BUFFER_LEN: usize = RECORD_LEN + 32;

pub struct FlashCredentialStore {
    flash: BlockingAsync<FlashStorage<'static>>,
}

impl FlashCredentialStore {
    /// Take the flash peripheral and check the credential region exists.
    pub fn mount(flash: FLASH<'static>) -> Result<Self, Error> {
        let flash = FlashStorage::new(flash);
        let capacity = flash.capacity();
        if capacity < STORAGE_END as usize {
            error!(
                "Flash too small for credential region: {} < {}",
                capacity, STORAGE_END
            );
            return Err(Error::StorageMountFailure);
        }
        info!(
            "Credential storage at {:#x}..{:#x}",
            STORAGE_START, STORAGE_END
        );
        Ok(Self {
            flash: BlockingAsync::new(flash),
        })
    }
}

impl CredentialStore for FlashCredentialStore {
    async fn load(&mut self) -> Result<Option<CredentialRecord>, Error> {
        let mut buf = [0u8; ITEM_BUFFER_LEN];
        let item = fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            FLASH_RANGE,
            &mut NoCache::new(),
            &mut buf,
            &KEY_WIFI_CREDENTIALS,
        )
        .await
        .map_err(|e| {
            warn!("Flash read error: {:?}", e);
            Error::StorageAccess
        })?;

        item.map(CredentialRecord::decode).transpose()
    }

    async fn save(&mut self, record: &CredentialRecord) -> Result<(), Error> {
        let mut data = [0u8; RECORD_LEN];
        let len = record.encode(&mut data)?;
        let item: &[u8] = &data[..len];

        let mut buf = [0u8; ITEM_BUFFER_LEN];
        store_item::<u8, &[u8], _>(
            &mut self.flash,
            FLASH_RANGE,
            &mut NoCache::new(),
            &mut buf,
            &KEY_WIFI_CREDENTIALS,
            &item,
        )
        .await
        .map_err(|e| {
            warn!("Flash write error: {:?}", e);
            Error::StorageAccess
        })
    }
}
