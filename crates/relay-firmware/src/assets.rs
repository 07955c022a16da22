//! Web UI files stored in the firmware image.

use relay_core::http::{Asset, AssetStore};

const ASSETS: [(&str, Asset); 3] = [
    (
        "/",
        Asset {
            content_type: "text/html",
            data: include_bytes!("../data/index.html"),
        },
    ),
    (
        "/style.css",
        Asset {
            content_type: "text/css",
            data: include_bytes!("../data/style.css"),
        },
    ),
    (
        "/script.js",
        Asset {
            content_type: "application/javascript",
            data: include_bytes!("../data/script.js"),
        },
    ),
];

/// An empty file under `data/` fails the build rather than serving blanks.
const fn all_present(assets: &[(&str, Asset)]) -> bool {
    let mut i = 0;
    while i < assets.len() {
        if assets[i].1.data.is_empty() {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(all_present(&ASSETS), "web UI asset under data/ is empty");

/// Read-only asset table embedded in the firmware image.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlashAssets;

impl AssetStore for FlashAssets {
    fn asset(&self, path: &str) -> Option<Asset> {
        ASSETS
            .iter()
            .find(|(asset_path, _)| *asset_path == path)
            .map(|(_, asset)| *asset)
    }
}
