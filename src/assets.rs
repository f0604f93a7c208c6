//! Image assets: keys, file paths and load bookkeeping
//!
//! The browser host loads every image in one batch (see
//! `platform::web::load_assets`) and records the outcome here. Drawing code
//! asks [`AssetCache::usable`] before emitting an image, so missing or broken
//! files are skipped instead of failing the frame.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::{DIGIT_COUNT, LETTER_COUNT, PATTERN_COUNT, PATTERN_FILES};
use crate::sim::balloon::Symbol;
use crate::sim::pump::PumpParts;

const ASSET_DIR: &str = "Graphics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKey {
    /// Balloon pattern, index into `PATTERN_FILES`
    Pattern(usize),
    Letter(u8),
    Digit(u8),
    PumpBody,
    PumpHandle,
    PumpInflator,
}

impl AssetKey {
    /// Every image the game uses, in load order
    pub fn all() -> Vec<AssetKey> {
        let mut keys = Vec::with_capacity(PATTERN_COUNT + (LETTER_COUNT + DIGIT_COUNT) as usize + 3);
        keys.extend((0..PATTERN_COUNT).map(AssetKey::Pattern));
        keys.extend((0..LETTER_COUNT).map(AssetKey::Letter));
        keys.extend((0..DIGIT_COUNT).map(AssetKey::Digit));
        keys.extend([
            AssetKey::PumpBody,
            AssetKey::PumpHandle,
            AssetKey::PumpInflator,
        ]);
        keys
    }

    pub fn for_symbol(symbol: Symbol) -> Self {
        match symbol {
            Symbol::Letter(i) => AssetKey::Letter(i),
            Symbol::Digit(i) => AssetKey::Digit(i),
        }
    }

    /// Path relative to the page
    pub fn path(&self) -> String {
        match *self {
            AssetKey::Pattern(i) => {
                let file = PATTERN_FILES[i % PATTERN_COUNT];
                format!("{ASSET_DIR}/ballon_pattern{file}.png")
            }
            AssetKey::Letter(i) => format!("{ASSET_DIR}/Symbol {}.png", 10000 + i as u32),
            AssetKey::Digit(i) => format!("{ASSET_DIR}/{i}.png"),
            AssetKey::PumpBody => format!("{ASSET_DIR}/pumpbody.png"),
            AssetKey::PumpHandle => format!("{ASSET_DIR}/pump_handle.png"),
            AssetKey::PumpInflator => format!("{ASSET_DIR}/pump_inflator.png"),
        }
    }
}

/// Natural pixel size of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Largest side; images are scaled to fit a target by this
    pub fn max_side(&self) -> f32 {
        self.width.max(self.height) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready(ImageInfo),
    Failed,
}

/// Decoded RGBA8 pixels, ready for texture upload
#[derive(Debug, Clone)]
pub struct ImageData {
    pub key: AssetKey,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height,
        }
    }
}

/// Batch load progress; failures count as settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    pub settled: usize,
    pub failed: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn is_complete(&self) -> bool {
        self.settled >= self.total
    }
}

#[derive(Debug, Clone)]
pub struct AssetCache {
    entries: HashMap<AssetKey, AssetStatus>,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    /// Every known key, all pending
    pub fn new() -> Self {
        Self {
            entries: AssetKey::all()
                .into_iter()
                .map(|key| (key, AssetStatus::Pending))
                .collect(),
        }
    }

    pub fn mark_ready(&mut self, key: AssetKey, info: ImageInfo) {
        self.entries.insert(key, AssetStatus::Ready(info));
    }

    pub fn mark_failed(&mut self, key: AssetKey) {
        log::warn!("Failed to load: {}", key.path());
        self.entries.insert(key, AssetStatus::Failed);
    }

    pub fn status(&self, key: AssetKey) -> AssetStatus {
        self.entries
            .get(&key)
            .copied()
            .unwrap_or(AssetStatus::Pending)
    }

    /// Loaded with a non-zero natural size
    pub fn usable(&self, key: AssetKey) -> bool {
        self.info(key).is_some()
    }

    pub fn info(&self, key: AssetKey) -> Option<ImageInfo> {
        match self.status(key) {
            AssetStatus::Ready(info) if info.width > 0 && info.height > 0 => Some(info),
            _ => None,
        }
    }

    pub fn progress(&self) -> LoadProgress {
        let mut progress = LoadProgress {
            total: self.entries.len(),
            ..LoadProgress::default()
        };
        for status in self.entries.values() {
            match status {
                AssetStatus::Pending => {}
                AssetStatus::Ready(_) => progress.settled += 1,
                AssetStatus::Failed => {
                    progress.settled += 1;
                    progress.failed += 1;
                }
            }
        }
        progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// Natural sizes of the pump images that loaded
    pub fn pump_parts(&self) -> PumpParts {
        PumpParts {
            body: self.info(AssetKey::PumpBody).map(|i| i.size()),
            handle: self.info(AssetKey::PumpHandle).map(|i| i.size()),
            inflator: self.info(AssetKey::PumpInflator).map(|i| i.size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(AssetKey::Pattern(0).path(), "Graphics/ballon_pattern1.png");
        assert_eq!(AssetKey::Pattern(5).path(), "Graphics/ballon_pattern7.png");
        assert_eq!(AssetKey::Letter(0).path(), "Graphics/Symbol 10000.png");
        assert_eq!(AssetKey::Letter(25).path(), "Graphics/Symbol 10025.png");
        assert_eq!(AssetKey::Digit(3).path(), "Graphics/3.png");
        assert_eq!(AssetKey::PumpBody.path(), "Graphics/pumpbody.png");
    }

    #[test]
    fn test_all_keys_unique() {
        let keys = AssetKey::all();
        assert_eq!(keys.len(), 49);
        let cache = AssetCache::new();
        assert_eq!(cache.progress().total, 49);
    }

    #[test]
    fn test_usable_needs_ready_and_nonzero() {
        let mut cache = AssetCache::new();
        assert!(!cache.usable(AssetKey::Digit(1)));

        cache.mark_ready(AssetKey::Digit(1), ImageInfo { width: 0, height: 10 });
        assert!(!cache.usable(AssetKey::Digit(1)));

        cache.mark_ready(AssetKey::Digit(1), ImageInfo { width: 8, height: 10 });
        assert!(cache.usable(AssetKey::Digit(1)));

        cache.mark_failed(AssetKey::Digit(2));
        assert!(!cache.usable(AssetKey::Digit(2)));
    }

    #[test]
    fn test_progress_counts_failures_as_settled() {
        let mut cache = AssetCache::new();
        let keys = AssetKey::all();
        for (i, key) in keys.iter().enumerate() {
            assert!(!cache.is_complete());
            if i % 2 == 0 {
                cache.mark_failed(*key);
            } else {
                cache.mark_ready(*key, ImageInfo { width: 4, height: 4 });
            }
        }
        let progress = cache.progress();
        assert!(progress.is_complete());
        assert_eq!(progress.failed, 25);
    }

    #[test]
    fn test_pump_parts_only_for_loaded_images() {
        let mut cache = AssetCache::new();
        cache.mark_ready(AssetKey::PumpBody, ImageInfo { width: 300, height: 400 });
        cache.mark_failed(AssetKey::PumpHandle);
        let parts = cache.pump_parts();
        assert_eq!(parts.body, Some(Vec2::new(300.0, 400.0)));
        assert_eq!(parts.handle, None);
        assert_eq!(parts.inflator, None);
    }
}
