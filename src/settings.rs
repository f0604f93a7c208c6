//! Persisted weather state
//!
//! The day/night clock and the current weather survive reloads. The record
//! is stored as JSON in LocalStorage under `balloonGameWeather`; blobs written
//! before the record was versioned carry no `version` field and are read as
//! version 1.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistError, PersistResult, Storage, WEATHER_KEY};
use crate::sim::weather::WeatherKind;
use crate::tuning::WeatherTuning;

/// Version written by this build
pub const WEATHER_VERSION: u32 = 2;

/// Shortest weather period accepted from storage
const MIN_CHANGE_INTERVAL_MS: f64 = 1000.0;
/// Fastest day/night clock accepted from storage (one day in 100 steps)
const MAX_DAY_NIGHT_SPEED: f32 = 0.01;

fn legacy_version() -> u32 {
    1
}

/// Weather snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeatherSettings {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: WeatherKind,
    pub time_of_day: f32,
    pub day_night_speed: f32,
    #[serde(rename = "changeInterval")]
    pub change_interval_ms: f64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self::from_tuning(&WeatherTuning::default())
    }
}

impl WeatherSettings {
    /// Fresh state: sunny, midnight, clock and interval from tuning
    pub fn from_tuning(tuning: &WeatherTuning) -> Self {
        Self {
            version: WEATHER_VERSION,
            kind: WeatherKind::Sunny,
            time_of_day: 0.0,
            day_night_speed: tuning.day_night_speed,
            change_interval_ms: tuning.change_interval_ms,
        }
    }

    /// Parse and validate a stored blob
    pub fn from_json(json: &str) -> PersistResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> PersistResult<()> {
        if self.version == 0 || self.version > WEATHER_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: self.version,
                expected: WEATHER_VERSION,
            });
        }
        if !self.time_of_day.is_finite() || !(0.0..1.0).contains(&self.time_of_day) {
            return Err(PersistError::Invalid {
                field: "timeOfDay",
                reason: format!("{} is outside [0, 1)", self.time_of_day),
            });
        }
        if !self.day_night_speed.is_finite()
            || self.day_night_speed <= 0.0
            || self.day_night_speed > MAX_DAY_NIGHT_SPEED
        {
            return Err(PersistError::Invalid {
                field: "dayNightSpeed",
                reason: format!(
                    "{} is outside (0, {MAX_DAY_NIGHT_SPEED}]",
                    self.day_night_speed
                ),
            });
        }
        if !self.change_interval_ms.is_finite() || self.change_interval_ms < MIN_CHANGE_INTERVAL_MS
        {
            return Err(PersistError::Invalid {
                field: "changeInterval",
                reason: format!(
                    "{} ms is shorter than {MIN_CHANGE_INTERVAL_MS} ms",
                    self.change_interval_ms
                ),
            });
        }
        Ok(())
    }

    /// Load from storage, falling back to `defaults` on missing or bad data
    pub fn load(storage: &dyn Storage, defaults: Self) -> Self {
        match storage.get(WEATHER_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!(
                        "Loaded weather: {} at {:.3}",
                        settings.kind.as_str(),
                        settings.time_of_day
                    );
                    settings
                }
                Err(e) => {
                    log::warn!("Discarding stored weather: {e}");
                    defaults
                }
            },
            Ok(None) => defaults,
            Err(e) => {
                log::warn!("Weather storage unavailable: {e}");
                defaults
            }
        }
    }

    /// Save to storage, always at the current version
    pub fn save(&self, storage: &mut dyn Storage) -> PersistResult<()> {
        let current = Self {
            version: WEATHER_VERSION,
            ..*self
        };
        storage.set(WEATHER_KEY, &current.to_json()?)
    }
}
