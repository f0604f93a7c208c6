//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (tuning values are per 60 Hz step)
//! - Seeded RNG only
//! - Time comes from the host as a parameter, never read from a clock
//! - No rendering or platform dependencies

pub mod balloon;
pub mod entities;
pub mod game;
pub mod pump;
pub mod symbols;
pub mod tick;
pub mod weather;

pub use balloon::{Balloon, BalloonPhase, SpecialKind, Symbol};
pub use entities::{Bird, Cloud, Entity, Particle, ScorePopup, UpdateCtx};
pub use game::{ClickOutcome, Game};
pub use pump::{AirPump, PumpMode, PumpParts, PumpState, PumpUpdate, Stroke};
pub use symbols::SymbolPool;
pub use weather::{DayPhase, Raindrop, SkyColors, Star, SunRay, WeatherKind, WeatherManager};
