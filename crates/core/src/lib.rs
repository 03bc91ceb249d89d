#![warn(clippy::all, missing_docs)]

//! Core domain logic for Player DNA.
//!
//! This crate hosts the achievement models, rarity classification,
//! curation and caching pipeline, the upstream data sources and the
//! configuration layer used by the command-line frontend.

pub mod achievement;
pub mod config;
pub mod models;
pub mod profile;
pub mod rarity;
pub mod session;
pub mod source;

pub use achievement::{
    curate_notable, AchievementCurator, RawAchievementRecord, SourceFailure, SourceResult,
};
pub use config::AppConfig;
pub use models::{Achievement, Game, GameRef};
pub use profile::{PcsrProfile, PlayerStats};
pub use rarity::{classify_rarity, sort_by_rarity, Rarity};
pub use session::PlayerSession;
pub use source::{AchievementSource, PlayerSource, SteamAchievementSource};
