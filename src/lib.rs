//! Local-first women's health tracker.
//!
//! The calculators in [`cycle`] and [`pregnancy`] are pure. Everything that
//! touches disk goes through [`storage`]; the only network call lives in [`ai`].

pub mod ai;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod cycle;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod error;
pub mod goals;
pub mod journal;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod pregnancy;
pub mod prompts;
pub mod storage;
pub mod tips;

pub use commands::AppState;
pub use config::Config;
pub use error::{Error, Result};
