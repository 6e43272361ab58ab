#![warn(clippy::all, missing_docs)]

//! Core domain logic for GameBot.
//!
//! This crate hosts the game catalog model, its SQLite persistence, the
//! filter and random-pick engine, and the navigation state shared by the
//! terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod models;
pub mod navigation;
pub mod recommend;

pub use catalog::{Catalog, CatalogObserver, CatalogStore, SqliteCatalogStore, SubscriptionId};
pub use config::AppConfig;
pub use controller::Controller;
pub use error::{CatalogError, CatalogResult};
pub use filter::FilterCriteria;
pub use models::{Complexity, Duration, GameEntry, Size};
pub use navigation::{Navigator, PopOutcome, Screen};
pub use recommend::{Recommendation, Recommender, Suggestion};
