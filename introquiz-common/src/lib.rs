//! # Intro Quiz Common Library
//!
//! Shared code for the intro quiz service and its tooling:
//! - Song model and Song Store queries
//! - Catalog seeding (built-in sample list or CSV)
//! - Database initialization
//! - Configuration and root folder resolution

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
