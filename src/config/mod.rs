//! Configuration module for Spendwise
//!
//! This module provides configuration management including:
//! - Platform path resolution with a per-user layout
//! - Global settings persistence

pub mod paths;
pub mod settings;

pub use paths::{SpendwisePaths, UserPaths};
pub use settings::{InsightSettings, Settings};
