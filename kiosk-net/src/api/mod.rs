//! Public API module.
//!
//! This module contains the high-level user-facing API for the `kiosk-net` crate.

pub mod builders;
pub mod models;
pub mod network_manager;
