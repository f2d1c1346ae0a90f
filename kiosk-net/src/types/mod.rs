//! Type definitions and constants.
//!
//! This module contains the NetworkManager wire constants and the access point
//! security flag type.

pub(crate) mod constants;
pub mod security_flags;
