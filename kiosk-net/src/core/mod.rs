//! Core internal logic.
//!
//! This module contains the orchestration behind the public facade: adapter
//! discovery, access point scanning and connection requests.

pub(crate) mod connection;
pub(crate) mod device;
pub(crate) mod scan;
