//! D-Bus proxy interfaces for NetworkManager.
//!
//! This module contains low-level D-Bus proxy definitions for communicating
//! with NetworkManager over the system bus, and the [`NetworkBus`] seam the
//! rest of the crate calls through.
//!
//! # NetworkManager D-Bus Structure
//!
//! - `/org/freedesktop/NetworkManager` - Main NM object
//! - `/org/freedesktop/NetworkManager/Devices/*` - Device objects
//! - `/org/freedesktop/NetworkManager/AccessPoint/*` - Access point objects

mod access_point;
mod bus;
mod device;
mod main_nm;
mod wireless;

pub(crate) use access_point::NMAccessPointProxy;
pub use bus::{NetworkBus, SystemBus};
pub(crate) use device::NMDeviceProxy;
pub(crate) use main_nm::NMProxy;
pub(crate) use wireless::NMWirelessProxy;
