//! Wi-Fi discovery and connection for kiosk devices, via NetworkManager.
//!
//! This crate provides a small async API over NetworkManager's D-Bus
//! interface for the operations a kiosk needs:
//!
//! - Finding the Wi-Fi adapter
//! - Listing visible access points with SSID, strength and security
//! - Connecting to an open or WPA-PSK access point
//! - Hosting a setup hotspot
//!
//! # Example
//!
//! ```no_run
//! use kiosk_net::{ConnectionRequest, NetworkManager};
//!
//! # async fn example() -> kiosk_net::Result<()> {
//! let nm = NetworkManager::start().await;
//!
//! // List visible access points
//! let aps = nm.scan_wifi_access_points().await?;
//! for ap in &aps {
//!     println!("{} ({}%)", ap.ssid, ap.strength);
//! }
//!
//! // Connect to one of them
//! if let Some(ap) = aps.first() {
//!     let request = if ap.secure {
//!         ConnectionRequest::secured(&ap.id, &ap.ssid, "password123")
//!     } else {
//!         ConnectionRequest::open(&ap.id, &ap.ssid)
//!     };
//!     nm.connect_to_wifi_access_point(&request).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Access Point Ids
//!
//! An [`AccessPointRecord::id`] is the daemon's object path with
//! [`ACCESS_POINT_PREFIX`] removed. Ids are only meaningful until the daemon
//! drops the access point; connect soon after scanning.
//!
//! # Error Handling
//!
//! All operations return `Result<T, ConnectionError>`. Every bus call has a
//! deadline (see [`TimeoutConfig`]), so no operation waits forever on an
//! unresponsive daemon. Invalid requests are rejected before anything is
//! sent over the bus.
//!
//! # Testing
//!
//! [`NetworkManager::with_bus`] accepts any [`NetworkBus`], which lets tests
//! run against an in-memory daemon instead of the system bus.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod api;
mod core;
mod dbus;
mod types;
mod util;

// Re-exported public API
pub use api::builders;
pub use api::models::{
    AccessPointRecord, ActivationHandle, Adapter, ConnectionError, ConnectionRequest, DeviceType,
    TimeoutConfig,
};
pub use api::network_manager::NetworkManager;
pub use dbus::{NetworkBus, SystemBus};
pub use types::constants::paths::ACCESS_POINT_PREFIX;
pub use types::security_flags::ApSecurityFlags;

/// A specialized `Result` type for network operations.
pub type Result<T> = std::result::Result<T, ConnectionError>;
