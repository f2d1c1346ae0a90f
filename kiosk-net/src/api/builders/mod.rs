//! Connection profile builders.
//!
//! Most users should call [`NetworkManager::connect_to_wifi_access_point`](crate::NetworkManager::connect_to_wifi_access_point)
//! instead of building profiles by hand. The builder is exposed for callers
//! that want to inspect exactly what is sent to the daemon.
//!
//! ```rust
//! use kiosk_net::builders::WifiProfileBuilder;
//!
//! let settings = WifiProfileBuilder::new("HomeNet")
//!     .wpa_psk("sharedsecret")
//!     .build()
//!     .to_settings();
//! assert!(settings.contains_key("802-11-wireless-security"));
//! ```

pub mod wifi;

pub use wifi::{ConnectionProfile, PskSecurity, WifiMode, WifiProfileBuilder};
