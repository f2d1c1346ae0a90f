//! Wi-Fi connection profile builder.
//!
//! Constructs the profile submitted to NetworkManager's
//! `AddAndActivateConnection` method, and converts it to the nested settings
//! dictionary the daemon expects.
//!
//! # NetworkManager Settings Structure
//!
//! A connection is represented as a nested dictionary:
//! - `connection`: General settings (`id`, `type`)
//! - `802-11-wireless`: Wi-Fi specific settings (`ssid`, and `mode` for hotspots)
//! - `802-11-wireless-security`: Security settings (`key-mgmt`, `psk`)
//! - `ipv4`: Only present for hotspots, set to `shared`

use std::collections::HashMap;
use zvariant::Value;

use crate::types::constants::settings;
use crate::util::utils::encode_ssid;

/// Operating mode of the Wi-Fi profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiMode {
    /// Join an existing network as a client.
    Infrastructure,
    /// Host a network other devices can join.
    AccessPoint,
}

/// Pre-shared-key security block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PskSecurity {
    /// Always `wpa-psk` (WPA personal).
    pub key_mgmt: &'static str,
    pub psk: String,
    /// Restricts the protocol to RSN (WPA2) when set.
    pub proto: Option<&'static str>,
}

/// A Wi-Fi connection profile ready to be handed to the daemon.
///
/// The profile is never stored by this crate; NetworkManager keeps whatever
/// saved-connection state it creates from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Connection name, equal to the SSID.
    pub id: String,
    /// SSID as sent on the wire.
    pub ssid: Vec<u8>,
    pub mode: WifiMode,
    pub security: Option<PskSecurity>,
}

impl ConnectionProfile {
    /// Returns `true` if the profile carries a security block.
    pub fn is_secure(&self) -> bool {
        self.security.is_some()
    }

    /// Converts the profile into the settings dictionary for `AddAndActivateConnection`.
    ///
    /// Client profiles carry only the fields NetworkManager needs to pick the
    /// rest itself: SSID, id, type and, when secured, key management and PSK.
    pub fn to_settings(&self) -> HashMap<&'static str, HashMap<&'static str, Value<'static>>> {
        let mut conn: HashMap<&'static str, HashMap<&'static str, Value<'static>>> =
            HashMap::new();

        let mut connection = HashMap::new();
        connection.insert(settings::ID, Value::from(self.id.clone()));
        connection.insert(settings::TYPE, Value::from(settings::TYPE_WIRELESS));
        conn.insert(settings::CONNECTION, connection);

        let mut wireless = HashMap::new();
        wireless.insert(settings::SSID, Value::from(self.ssid.clone()));
        if self.mode == WifiMode::AccessPoint {
            wireless.insert(settings::MODE, Value::from(settings::MODE_AP));

            let mut ipv4 = HashMap::new();
            ipv4.insert(settings::METHOD, Value::from(settings::IPV4_SHARED));
            conn.insert(settings::IPV4, ipv4);
        }
        conn.insert(settings::WIRELESS, wireless);

        if let Some(sec) = &self.security {
            let mut security = HashMap::new();
            security.insert(settings::KEY_MGMT, Value::from(sec.key_mgmt));
            security.insert(settings::PSK, Value::from(sec.psk.clone()));
            if let Some(proto) = sec.proto {
                security.insert(settings::PROTO, string_array(&[proto]));
            }
            conn.insert(settings::WIRELESS_SECURITY, security);
        }

        conn
    }
}

/// Creates a D-Bus string array value.
fn string_array(xs: &[&str]) -> Value<'static> {
    let vals: Vec<String> = xs.iter().map(|s| s.to_string()).collect();
    Value::from(vals)
}

/// Builder for Wi-Fi connection profiles.
///
/// # Examples
///
/// ## Joining a WPA personal network
///
/// ```rust
/// use kiosk_net::builders::WifiProfileBuilder;
///
/// let profile = WifiProfileBuilder::new("HomeNet")
///     .wpa_psk("sharedsecret")
///     .build();
/// assert_eq!(profile.ssid, b"HomeNet");
/// assert!(profile.is_secure());
/// ```
///
/// ## Hosting a setup hotspot
///
/// ```rust
/// use kiosk_net::builders::{WifiMode, WifiProfileBuilder};
///
/// let profile = WifiProfileBuilder::new("Krellian Kiosk")
///     .access_point()
///     .build();
/// assert_eq!(profile.mode, WifiMode::AccessPoint);
/// assert!(!profile.is_secure());
/// ```
#[derive(Debug, Clone)]
pub struct WifiProfileBuilder {
    ssid: String,
    mode: WifiMode,
    psk: Option<String>,
}

impl WifiProfileBuilder {
    /// Creates a builder for an open, infrastructure-mode profile.
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            mode: WifiMode::Infrastructure,
            psk: None,
        }
    }

    /// Adds a WPA personal security block with the given passphrase.
    ///
    /// The passphrase is carried as given, even when empty.
    pub fn wpa_psk(mut self, psk: impl Into<String>) -> Self {
        self.psk = Some(psk.into());
        self
    }

    /// Switches the profile to access point (hotspot) mode.
    ///
    /// The profile also shares IPv4, so the daemon provides DHCP and NAT to
    /// devices that join. A passphrase set with [`wpa_psk`](Self::wpa_psk)
    /// is restricted to RSN.
    pub fn access_point(mut self) -> Self {
        self.mode = WifiMode::AccessPoint;
        self
    }

    /// Builds the profile.
    pub fn build(self) -> ConnectionProfile {
        let security = self.psk.map(|psk| PskSecurity {
            key_mgmt: settings::KEY_MGMT_WPA_PSK,
            psk,
            proto: match self.mode {
                WifiMode::AccessPoint => Some(settings::PROTO_RSN),
                WifiMode::Infrastructure => None,
            },
        });

        ConnectionProfile {
            id: self.ssid.clone(),
            ssid: encode_ssid(&self.ssid),
            mode: self.mode,
            security,
        }
    }
}
