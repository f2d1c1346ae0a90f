//! Constants for NetworkManager D-Bus interface values.
//!
//! Every string and numeric code that forms part of the contract with the
//! NetworkManager daemon lives here: object paths, device type codes and the
//! connection settings keys sent to `AddAndActivateConnection`.

/// Object paths and well-known names on the system bus.
pub mod paths {
    /// Prefix shared by every access point object the daemon exports.
    pub const ACCESS_POINT_PREFIX: &str = "/org/freedesktop/NetworkManager/AccessPoint/";

    /// The null object path, used when no specific object applies.
    pub const NONE: &str = "/";
}

/// NetworkManager device type constants.
pub mod device_type {
    pub const ETHERNET: u32 = 1;
    pub const WIFI: u32 = 2;
}

/// Keys and values of the connection settings dictionary.
///
/// A connection is a two-level map: section name to (key to value). The
/// names below are reproduced exactly as the daemon expects them.
pub mod settings {
    pub const CONNECTION: &str = "connection";
    pub const WIRELESS: &str = "802-11-wireless";
    pub const WIRELESS_SECURITY: &str = "802-11-wireless-security";
    pub const IPV4: &str = "ipv4";

    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const SSID: &str = "ssid";
    pub const MODE: &str = "mode";
    pub const KEY_MGMT: &str = "key-mgmt";
    pub const PSK: &str = "psk";
    pub const PROTO: &str = "proto";
    pub const METHOD: &str = "method";

    /// Connection type for Wi-Fi profiles (same string as the section name).
    pub const TYPE_WIRELESS: &str = "802-11-wireless";
    /// Key management for WPA/WPA2 personal.
    pub const KEY_MGMT_WPA_PSK: &str = "wpa-psk";
    pub const MODE_AP: &str = "ap";
    pub const PROTO_RSN: &str = "rsn";
    pub const IPV4_SHARED: &str = "shared";
}

/// Limits on user-supplied values.
pub mod limits {
    /// 802.11 caps an SSID at 32 octets.
    pub const SSID_MAX_BYTES: usize = 32;
    /// WPA passphrase length bounds.
    pub const PSK_MIN_LEN: usize = 8;
    pub const PSK_MAX_LEN: usize = 63;
}

/// Default deadlines for bus round-trips.
pub mod timeouts {
    use std::time::Duration;

    /// Upper bound for a single property read or method call (5 seconds).
    const RPC_TIMEOUT_SECS: u64 = 5;

    /// Upper bound for `AddAndActivateConnection` (10 seconds).
    ///
    /// The daemon validates the whole profile before replying, so this call
    /// is slower than a property read.
    const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Returns the default per-call RPC timeout.
    pub fn rpc_timeout() -> Duration {
        Duration::from_secs(RPC_TIMEOUT_SECS)
    }

    /// Returns the default timeout for activation requests.
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}
