use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;
use zvariant::OwnedObjectPath;

use crate::types::constants::{device_type, timeouts};

/// A Wi-Fi network visible on the active adapter at the moment of a scan.
///
/// Serializes to the JSON shape served to the settings UI:
/// `{"id": "12", "ssid": "HomeNet", "strength": 74, "secure": true}`.
///
/// `id` is the daemon's access point handle with the well-known object path
/// prefix removed. It is only meaningful until the next scan; the daemon is
/// free to reassign handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPointRecord {
    pub id: String,
    pub ssid: String,
    /// Signal strength in percent (0-100), as reported by the daemon.
    pub strength: u8,
    /// True when the access point advertises any WPA or RSN capability.
    pub secure: bool,
}

/// A request to join a network previously returned by a scan.
///
/// Deserializes from the body posted by the settings UI:
/// `{"id": "3", "ssid": "HomeNet", "secure": true, "password": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub id: String,
    pub ssid: String,
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ConnectionRequest {
    /// Creates a request for an open network.
    pub fn open(id: impl Into<String>, ssid: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ssid: ssid.into(),
            secure: false,
            password: None,
        }
    }

    /// Creates a request for a WPA personal network.
    pub fn secured(
        id: impl Into<String>,
        ssid: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            ssid: ssid.into(),
            secure: true,
            password: Some(password.into()),
        }
    }
}

/// NetworkManager device types relevant to adapter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Ethernet,
    Wifi,
    Other(u32),
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            device_type::ETHERNET => DeviceType::Ethernet,
            device_type::WIFI => DeviceType::Wifi,
            v => DeviceType::Other(v),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Ethernet => write!(f, "Ethernet"),
            DeviceType::Wifi => write!(f, "Wi-Fi"),
            DeviceType::Other(v) => write!(f, "Other({v})"),
        }
    }
}

/// A network interface known to the daemon.
///
/// The path is an opaque handle; only the device type is inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adapter {
    pub path: OwnedObjectPath,
    pub device_type: DeviceType,
}

impl Adapter {
    /// Returns `true` if this adapter can act as a Wi-Fi client.
    pub fn is_wireless(&self) -> bool {
        self.device_type == DeviceType::Wifi
    }
}

/// Handle returned once the daemon has accepted an activation request.
///
/// Acceptance does not mean the link is up. Callers that need to know when
/// the connection is established must watch the active connection object
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationHandle {
    /// Object path of the saved connection settings created by the daemon.
    pub connection: OwnedObjectPath,
    /// Object path of the active connection being brought up.
    pub active_connection: OwnedObjectPath,
}

impl Display for ActivationHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.active_connection.as_str())
    }
}

/// Deadlines applied to calls made over the system bus.
///
/// # Example
///
/// ```
/// use kiosk_net::TimeoutConfig;
/// use std::time::Duration;
///
/// let config = TimeoutConfig::new()
///     .with_rpc_timeout(Duration::from_secs(2))
///     .with_connect_timeout(Duration::from_secs(20));
/// assert_eq!(config.rpc_timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Bound on every property read and listing call.
    pub rpc_timeout: Duration,
    /// Bound on `AddAndActivateConnection`.
    pub connect_timeout: Duration,
}

impl TimeoutConfig {
    /// Creates a configuration with the default deadlines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline for property reads and listing calls.
    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Sets the deadline for activation requests.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            rpc_timeout: timeouts::rpc_timeout(),
            connect_timeout: timeouts::connect_timeout(),
        }
    }
}

/// Errors that can occur during network operations.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A D-Bus communication error occurred, or the daemon rejected a request.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A bus call did not complete within its deadline.
    #[error("D-Bus call {method} timed out after {timeout:?}")]
    Timeout {
        method: &'static str,
        timeout: Duration,
    },

    /// At least one access point could not be read; no partial list is returned.
    #[error("failed to scan for Wi-Fi access points: {0}")]
    ScanFailed(#[source] Box<ConnectionError>),

    /// No Wi-Fi device was found on the system.
    #[error("no Wi-Fi device found")]
    NoWifiDevice,

    /// The SSID is empty or longer than 32 bytes.
    #[error("invalid SSID: {0}")]
    InvalidSsid(String),

    /// A secure network was requested without a password.
    #[error("a password is required for secure network '{0}'")]
    MissingPassword(String),

    /// The pre-shared key is outside the allowed length.
    #[error("invalid password: {0}")]
    InvalidPassword(String),

    /// The access point id cannot be turned back into an object path.
    #[error("invalid access point id: {0}")]
    InvalidAccessPointId(String),
}

impl ConnectionError {
    /// Returns `true` if this error, or the error it wraps, is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::ScanFailed(inner) => inner.is_timeout(),
            _ => false,
        }
    }
}
