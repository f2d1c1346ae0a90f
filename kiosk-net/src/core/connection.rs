//! Connection requests: joining an access point and hosting a hotspot.
//!
//! Both operations submit one `AddAndActivateConnection` call and return as
//! soon as the daemon accepts it. Neither waits for the link to come up, and
//! a rejected request is never retried.

use log::{debug, info, warn};
use zvariant::{ObjectPath, OwnedObjectPath};

use crate::Result;
use crate::api::builders::{ConnectionProfile, WifiProfileBuilder};
use crate::api::models::{
    ActivationHandle, Adapter, ConnectionError, ConnectionRequest, TimeoutConfig,
};
use crate::dbus::NetworkBus;
use crate::types::constants::{limits, paths};
use crate::util::utils::{access_point_path, with_timeout};

/// Checks that an SSID is non-empty and fits in 32 bytes.
pub(crate) fn validate_ssid(ssid: &str) -> Result<()> {
    if ssid.is_empty() {
        return Err(ConnectionError::InvalidSsid("SSID must not be empty".into()));
    }
    if ssid.len() > limits::SSID_MAX_BYTES {
        return Err(ConnectionError::InvalidSsid(format!(
            "SSID is {} bytes, the maximum is {}",
            ssid.len(),
            limits::SSID_MAX_BYTES
        )));
    }
    Ok(())
}

/// Checks a passphrase for a hotspot this device hosts.
fn validate_hotspot_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(limits::PSK_MIN_LEN..=limits::PSK_MAX_LEN).contains(&len) {
        return Err(ConnectionError::InvalidPassword(format!(
            "must be {} to {} characters, got {len}",
            limits::PSK_MIN_LEN,
            limits::PSK_MAX_LEN
        )));
    }
    Ok(())
}

/// Builds the client profile for a connection request.
///
/// A secure request without a non-empty password is rejected here, before
/// anything reaches the daemon. For open requests the password is ignored.
pub(crate) fn build_client_profile(request: &ConnectionRequest) -> Result<ConnectionProfile> {
    validate_ssid(&request.ssid)?;

    let builder = WifiProfileBuilder::new(request.ssid.as_str());
    let builder = if request.secure {
        match request.password.as_deref() {
            Some(psk) if !psk.is_empty() => builder.wpa_psk(psk),
            _ => return Err(ConnectionError::MissingPassword(request.ssid.clone())),
        }
    } else {
        builder
    };

    Ok(builder.build())
}

/// Requests activation of a connection to a previously scanned access point.
///
/// The access point id is not checked against a fresh scan; the daemon
/// rejects ids it no longer knows.
pub(crate) async fn connect(
    bus: &dyn NetworkBus,
    adapter: Option<&Adapter>,
    request: &ConnectionRequest,
    timeouts: &TimeoutConfig,
) -> Result<ActivationHandle> {
    let profile = build_client_profile(request)?;
    let adapter = adapter.ok_or(ConnectionError::NoWifiDevice)?;
    let ap_path = access_point_path(&request.id)?;

    debug!(
        "Connecting to '{}' via {} on {} | secure={}",
        request.ssid,
        ap_path.as_str(),
        adapter.path.as_str(),
        profile.is_secure()
    );

    activate(bus, &profile, &adapter.path, &ap_path, timeouts).await
}

/// Starts a Wi-Fi access point on the active adapter.
///
/// Lets a device with no configured network be reached for setup. Without a
/// password the hotspot is open.
pub(crate) async fn create_hotspot(
    bus: &dyn NetworkBus,
    adapter: Option<&Adapter>,
    ssid: &str,
    password: Option<&str>,
    timeouts: &TimeoutConfig,
) -> Result<ActivationHandle> {
    validate_ssid(ssid)?;
    if let Some(psk) = password {
        validate_hotspot_password(psk)?;
    }
    let adapter = adapter.ok_or(ConnectionError::NoWifiDevice)?;

    let builder = WifiProfileBuilder::new(ssid).access_point();
    let profile = match password {
        Some(psk) => builder.wpa_psk(psk).build(),
        None => builder.build(),
    };

    debug!(
        "Creating hotspot '{ssid}' on {} | secure={}",
        adapter.path.as_str(),
        profile.is_secure()
    );

    let no_object = OwnedObjectPath::from(ObjectPath::from_static_str_unchecked(paths::NONE));
    activate(bus, &profile, &adapter.path, &no_object, timeouts).await
}

async fn activate(
    bus: &dyn NetworkBus,
    profile: &ConnectionProfile,
    device: &OwnedObjectPath,
    specific_object: &OwnedObjectPath,
    timeouts: &TimeoutConfig,
) -> Result<ActivationHandle> {
    let handle = with_timeout(
        "AddAndActivateConnection",
        timeouts.connect_timeout,
        bus.add_and_activate_connection(profile, device, specific_object),
    )
    .await
    .inspect_err(|e| warn!("Activation of '{}' rejected: {e}", profile.id))?;

    info!("Activation of '{}' accepted: {handle}", profile.id);
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_ssid_accepts_normal_names() {
        for ssid in ["HomeNet", "A", "12345678901234567890123456789012"] {
            assert!(validate_ssid(ssid).is_ok(), "'{ssid}' should be valid");
        }
    }

    #[test]
    fn validate_ssid_rejects_empty_and_long() {
        assert!(matches!(
            validate_ssid(""),
            Err(ConnectionError::InvalidSsid(_))
        ));
        assert!(matches!(
            validate_ssid(&"a".repeat(33)),
            Err(ConnectionError::InvalidSsid(_))
        ));
    }

    #[test]
    fn hotspot_password_length() {
        assert!(validate_hotspot_password("password").is_ok());
        assert!(validate_hotspot_password(&"a".repeat(63)).is_ok());
        assert!(validate_hotspot_password("short").is_err());
        assert!(validate_hotspot_password(&"a".repeat(64)).is_err());
    }

    #[test]
    fn secure_request_requires_password() {
        let mut request = ConnectionRequest::secured("3", "HomeNet", "");
        assert!(matches!(
            build_client_profile(&request),
            Err(ConnectionError::MissingPassword(ssid)) if ssid == "HomeNet"
        ));

        request.password = None;
        assert!(matches!(
            build_client_profile(&request),
            Err(ConnectionError::MissingPassword(_))
        ));
    }

    #[test]
    fn secure_request_always_carries_psk() {
        let request = ConnectionRequest::secured("3", "HomeNet", "sharedsecret");
        let profile = build_client_profile(&request).unwrap();
        let security = profile.security.expect("secure profile has a security block");
        assert_eq!(security.key_mgmt, "wpa-psk");
        assert_eq!(security.psk, "sharedsecret");
    }

    #[test]
    fn open_request_ignores_password() {
        let mut request = ConnectionRequest::open("5", "Cafe");
        request.password = Some("ignored".into());
        let profile = build_client_profile(&request).unwrap();
        assert!(profile.security.is_none());
        assert_eq!(profile.id, "Cafe");
    }
}
