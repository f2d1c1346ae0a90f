//! Wi-Fi access point scanning.
//!
//! Builds one [`AccessPointRecord`] per access point visible on the active
//! adapter. All property reads of a scan are issued concurrently, and the
//! scan either returns every record or fails as a whole.

use futures::future::try_join_all;
use futures::try_join;
use log::{debug, warn};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{AccessPointRecord, Adapter, ConnectionError, TimeoutConfig};
use crate::dbus::NetworkBus;
use crate::types::security_flags::{ApSecurityFlags, is_secure};
use crate::util::utils::{access_point_id, decode_ssid, with_timeout};

/// Lists the access points currently visible on `adapter`.
///
/// With no adapter the list is empty. If any read fails the whole scan fails
/// with [`ConnectionError::ScanFailed`]; callers can therefore tell "no
/// networks" apart from "scan failed". The result is not sorted.
pub(crate) async fn scan_access_points(
    bus: &dyn NetworkBus,
    adapter: Option<&Adapter>,
    timeouts: &TimeoutConfig,
) -> Result<Vec<AccessPointRecord>> {
    let Some(adapter) = adapter else {
        debug!("No Wi-Fi adapter, returning empty scan");
        return Ok(Vec::new());
    };

    match list_access_points(bus, adapter, timeouts).await {
        Ok(records) => {
            debug!("Scan found {} access point(s)", records.len());
            Ok(records)
        }
        Err(e) => {
            warn!("Failed to scan for Wi-Fi access points: {e}");
            Err(ConnectionError::ScanFailed(Box::new(e)))
        }
    }
}

async fn list_access_points(
    bus: &dyn NetworkBus,
    adapter: &Adapter,
    timeouts: &TimeoutConfig,
) -> Result<Vec<AccessPointRecord>> {
    let aps = with_timeout(
        "AccessPoints",
        timeouts.rpc_timeout,
        bus.access_points(&adapter.path),
    )
    .await?;

    try_join_all(aps.iter().map(|ap| access_point_details(bus, ap, timeouts))).await
}

/// Reads SSID, strength and security of one access point concurrently.
async fn access_point_details(
    bus: &dyn NetworkBus,
    ap: &OwnedObjectPath,
    timeouts: &TimeoutConfig,
) -> Result<AccessPointRecord> {
    let limit = timeouts.rpc_timeout;
    let (ssid, strength, secure) = try_join!(
        with_timeout("Ssid", limit, bus.access_point_ssid(ap)),
        with_timeout("Strength", limit, bus.access_point_strength(ap)),
        access_point_security(bus, ap, timeouts),
    )?;

    Ok(AccessPointRecord {
        id: access_point_id(ap.as_str()),
        ssid: decode_ssid(&ssid),
        strength,
        secure,
    })
}

async fn access_point_security(
    bus: &dyn NetworkBus,
    ap: &OwnedObjectPath,
    timeouts: &TimeoutConfig,
) -> Result<bool> {
    let limit = timeouts.rpc_timeout;
    let (wpa, rsn) = try_join!(
        with_timeout("WpaFlags", limit, bus.access_point_wpa_flags(ap)),
        with_timeout("RsnFlags", limit, bus.access_point_rsn_flags(ap)),
    )?;

    Ok(is_secure(
        ApSecurityFlags::from_raw(wpa),
        ApSecurityFlags::from_raw(rsn),
    ))
}

/// Asks the daemon to refresh the access point list of `adapter`.
///
/// Does nothing without an adapter.
pub(crate) async fn request_scan(
    bus: &dyn NetworkBus,
    adapter: Option<&Adapter>,
    timeouts: &TimeoutConfig,
) -> Result<()> {
    let Some(adapter) = adapter else {
        debug!("No Wi-Fi adapter, skipping scan request");
        return Ok(());
    };

    with_timeout(
        "RequestScan",
        timeouts.rpc_timeout,
        bus.request_scan(&adapter.path),
    )
    .await
}
