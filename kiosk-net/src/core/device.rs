//! Network device enumeration and wireless adapter selection.

use futures::future::try_join_all;
use log::{debug, info};

use crate::Result;
use crate::api::models::{Adapter, TimeoutConfig};
use crate::dbus::NetworkBus;
use crate::util::utils::with_timeout;

/// Lists every device known to the daemon together with its hardware type.
///
/// Device types are fetched concurrently; the result keeps the daemon's
/// enumeration order.
pub(crate) async fn list_adapters(
    bus: &dyn NetworkBus,
    timeouts: &TimeoutConfig,
) -> Result<Vec<Adapter>> {
    let paths = with_timeout("GetAllDevices", timeouts.rpc_timeout, bus.get_devices()).await?;
    debug!("Daemon reports {} device(s)", paths.len());

    let types = try_join_all(
        paths
            .iter()
            .map(|p| with_timeout("DeviceType", timeouts.rpc_timeout, bus.device_type(p))),
    )
    .await?;

    Ok(paths
        .into_iter()
        .zip(types)
        .map(|(path, raw)| Adapter {
            path,
            device_type: raw.into(),
        })
        .collect())
}

/// Finds the first wireless-capable adapter.
///
/// Returns `Ok(None)` on hosts without Wi-Fi hardware; that is a valid
/// state, not an error.
pub(crate) async fn discover_wireless_adapter(
    bus: &dyn NetworkBus,
    timeouts: &TimeoutConfig,
) -> Result<Option<Adapter>> {
    let adapter = list_adapters(bus, timeouts)
        .await?
        .into_iter()
        .find(Adapter::is_wireless);

    match &adapter {
        Some(a) => info!("Using Wi-Fi adapter {}", a.path.as_str()),
        None => info!("No Wi-Fi adapter found"),
    }

    Ok(adapter)
}
