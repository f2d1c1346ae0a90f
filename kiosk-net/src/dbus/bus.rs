//! Access to the NetworkManager daemon over the system bus.
//!
//! [`NetworkBus`] lists every call the crate makes to the daemon. The
//! production implementation, [`SystemBus`], holds one shared `zbus`
//! connection; tests substitute an in-memory daemon.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;
use zbus::Connection;
use zbus::proxy::CacheProperties;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::builders::ConnectionProfile;
use crate::api::models::ActivationHandle;
use crate::dbus::{NMAccessPointProxy, NMDeviceProxy, NMProxy, NMWirelessProxy};

/// The calls made to the NetworkManager daemon.
///
/// Implementations must allow concurrent outstanding calls; the scanner
/// issues all property reads for a scan at once.
#[async_trait]
pub trait NetworkBus: Send + Sync {
    /// `GetAllDevices` on the root object.
    async fn get_devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// `DeviceType` property of a device.
    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32>;

    /// `AccessPoints` property of a wireless device.
    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>>;

    /// `Ssid` property of an access point.
    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>>;

    /// `Strength` property of an access point.
    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8>;

    /// `WpaFlags` property of an access point.
    async fn access_point_wpa_flags(&self, ap: &OwnedObjectPath) -> Result<u32>;

    /// `RsnFlags` property of an access point.
    async fn access_point_rsn_flags(&self, ap: &OwnedObjectPath) -> Result<u32>;

    /// `RequestScan` on a wireless device.
    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()>;

    /// `AddAndActivateConnection` on the root object.
    async fn add_and_activate_connection(
        &self,
        profile: &ConnectionProfile,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<ActivationHandle>;
}

/// [`NetworkBus`] backed by the D-Bus system bus.
///
/// The connection is opened once and shared by every call. If a call fails
/// at the transport level the connection is dropped and the next call opens
/// a fresh one. Failed calls are not replayed.
#[derive(Debug)]
pub struct SystemBus {
    slot: ConnectionSlot<Connection>,
}

impl SystemBus {
    /// Opens a connection to the system bus.
    pub async fn connect() -> Result<Self> {
        let conn = Connection::system().await?;
        debug!("Connected to system bus as {:?}", conn.unique_name());
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            slot: ConnectionSlot::new(Some(conn)),
        }
    }

    /// A bus with no open connection; the first call tries to open one.
    pub(crate) fn disconnected() -> Self {
        Self {
            slot: ConnectionSlot::new(None),
        }
    }

    /// Runs one bus call, forgetting the connection if the transport failed.
    async fn call<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Connection) -> Fut,
        Fut: Future<Output = zbus::Result<T>>,
    {
        let (conn, generation) = self.slot.get_or_open(Connection::system).await?;
        let result = f(conn).await;
        self.slot.settle(generation, &result).await;
        result.map_err(Into::into)
    }
}

/// Lazily opened connection shared by concurrent calls.
///
/// Every open bumps the generation. A call remembers the generation it ran
/// on, so a late failure on an old connection never discards a newer one.
#[derive(Debug)]
struct ConnectionSlot<C> {
    state: Mutex<SlotState<C>>,
}

#[derive(Debug)]
struct SlotState<C> {
    conn: Option<C>,
    generation: u64,
}

impl<C: Clone> ConnectionSlot<C> {
    fn new(conn: Option<C>) -> Self {
        Self {
            state: Mutex::new(SlotState {
                conn,
                generation: 0,
            }),
        }
    }

    /// Returns the shared connection and its generation, calling `open` if
    /// the last one was dropped.
    async fn get_or_open<F, Fut>(&self, open: F) -> Result<(C, u64)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = zbus::Result<C>>,
    {
        let mut state = self.state.lock().await;
        if let Some(conn) = &state.conn {
            return Ok((conn.clone(), state.generation));
        }

        info!("Opening system bus connection");
        let conn = open().await?;
        state.generation += 1;
        state.conn = Some(conn.clone());
        Ok((conn, state.generation))
    }

    /// Drops the connection of `generation` if `result` shows the transport
    /// is gone. Returns `true` if the connection was dropped.
    async fn settle<T>(&self, generation: u64, result: &zbus::Result<T>) -> bool {
        let Err(e) = result else {
            return false;
        };
        if !is_disconnect(e) {
            return false;
        }

        let mut state = self.state.lock().await;
        if state.generation != generation || state.conn.is_none() {
            debug!("Connection {generation} already replaced, ignoring ({e})");
            return false;
        }

        warn!("System bus connection lost ({e}), will reconnect on next call");
        state.conn = None;
        true
    }
}

/// Returns `true` for errors that mean the bus connection itself is gone.
fn is_disconnect(e: &zbus::Error) -> bool {
    matches!(e, zbus::Error::InputOutput(_))
}

async fn device_proxy(
    conn: &Connection,
    path: &OwnedObjectPath,
) -> zbus::Result<NMDeviceProxy<'static>> {
    NMDeviceProxy::builder(conn)
        .path(path.clone())?
        .cache_properties(CacheProperties::No)
        .build()
        .await
}

async fn wireless_proxy(
    conn: &Connection,
    path: &OwnedObjectPath,
) -> zbus::Result<NMWirelessProxy<'static>> {
    NMWirelessProxy::builder(conn)
        .path(path.clone())?
        .cache_properties(CacheProperties::No)
        .build()
        .await
}

async fn access_point_proxy(
    conn: &Connection,
    path: &OwnedObjectPath,
) -> zbus::Result<NMAccessPointProxy<'static>> {
    NMAccessPointProxy::builder(conn)
        .path(path.clone())?
        .cache_properties(CacheProperties::No)
        .build()
        .await
}

#[async_trait]
impl NetworkBus for SystemBus {
    async fn get_devices(&self) -> Result<Vec<OwnedObjectPath>> {
        self.call(|conn| async move { NMProxy::new(&conn).await?.get_all_devices().await })
            .await
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        self.call(|conn| async move { device_proxy(&conn, device).await?.device_type().await })
            .await
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        self.call(|conn| async move { wireless_proxy(&conn, device).await?.access_points().await })
            .await
    }

    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>> {
        self.call(|conn| async move { access_point_proxy(&conn, ap).await?.ssid().await })
            .await
    }

    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8> {
        self.call(|conn| async move { access_point_proxy(&conn, ap).await?.strength().await })
            .await
    }

    async fn access_point_wpa_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.call(|conn| async move { access_point_proxy(&conn, ap).await?.wpa_flags().await })
            .await
    }

    async fn access_point_rsn_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.call(|conn| async move { access_point_proxy(&conn, ap).await?.rsn_flags().await })
            .await
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        self.call(|conn| async move {
            wireless_proxy(&conn, device)
                .await?
                .request_scan(HashMap::new())
                .await
        })
        .await
    }

    async fn add_and_activate_connection(
        &self,
        profile: &ConnectionProfile,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<ActivationHandle> {
        let settings = profile.to_settings();
        let (connection, active_connection) = self
            .call(|conn| async move {
                NMProxy::new(&conn)
                    .await?
                    .add_and_activate_connection(settings, device, specific_object)
                    .await
            })
            .await?;

        Ok(ActivationHandle {
            connection,
            active_connection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn broken_pipe() -> zbus::Error {
        zbus::Error::InputOutput(Arc::new(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    async fn open_counted(slot: &ConnectionSlot<u32>, opens: &AtomicU32) -> (u32, u64) {
        slot.get_or_open(|| async { Ok(opens.fetch_add(1, Ordering::SeqCst) + 1) })
            .await
            .unwrap()
    }

    #[test]
    fn io_errors_count_as_disconnect() {
        assert!(is_disconnect(&broken_pipe()));
    }

    #[test]
    fn daemon_errors_do_not_count_as_disconnect() {
        assert!(!is_disconnect(&zbus::Error::Failure("no such object".into())));
    }

    #[tokio::test]
    async fn open_connection_is_reused() {
        let opens = AtomicU32::new(0);
        let slot = ConnectionSlot::new(None);

        let first = open_counted(&slot, &opens).await;
        let second = open_counted(&slot, &opens).await;
        assert_eq!(first, (1, 1));
        assert_eq!(second, first);
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disconnect_drops_connection_and_next_call_reopens() {
        let opens = AtomicU32::new(0);
        let slot = ConnectionSlot::new(None);

        let (_, generation) = open_counted(&slot, &opens).await;
        let failed: zbus::Result<()> = Err(broken_pipe());
        assert!(slot.settle(generation, &failed).await);

        let (conn, generation) = open_counted(&slot, &opens).await;
        assert_eq!(conn, 2);
        assert_eq!(generation, 2);
    }

    #[tokio::test]
    async fn daemon_failure_keeps_connection() {
        let opens = AtomicU32::new(0);
        let slot = ConnectionSlot::new(None);

        let (_, generation) = open_counted(&slot, &opens).await;
        let rejected: zbus::Result<()> = Err(zbus::Error::Failure("no such object".into()));
        assert!(!slot.settle(generation, &rejected).await);
        assert!(!slot.settle(generation, &Ok(())).await);

        open_counted(&slot, &opens).await;
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn late_failure_keeps_newer_connection() {
        let opens = AtomicU32::new(0);
        let slot = ConnectionSlot::new(None);

        // Calls A and B both start on the first connection.
        let (_, a) = open_counted(&slot, &opens).await;
        let (_, b) = open_counted(&slot, &opens).await;
        let failed: zbus::Result<()> = Err(broken_pipe());

        // B fails first and a third call reopens.
        assert!(slot.settle(b, &failed).await);
        let (fresh, _) = open_counted(&slot, &opens).await;

        // A's failure arrives late and must not drop the fresh connection.
        assert!(!slot.settle(a, &failed).await);
        let (conn, _) = open_counted(&slot, &opens).await;
        assert_eq!(conn, fresh);
        assert_eq!(opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_open_leaves_slot_empty() {
        let slot: ConnectionSlot<u32> = ConnectionSlot::new(None);
        let err = slot
            .get_or_open(|| async { Err(broken_pipe()) })
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ConnectionError::Dbus(_)));

        let opens = AtomicU32::new(0);
        assert_eq!(open_counted(&slot, &opens).await, (1, 1));
    }
}
