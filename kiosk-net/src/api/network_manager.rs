use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::Result;
use crate::api::models::{
    AccessPointRecord, ActivationHandle, Adapter, ConnectionRequest, TimeoutConfig,
};
use crate::core::connection::{connect, create_hotspot};
use crate::core::device::discover_wireless_adapter;
use crate::core::scan::{request_scan, scan_access_points};
use crate::dbus::{NetworkBus, SystemBus};

/// High-level interface to the kiosk's Wi-Fi hardware.
///
/// This is the main entry point of the crate. Starting a manager discovers
/// the first wireless adapter known to NetworkManager; every later operation
/// targets that adapter.
///
/// # Creating an Instance
///
/// ```no_run
/// use kiosk_net::NetworkManager;
///
/// # async fn example() {
/// let nm = NetworkManager::start().await;
/// if nm.active_adapter().is_none() {
///     println!("No Wi-Fi hardware");
/// }
/// # }
/// ```
///
/// Starting never fails. Without a reachable daemon or without Wi-Fi
/// hardware the manager simply has no adapter: scans return an empty list
/// and connection requests fail with [`ConnectionError::NoWifiDevice`].
///
/// # Examples
///
/// ## Scan and Connect
///
/// ```no_run
/// use kiosk_net::{ConnectionRequest, NetworkManager};
///
/// # async fn example() -> kiosk_net::Result<()> {
/// let nm = NetworkManager::start().await;
///
/// let aps = nm.scan_wifi_access_points().await?;
/// for ap in &aps {
///     println!("{} {} {}% secure={}", ap.id, ap.ssid, ap.strength, ap.secure);
/// }
///
/// if let Some(ap) = aps.iter().find(|ap| ap.ssid == "HomeNet") {
///     let request = ConnectionRequest::secured(&ap.id, &ap.ssid, "sharedsecret");
///     nm.connect_to_wifi_access_point(&request).await?;
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Setup Hotspot
///
/// ```no_run
/// use kiosk_net::NetworkManager;
///
/// # async fn example() -> kiosk_net::Result<()> {
/// let nm = NetworkManager::start().await;
/// nm.create_wifi_access_point("Kiosk Setup", Some("kiosk-setup")).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `NetworkManager` is `Clone` and can be shared across async tasks. Clones
/// share the same bus connection and the same adapter.
///
/// [`ConnectionError::NoWifiDevice`]: crate::ConnectionError::NoWifiDevice
#[derive(Clone)]
pub struct NetworkManager {
    bus: Arc<dyn NetworkBus>,
    adapter: Option<Adapter>,
    timeouts: TimeoutConfig,
}

impl fmt::Debug for NetworkManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkManager")
            .field("adapter", &self.adapter)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl NetworkManager {
    /// Connects to the system bus and discovers the Wi-Fi adapter, using
    /// default timeouts.
    pub async fn start() -> Self {
        Self::start_with_config(TimeoutConfig::default()).await
    }

    /// Connects to the system bus and discovers the Wi-Fi adapter.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kiosk_net::{NetworkManager, TimeoutConfig};
    /// use std::time::Duration;
    ///
    /// # async fn example() {
    /// let config = TimeoutConfig::new()
    ///     .with_rpc_timeout(Duration::from_secs(2))
    ///     .with_connect_timeout(Duration::from_secs(30));
    ///
    /// let nm = NetworkManager::start_with_config(config).await;
    /// # }
    /// ```
    pub async fn start_with_config(config: TimeoutConfig) -> Self {
        let bus = match SystemBus::connect().await {
            Ok(bus) => bus,
            Err(e) => {
                warn!("System bus unavailable, Wi-Fi disabled: {e}");
                return Self {
                    bus: Arc::new(SystemBus::disconnected()),
                    adapter: None,
                    timeouts: config,
                };
            }
        };

        Self::with_bus(Arc::new(bus), config).await
    }

    /// Builds a manager on top of an existing [`NetworkBus`].
    ///
    /// Adapter discovery runs once here. A discovery failure is logged and
    /// leaves the manager without an adapter.
    pub async fn with_bus(bus: Arc<dyn NetworkBus>, config: TimeoutConfig) -> Self {
        let adapter = match discover_wireless_adapter(bus.as_ref(), &config).await {
            Ok(adapter) => adapter,
            Err(e) => {
                warn!("Wi-Fi adapter discovery failed: {e}");
                None
            }
        };

        Self {
            bus,
            adapter,
            timeouts: config,
        }
    }

    /// Returns the adapter chosen at start, if any.
    pub fn active_adapter(&self) -> Option<&Adapter> {
        self.adapter.as_ref()
    }

    /// Returns the timeouts this manager applies to bus calls.
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Lists the access points visible on the active adapter.
    ///
    /// Returns an empty list when there is no adapter. The list is in the
    /// daemon's order and may contain several records with the same SSID.
    ///
    /// # Errors
    ///
    /// Fails with [`ConnectionError::ScanFailed`] if any property read fails
    /// or times out; partial results are never returned.
    ///
    /// [`ConnectionError::ScanFailed`]: crate::ConnectionError::ScanFailed
    pub async fn scan_wifi_access_points(&self) -> Result<Vec<AccessPointRecord>> {
        scan_access_points(self.bus.as_ref(), self.adapter.as_ref(), &self.timeouts).await
    }

    /// Asks NetworkManager to refresh its access point list.
    ///
    /// The daemon scans in the background; call
    /// [`scan_wifi_access_points`](Self::scan_wifi_access_points) afterwards
    /// to read the result. Does nothing when there is no adapter.
    pub async fn request_scan(&self) -> Result<()> {
        request_scan(self.bus.as_ref(), self.adapter.as_ref(), &self.timeouts).await
    }

    /// Requests a connection to a previously scanned access point.
    ///
    /// Resolves once NetworkManager accepts the request. Association and
    /// authentication continue in the daemon; a wrong password is not
    /// reported here.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::MissingPassword`] for a secure request without a password
    /// - [`ConnectionError::InvalidSsid`] for an empty or over-long SSID
    /// - [`ConnectionError::NoWifiDevice`] when there is no adapter
    /// - [`ConnectionError::Dbus`] or [`ConnectionError::Timeout`] when the daemon rejects
    ///   or does not answer the request
    ///
    /// [`ConnectionError::MissingPassword`]: crate::ConnectionError::MissingPassword
    /// [`ConnectionError::InvalidSsid`]: crate::ConnectionError::InvalidSsid
    /// [`ConnectionError::NoWifiDevice`]: crate::ConnectionError::NoWifiDevice
    /// [`ConnectionError::Dbus`]: crate::ConnectionError::Dbus
    /// [`ConnectionError::Timeout`]: crate::ConnectionError::Timeout
    pub async fn connect_to_wifi_access_point(
        &self,
        request: &ConnectionRequest,
    ) -> Result<ActivationHandle> {
        connect(
            self.bus.as_ref(),
            self.adapter.as_ref(),
            request,
            &self.timeouts,
        )
        .await
    }

    /// Hosts a Wi-Fi access point on the active adapter.
    ///
    /// The hotspot shares this device's IPv4 connectivity. With a password it
    /// uses WPA2-PSK; the password must be 8 to 63 characters.
    pub async fn create_wifi_access_point(
        &self,
        ssid: &str,
        password: Option<&str>,
    ) -> Result<ActivationHandle> {
        create_hotspot(
            self.bus.as_ref(),
            self.adapter.as_ref(),
            ssid,
            password,
            &self.timeouts,
        )
        .await
    }
}
