//! In-memory NetworkManager used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use zvariant::OwnedObjectPath;

use kiosk_net::builders::ConnectionProfile;
use kiosk_net::{ACCESS_POINT_PREFIX, ActivationHandle, ConnectionError, NetworkBus, Result};

pub const WIFI: u32 = 2;
pub const ETHERNET: u32 = 1;

pub fn path(s: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(s).unwrap()
}

pub fn device_path(n: u32) -> OwnedObjectPath {
    path(&format!("/org/freedesktop/NetworkManager/Devices/{n}"))
}

pub fn ap_path(id: &str) -> OwnedObjectPath {
    path(&format!("{ACCESS_POINT_PREFIX}{id}"))
}

#[derive(Debug, Clone)]
pub struct MockAp {
    pub path: OwnedObjectPath,
    pub ssid: Vec<u8>,
    pub strength: u8,
    pub wpa: u32,
    pub rsn: u32,
}

impl MockAp {
    pub fn new(id: &str, ssid: &str, strength: u8, wpa: u32, rsn: u32) -> Self {
        Self {
            path: ap_path(id),
            ssid: ssid.as_bytes().to_vec(),
            strength,
            wpa,
            rsn,
        }
    }
}

/// One recorded `AddAndActivateConnection` call.
#[derive(Debug, Clone)]
pub struct Activation {
    pub profile: ConnectionProfile,
    pub device: OwnedObjectPath,
    pub specific_object: OwnedObjectPath,
}

#[derive(Debug, Default)]
pub struct MockBus {
    pub devices: Vec<(OwnedObjectPath, u32)>,
    pub aps: Vec<MockAp>,
    /// Fail `GetAllDevices`.
    pub fail_devices: bool,
    /// Fail the SSID read of the access point with this path.
    pub fail_ssid_of: Option<OwnedObjectPath>,
    /// Never answer the named call.
    pub hang: Option<&'static str>,
    /// Reject `AddAndActivateConnection`.
    pub reject_activation: bool,
    pub activations: Mutex<Vec<Activation>>,
    pub scan_requests: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, n: u32, device_type: u32) -> Self {
        self.devices.push((device_path(n), device_type));
        self
    }

    pub fn with_ap(mut self, ap: MockAp) -> Self {
        self.aps.push(ap);
        self
    }

    pub fn activations(&self) -> Vec<Activation> {
        self.activations.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, method: &'static str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang == Some(method) {
            std::future::pending::<()>().await;
        }
    }

    fn ap(&self, path: &OwnedObjectPath) -> Result<&MockAp> {
        self.aps
            .iter()
            .find(|ap| &ap.path == path)
            .ok_or_else(|| failure(&format!("unknown access point {}", path.as_str())))
    }
}

pub fn failure(msg: &str) -> ConnectionError {
    ConnectionError::Dbus(zbus::Error::Failure(msg.into()))
}

#[async_trait]
impl NetworkBus for MockBus {
    async fn get_devices(&self) -> Result<Vec<OwnedObjectPath>> {
        self.enter("GetAllDevices").await;
        if self.fail_devices {
            return Err(failure("daemon not running"));
        }
        Ok(self.devices.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        self.enter("DeviceType").await;
        self.devices
            .iter()
            .find(|(p, _)| p == device)
            .map(|(_, t)| *t)
            .ok_or_else(|| failure("unknown device"))
    }

    async fn access_points(&self, _device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        self.enter("AccessPoints").await;
        Ok(self.aps.iter().map(|ap| ap.path.clone()).collect())
    }

    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>> {
        self.enter("Ssid").await;
        if self.fail_ssid_of.as_ref() == Some(ap) {
            return Err(failure("access point vanished"));
        }
        Ok(self.ap(ap)?.ssid.clone())
    }

    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8> {
        self.enter("Strength").await;
        Ok(self.ap(ap)?.strength)
    }

    async fn access_point_wpa_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.enter("WpaFlags").await;
        Ok(self.ap(ap)?.wpa)
    }

    async fn access_point_rsn_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.enter("RsnFlags").await;
        Ok(self.ap(ap)?.rsn)
    }

    async fn request_scan(&self, _device: &OwnedObjectPath) -> Result<()> {
        self.enter("RequestScan").await;
        self.scan_requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_and_activate_connection(
        &self,
        profile: &ConnectionProfile,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<ActivationHandle> {
        self.enter("AddAndActivateConnection").await;
        if self.reject_activation {
            return Err(failure("access point unknown"));
        }

        let mut activations = self.activations.lock().unwrap();
        activations.push(Activation {
            profile: profile.clone(),
            device: device.clone(),
            specific_object: specific_object.clone(),
        });
        let n = activations.len();

        Ok(ActivationHandle {
            connection: path(&format!("/org/freedesktop/NetworkManager/Settings/{n}")),
            active_connection: path(&format!("/org/freedesktop/NetworkManager/ActiveConnection/{n}")),
        })
    }
}

/// Wraps a [`MockBus`] so every per-device and per-access-point property
/// read takes `delay` before answering.
pub struct SlowBus {
    pub inner: MockBus,
    pub delay: std::time::Duration,
}

impl SlowBus {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl NetworkBus for SlowBus {
    async fn get_devices(&self) -> Result<Vec<OwnedObjectPath>> {
        self.inner.get_devices().await
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        self.pause().await;
        self.inner.device_type(device).await
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        self.inner.access_points(device).await
    }

    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>> {
        self.pause().await;
        self.inner.access_point_ssid(ap).await
    }

    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8> {
        self.pause().await;
        self.inner.access_point_strength(ap).await
    }

    async fn access_point_wpa_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.pause().await;
        self.inner.access_point_wpa_flags(ap).await
    }

    async fn access_point_rsn_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.pause().await;
        self.inner.access_point_rsn_flags(ap).await
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        self.inner.request_scan(device).await
    }

    async fn add_and_activate_connection(
        &self,
        profile: &ConnectionProfile,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<ActivationHandle> {
        self.inner
            .add_and_activate_connection(profile, device, specific_object)
            .await
    }
}
