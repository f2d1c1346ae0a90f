/// Example demonstrating custom timeout configuration for bus calls.
///
/// This shows how to allow more time for activation on hardware where
/// NetworkManager is slow to accept requests.
use kiosk_net::{ConnectionRequest, NetworkManager, TimeoutConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> kiosk_net::Result<()> {
    // Short deadline for property reads, long one for activation
    let config = TimeoutConfig::new()
        .with_rpc_timeout(Duration::from_secs(2))
        .with_connect_timeout(Duration::from_secs(30));

    let nm = NetworkManager::start_with_config(config).await;

    println!("NetworkManager configured with custom timeouts:");
    println!("  RPC timeout: {:?}", nm.timeout_config().rpc_timeout);
    println!("  Connect timeout: {:?}", nm.timeout_config().connect_timeout);

    let aps = nm.scan_wifi_access_points().await?;
    let Some(ap) = aps.iter().find(|ap| ap.ssid == "MyNetwork") else {
        println!("MyNetwork is not in range");
        return Ok(());
    };

    println!("\nConnecting to {}...", ap.ssid);
    let request = if ap.secure {
        let password =
            std::env::var("WIFI_PASSWORD").unwrap_or_else(|_| "password".to_string());
        ConnectionRequest::secured(&ap.id, &ap.ssid, password)
    } else {
        ConnectionRequest::open(&ap.id, &ap.ssid)
    };
    let handle = nm.connect_to_wifi_access_point(&request).await?;

    println!("Activation accepted: {handle}");

    Ok(())
}
