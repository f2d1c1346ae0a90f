use kiosk_net::NetworkManager;

#[tokio::main]
async fn main() -> kiosk_net::Result<()> {
    let nm = NetworkManager::start().await;

    let Some(adapter) = nm.active_adapter() else {
        println!("No Wi-Fi adapter found");
        return Ok(());
    };
    println!("Scanning on {}...", adapter.path.as_str());
    nm.request_scan().await?;

    let aps = nm.scan_wifi_access_points().await?;
    for ap in aps {
        let lock = if ap.secure { "secure" } else { "open" };
        println!("{:>4} {:30} {:>3}% {lock}", ap.id, ap.ssid, ap.strength);
    }

    Ok(())
}
