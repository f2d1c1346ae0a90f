fn main() -> anyhow::Result<()> {
    kiosk_netctl::run()
}
