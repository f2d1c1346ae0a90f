use std::io::Read;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::debug;

use kiosk_net::{ActivationHandle, ConnectionRequest, NetworkManager, TimeoutConfig};

/// SSID used for the setup hotspot when none is given.
const DEFAULT_HOTSPOT_SSID: &str = "Krellian Kiosk";

#[derive(Parser, Debug)]
#[command(name = "kiosk-netctl")]
#[command(version, about = "Wi-Fi setup for kiosk devices")]
struct Args {
    /// Deadline for each property read, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    rpc_timeout_ms: Option<u64>,

    /// Deadline for activation requests, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    connect_timeout_ms: Option<u64>,

    /// Log bus calls to stderr.
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print visible access points as JSON.
    Scan {
        /// Ask the daemon for a fresh scan first.
        #[arg(long)]
        rescan: bool,
    },
    /// Ask the daemon to refresh its access point list.
    Rescan,
    /// Print the Wi-Fi adapter in use.
    Adapter,
    /// Connect to a scanned access point.
    Connect {
        /// Request body as JSON, or `-` to read it from stdin.
        #[arg(long, conflicts_with_all = ["id", "ssid", "secure", "password"])]
        json: Option<String>,

        /// Access point id from `scan`.
        #[arg(long, required_unless_present = "json")]
        id: Option<String>,

        #[arg(long, required_unless_present = "json")]
        ssid: Option<String>,

        #[arg(long)]
        secure: bool,

        #[arg(long)]
        password: Option<String>,
    },
    /// Host a setup hotspot.
    Hotspot {
        #[arg(long, default_value = DEFAULT_HOTSPOT_SSID)]
        ssid: String,

        /// WPA2 passphrase; the hotspot is open without one.
        #[arg(long)]
        password: Option<String>,
    },
}

impl Args {
    fn timeout_config(&self) -> TimeoutConfig {
        let mut config = TimeoutConfig::default();
        if let Some(ms) = self.rpc_timeout_ms {
            config = config.with_rpc_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.connect_timeout_ms {
            config = config.with_connect_timeout(Duration::from_millis(ms));
        }
        config
    }
}

/// Turns the `connect` arguments into a request.
fn connection_request(
    json: Option<&str>,
    id: Option<&str>,
    ssid: Option<&str>,
    secure: bool,
    password: Option<&str>,
) -> anyhow::Result<ConnectionRequest> {
    if let Some(json) = json {
        let body = if json == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        } else {
            json.to_string()
        };
        return serde_json::from_str(&body).context("parsing connection request");
    }

    let (Some(id), Some(ssid)) = (id, ssid) else {
        bail!("--id and --ssid are required without --json");
    };

    Ok(ConnectionRequest {
        id: id.to_string(),
        ssid: ssid.to_string(),
        secure,
        password: password.map(str::to_string),
    })
}

fn print_handle(handle: &ActivationHandle) -> anyhow::Result<()> {
    let out = serde_json::json!({
        "connection": handle.connection.as_str(),
        "active_connection": handle.active_connection.as_str(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn execute(args: Args) -> anyhow::Result<()> {
    let config = args.timeout_config();
    debug!("Starting with {config:?}");
    let nm = NetworkManager::start_with_config(config).await;

    match args.command {
        Command::Scan { rescan } => {
            if rescan {
                nm.request_scan().await?;
            }
            let aps = nm.scan_wifi_access_points().await?;
            println!("{}", serde_json::to_string_pretty(&aps)?);
        }
        Command::Rescan => nm.request_scan().await?,
        Command::Adapter => match nm.active_adapter() {
            Some(adapter) => println!("{} ({})", adapter.path.as_str(), adapter.device_type),
            None => bail!("no Wi-Fi adapter found"),
        },
        Command::Connect {
            json,
            id,
            ssid,
            secure,
            password,
        } => {
            let request = connection_request(
                json.as_deref(),
                id.as_deref(),
                ssid.as_deref(),
                secure,
                password.as_deref(),
            )?;
            let handle = nm
                .connect_to_wifi_access_point(&request)
                .await
                .with_context(|| format!("connecting to '{}'", request.ssid))?;
            print_handle(&handle)?;
        }
        Command::Hotspot { ssid, password } => {
            let handle = nm
                .create_wifi_access_point(&ssid, password.as_deref())
                .await
                .with_context(|| format!("starting hotspot '{ssid}'"))?;
            print_handle(&handle)?;
        }
    }

    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(execute(args))
}
