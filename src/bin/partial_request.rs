use clap::Parser;
use http_probe::partial_request::{PartialRequestProbe, SendMode, DEFAULT_CGI_PATH};
use http_probe::probe_config::{ProbeConfigBuilder, PARTIAL_REQUEST_HOST, PARTIAL_REQUEST_PORT};
use std::process::ExitCode;
use std::time::Duration;

/// Sends an incomplete GET request head and leaves without reading.
#[derive(Parser)]
struct Args {
    #[arg(long, default_value = PARTIAL_REQUEST_HOST)]
    host: String,

    #[arg(short, long, default_value_t = PARTIAL_REQUEST_PORT)]
    port: u16,

    #[arg(long, default_value = DEFAULT_CGI_PATH)]
    path: String,

    /// Send the head one byte at a time, waiting this many milliseconds
    /// between bytes.
    #[arg(long)]
    trickle_ms: Option<u64>,

    /// Keep the socket open this many seconds after the last write.
    #[arg(long)]
    hold_secs: Option<u64>,
}

fn main() -> ExitCode {
    http_probe::logging::init();
    let args = Args::parse();

    let config = ProbeConfigBuilder::new()
        .host(&args.host)
        .port(args.port)
        .get();

    let mut probe = PartialRequestProbe::new(config).path(&args.path);
    if let Some(ms) = args.trickle_ms {
        probe = probe.mode(SendMode::Trickle {
            delay: Duration::from_millis(ms),
        });
    }
    if let Some(secs) = args.hold_secs {
        probe = probe.hold_open(Duration::from_secs(secs));
    }

    match probe.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("partial request probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}
