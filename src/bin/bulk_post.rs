use clap::Parser;
use http_probe::bulk_post::{BulkPostProbe, DEFAULT_BODY_SIZE, DEFAULT_CGI_PATH};
use http_probe::probe_config::{ProbeConfigBuilder, BULK_POST_HOST, BULK_POST_PORT};
use std::path::PathBuf;
use std::process::ExitCode;

/// Sends a large POST body to a CGI endpoint and streams the response back.
#[derive(Parser)]
struct Args {
    #[arg(long, default_value = BULK_POST_HOST)]
    host: String,

    #[arg(short, long, default_value_t = BULK_POST_PORT)]
    port: u16,

    #[arg(long, default_value = DEFAULT_CGI_PATH)]
    path: String,

    /// Body size in bytes, filled with ASCII '0'.
    #[arg(long, default_value_t = DEFAULT_BODY_SIZE)]
    body_size: usize,

    /// Send this file as the body instead.
    #[arg(long, conflicts_with = "body_size")]
    body_file: Option<PathBuf>,

    #[arg(long)]
    content_type: Option<String>,

    /// PEM bundle of trusted CAs; enables TLS.
    #[arg(long)]
    ca_cert: Option<String>,
}

fn main() -> ExitCode {
    http_probe::logging::init();
    let args = Args::parse();

    let mut config = ProbeConfigBuilder::new().host(&args.host).port(args.port);
    if let Some(ca_cert) = &args.ca_cert {
        config = config.tls(true).ca_cert_path(ca_cert);
    }

    let mut probe = BulkPostProbe::new(config.get())
        .path(&args.path)
        .body_size(args.body_size);
    if let Some(body_file) = args.body_file {
        probe = probe.body_file(body_file);
    }
    if let Some(content_type) = &args.content_type {
        probe = probe.content_type(content_type);
    }

    match probe.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("bulk post probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}
