use crate::error::{ProbeError, Result};
use std::fs;
use std::io::BufReader;
use std::time::Duration;

pub const BULK_POST_HOST: &str = "127.0.0.1";
pub const BULK_POST_PORT: u16 = 8001;
pub const PARTIAL_REQUEST_HOST: &str = "127.0.0.2";
pub const PARTIAL_REQUEST_PORT: u16 = 8004;

/// Where a probe connects and how the socket is set up.
///
/// No timeouts are set by default: a peer that neither answers nor closes
/// keeps the probe blocked, which is usually what you want to observe.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub ca_cert_path: Option<String>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            host: String::from(BULK_POST_HOST),
            port: BULK_POST_PORT,
            tls: false,
            ca_cert_path: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ProbeConfig {
    pub fn bulk_post_default() -> Self {
        ProbeConfig::default()
    }

    pub fn partial_request_default() -> Self {
        ProbeConfig {
            host: String::from(PARTIAL_REQUEST_HOST),
            port: PARTIAL_REQUEST_PORT,
            ..Default::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn load_root_store(&self) -> Result<rustls::RootCertStore> {
        let Some(ca_cert_path) = &self.ca_cert_path else {
            return Err(ProbeError::CaCertificates(
                "tls requested but no CA certificate path configured".into(),
            ));
        };

        let ca_file = fs::File::open(ca_cert_path)
            .map_err(|err| ProbeError::CaCertificates(format!("{ca_cert_path}: {err}")))?;
        let mut reader = BufReader::new(ca_file);
        let certs = rustls_pemfile::certs(&mut reader)
            .map_err(|err| ProbeError::CaCertificates(format!("{ca_cert_path}: {err}")))?;

        let mut root_store = rustls::RootCertStore::empty();
        let (added, ignored) = root_store.add_parsable_certificates(&certs);
        log::debug!("loaded {added} CA certificate(s) from {ca_cert_path}, ignored {ignored}");

        if added == 0 {
            return Err(ProbeError::CaCertificates(format!(
                "{ca_cert_path}: no usable certificates"
            )));
        }

        Ok(root_store)
    }
}

pub struct ProbeConfigBuilder {
    probe_config: ProbeConfig,
}

#[allow(clippy::new_without_default)]
impl ProbeConfigBuilder {
    pub fn new() -> Self {
        ProbeConfigBuilder {
            probe_config: ProbeConfig::default(),
        }
    }

    pub fn from_config(probe_config: ProbeConfig) -> Self {
        ProbeConfigBuilder { probe_config }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.probe_config.host = host.to_string();

        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.probe_config.port = port;

        self
    }

    pub fn tls(mut self, tls: bool) -> Self {
        self.probe_config.tls = tls;

        self
    }

    pub fn ca_cert_path(mut self, ca_cert_path: &str) -> Self {
        self.probe_config.ca_cert_path = Some(ca_cert_path.to_string());

        self
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.probe_config.read_timeout = Some(read_timeout);

        self
    }

    pub fn write_timeout(mut self, write_timeout: Duration) -> Self {
        self.probe_config.write_timeout = Some(write_timeout);

        self
    }

    pub fn get(self) -> ProbeConfig {
        self.probe_config
    }
}
