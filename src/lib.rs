mod header;
mod token;
mod utils;

pub mod bulk_post;
pub mod connection;
pub mod error;
pub mod http_version;
pub mod logging;
pub mod partial_request;
pub mod probe_config;
pub mod request;
pub mod request_method;
pub mod response_head;
pub mod response_reader;

pub use error::{ProbeError, Result};
pub use utils::format_kib;

#[cfg(test)]
mod test;
