/// Byte count expressed in KiB, as shown in probe output.
pub fn kib(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

pub fn format_kib(bytes: usize) -> String {
    format!("{:.1} KB", kib(bytes))
}
