use chrono::Local;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Current local time as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// First `max_length` characters of `text` followed by `...`, or `text` unchanged if it fits
pub fn truncate_text(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// True when `size_bytes` is at most `max_size_mb` megabytes
pub fn validate_file_size(size_bytes: usize, max_size_mb: u64) -> bool {
    size_bytes as f64 / BYTES_PER_MB <= max_size_mb as f64
}
