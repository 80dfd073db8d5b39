//! Queue number format: `ANTRIAN-` + number zero-padded to 3 digits

pub const QUEUE_PREFIX: &str = "ANTRIAN-";

/// `1` -> `ANTRIAN-001`, `1000` -> `ANTRIAN-1000`
pub fn format_queue_number(number: u64) -> String {
    format!("{}{:03}", QUEUE_PREFIX, number)
}

/// Numeric suffix of a queue number, `None` if malformed
pub fn parse_queue_number(queue_number: &str) -> Option<u64> {
    let digits = queue_number.strip_prefix(QUEUE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
