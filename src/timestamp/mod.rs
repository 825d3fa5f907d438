use regex::Regex;

/// Validate client-supplied timestamps using the regex
/// `^[0-9][0-9TZ:+.\-]{0,127}$`
///
/// Accepts both the ISO-8601 form the frontend sends
/// (`2024-01-01T12:00:00.000Z`) and the compact form (`20240101120000`).
/// Slashes, dot-dot segments and empty strings never reach a blob name.
pub fn is_timestamp_valid(timestamp: &str) -> bool {
    let regex = Regex::new(r"^[0-9][0-9TZ:+.\-]{0,127}$").unwrap();
    regex.is_match(timestamp)
}
