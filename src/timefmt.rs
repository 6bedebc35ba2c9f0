use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Canonical storage format for timestamps, matching sqlite's
/// strftime('%Y-%m-%dT%H:%M:%S','now') defaults in the schema.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current UTC time in the canonical storage format.
pub fn now() -> String {
    Utc::now().format(CANONICAL_FORMAT).to_string()
}

/// Coerce a stored timestamp to the canonical format.
///
/// Legacy rows may carry RFC 3339 strings, space-separated datetimes, bare
/// dates, or epoch seconds/milliseconds. Unparseable values yield None
/// rather than an error so listing never fails on malformed dates.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, CANONICAL_FORMAT) {
        return Some(dt.format(CANONICAL_FORMAT).to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().format(CANONICAL_FORMAT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.format(CANONICAL_FORMAT).to_string());
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.format(CANONICAL_FORMAT).to_string());
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = trimmed.parse::<i64>() {
            // Heuristic: values past the year ~33658 as seconds are millis.
            let secs = if n > 1_000_000_000_000 { n / 1000 } else { n };
            return DateTime::<Utc>::from_timestamp(secs, 0)
                .map(|dt| dt.naive_utc().format(CANONICAL_FORMAT).to_string());
        }
    }
    None
}

/// Normalize an optional stored timestamp, treating NULL as missing.
pub fn normalize_opt(raw: Option<String>) -> Option<String> {
    raw.as_deref().and_then(normalize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_canonical() {
        assert_eq!(
            normalize("2024-03-01T10:20:30").as_deref(),
            Some("2024-03-01T10:20:30")
        );
    }

    #[test]
    fn normalize_accepts_rfc3339() {
        assert_eq!(
            normalize("2024-03-01T10:20:30+00:00").as_deref(),
            Some("2024-03-01T10:20:30")
        );
    }

    #[test]
    fn normalize_accepts_space_separated_and_bare_date() {
        assert_eq!(
            normalize("2024-03-01 10:20:30").as_deref(),
            Some("2024-03-01T10:20:30")
        );
        assert_eq!(
            normalize("2024-03-01").as_deref(),
            Some("2024-03-01T00:00:00")
        );
    }

    #[test]
    fn normalize_accepts_epoch_millis() {
        assert_eq!(
            normalize("1709288430000").as_deref(),
            Some("2024-03-01T10:20:30")
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert_eq!(normalize("not a date"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize_opt(None), None);
    }
}
