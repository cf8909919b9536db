use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Normalize a date-valued argument to `YYYY-MM-DD`.
///
/// Agent clients routinely hand over full datetimes where the API expects a
/// calendar date. A string with a time component is truncated to its date
/// portion; a plain date is canonicalized. Anything that does not parse is
/// returned unchanged so the API's own validation produces the error.
pub fn normalize_date(value: &str) -> String {
    let s = value.trim();
    if s.is_empty() {
        return value.to_string();
    }

    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return dt.date_naive().to_string();
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return dt.date().to_string();
        }
        return value.to_string();
    }

    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => date.to_string(),
        Err(_) => value.to_string(),
    }
}

/// Normalize a named date field of a JSON argument object in place.
/// Non-string values are left alone.
pub fn normalize_date_field(args: &mut serde_json::Map<String, Value>, field: &str) {
    if let Some(Value::String(s)) = args.get(field) {
        let normalized = normalize_date(s);
        args.insert(field.to_string(), Value::String(normalized));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_date_passes_through() {
        assert_eq!(normalize_date("2024-03-01"), "2024-03-01");
    }

    #[test]
    fn datetime_is_truncated_to_date() {
        assert_eq!(normalize_date("2024-03-01T10:30:00"), "2024-03-01");
        assert_eq!(normalize_date("2024-03-01T10:30:00.250"), "2024-03-01");
    }

    #[test]
    fn datetime_with_zone_is_truncated_to_date() {
        assert_eq!(normalize_date("2024-03-01T23:59:59Z"), "2024-03-01");
        assert_eq!(normalize_date("2024-03-01T23:59:59+00:00"), "2024-03-01");
        assert_eq!(normalize_date("2024-03-01T01:00:00-03:00"), "2024-03-01");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_date("  2024-03-01T10:30:00Z "), "2024-03-01");
    }

    #[test]
    fn malformed_input_passes_through_unchanged() {
        assert_eq!(normalize_date("not-a-date"), "not-a-date");
        assert_eq!(normalize_date("2024-13-45"), "2024-13-45");
        assert_eq!(normalize_date("2024-03-01Tjunk"), "2024-03-01Tjunk");
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("   "), "   ");
    }

    #[test]
    fn object_field_is_normalized_in_place() {
        let mut args = serde_json::Map::new();
        args.insert(
            "hired_on".to_string(),
            Value::String("2024-03-01T08:00:00Z".into()),
        );
        args.insert("salary_cents".to_string(), Value::from(750_000));

        normalize_date_field(&mut args, "hired_on");
        normalize_date_field(&mut args, "missing");

        assert_eq!(args["hired_on"], Value::String("2024-03-01".into()));
        assert_eq!(args["salary_cents"], Value::from(750_000));
    }
}
