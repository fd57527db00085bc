use chrono::NaiveDateTime;

use crate::sentiment::Sentiment;

/// `created_at` layout: UTC, ISO-8601, microsecond precision, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A row in the `reviews` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub id: i64,
    pub text: String,
    pub sentiment: Sentiment,
    /// Server-side insertion time, always UTC.
    pub created_at: NaiveDateTime,
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn timestamp_has_no_offset_suffix() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_micro_opt(7, 8, 9, 42)
            .unwrap();
        let s = format_timestamp(ts);
        assert_eq!(s, "2024-03-05T07:08:09.000042");
        assert_eq!(s.parse::<NaiveDateTime>().unwrap(), ts);
    }
}
