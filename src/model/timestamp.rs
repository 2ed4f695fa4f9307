use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS+HH:MM`, offset-less date-times (read as UTC),
/// bare dates and epoch seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(datetime) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(datetime.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|datetime| datetime.and_utc());
    }
    let seconds = value.parse::<f64>().ok().filter(|seconds| seconds.is_finite())?;
    DateTime::from_timestamp_micros((seconds * 1e6).round() as i64)
}

/// `parse_timestamp`, then the leading `YYYY-MM-DD` of whatever follows it.
fn parse_lenient(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value).or_else(|| {
        let date = value.trim().get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)
            .map(|datetime| datetime.and_utc())
    })
}

pub fn deserialize_lenient<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_lenient(&value).ok_or_else(|| de::Error::custom(format!("not a timestamp: {}", value)))
}

pub fn deserialize_lenient_option<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            parse_lenient(&value).ok_or_else(|| de::Error::custom(format!("not a timestamp: {}", value)))
        })
        .transpose()
}
