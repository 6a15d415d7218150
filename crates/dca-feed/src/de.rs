use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Transform a `unix timestamp` into the exchange-local calendar date, e.g.
/// `1577833200` with a Frankfurt offset of `3600` is `2020-01-01`, not the UTC
/// date `2019-12-31`.
pub fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    let local = timestamp.checked_add(gmtoffset)?;
    DateTime::from_timestamp(local, 0).map(|datetime| datetime.date_naive())
}

/// Vendors disagree on whether a datetime carries a time of day:
///
/// ```text
/// 2024-01-05
/// 2024-01-05 15:30:00
/// ```
///
/// `date_prefix` keeps the calendar date of both.
pub fn date_prefix<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: String = Deserialize::deserialize(deserializer)?;
    let date = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// Prices sometimes arrive as strings ("123.45"), sometimes as numbers, and
/// sometimes as junk. Junk becomes `None` rather than failing the whole
/// payload.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(num) => num.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "date_prefix")]
        datetime: NaiveDate,
        #[serde(default, deserialize_with = "lenient_f64")]
        close: Option<f64>,
    }

    #[test]
    fn timestamps_take_the_exchange_offset() {
        // New York midnight, Frankfurt midnight, Tokyo midnight on 2020-01-01
        assert_eq!(local_date(1577854800, -18000), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(local_date(1577833200, 3600), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(local_date(1577804400, 32400), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(local_date(1577836800, 0), NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn out_of_range_timestamp_is_none() {
        assert_eq!(local_date(i64::MAX, 3600), None);
        assert_eq!(local_date(i64::MAX - 10, 0), None);
    }

    #[test]
    fn rows_with_and_without_time() {
        let row: Row =
            serde_json::from_str(r#"{"datetime":"2024-01-05 15:30:00","close":"10.5"}"#).unwrap();
        assert_eq!(row.datetime, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(row.close, Some(10.5));

        let row: Row = serde_json::from_str(r#"{"datetime":"2024-01-05","close":7}"#).unwrap();
        assert_eq!(row.close, Some(7.0));
    }

    #[test]
    fn junk_prices_become_none() {
        for close in [r#""n/a""#, "null", "[]", r#""""#] {
            let row: Row =
                serde_json::from_str(&format!(r#"{{"datetime":"2024-01-05","close":{close}}}"#))
                    .unwrap();
            assert_eq!(row.close, None, "{close}");
        }
    }
}
