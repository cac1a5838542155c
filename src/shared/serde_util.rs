//! Custom serde helpers for backend wire formats.

/// Deserializes a JSON number or numeric string into a `Decimal`.
///
/// The backend emits prices as JSON floats (`150.0`, `151.25`). They are read
/// through `serde_json::Number`'s shortest round-trip text, so `151.25` becomes
/// exactly `151.25` rather than the nearest binary float.
pub mod decimal_number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(serde_json::Number),
        Str(String),
    }

    pub(crate) fn parse(s: &str) -> Result<Decimal, String> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|e| format!("Invalid decimal {:?}: {}", s, e))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Num(n) => parse(&n.to_string()),
            Raw::Str(s) => parse(s.trim()),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Like [`decimal_number`], for nullable fields. `null` and absent both map to `None`.
pub mod option_decimal_number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(serde_json::Number),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Num(n)) => super::decimal_number::parse(&n.to_string())
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(Raw::Str(s)) => super::decimal_number::parse(s.trim())
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Deserializes an ISO-8601 string or a Unix epoch number into `DateTime<Utc>`.
///
/// Accepted forms:
/// - RFC 3339 with offset (`2024-01-01T10:00:00Z`)
/// - naive ISO-8601 (`2024-01-01T10:00:00.123456`), read as UTC
/// - epoch seconds, or epoch milliseconds when the magnitude exceeds 10^11
pub mod flexible_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(serde_json::Number),
        Str(String),
    }

    /// Seconds below this magnitude, milliseconds above (10^11 s is year ~5138).
    const MILLIS_THRESHOLD: f64 = 1e11;

    pub(crate) fn parse_str(s: &str) -> Result<DateTime<Utc>, String> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(naive.and_utc());
        }
        match s.parse::<f64>() {
            Ok(epoch) => from_epoch(epoch),
            Err(_) => Err(format!("Invalid timestamp: {:?}", s)),
        }
    }

    pub(crate) fn from_epoch(epoch: f64) -> Result<DateTime<Utc>, String> {
        if !epoch.is_finite() {
            return Err(format!("Invalid timestamp: {}", epoch));
        }
        let millis = if epoch.abs() >= MILLIS_THRESHOLD {
            epoch
        } else {
            epoch * 1000.0
        };
        DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)
            .ok_or_else(|| format!("Invalid timestamp: {}", epoch))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Num(n) => match n.as_i64() {
                Some(i) => from_epoch(i as f64),
                None => from_epoch(n.as_f64().unwrap_or(f64::NAN)),
            },
            Raw::Str(s) => parse_str(&s),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Deserialize)]
    struct Price {
        #[serde(deserialize_with = "super::decimal_number::deserialize")]
        price: Decimal,
    }

    #[derive(Deserialize)]
    struct MaybePrice {
        #[serde(default, deserialize_with = "super::option_decimal_number::deserialize")]
        price: Option<Decimal>,
    }

    #[derive(Deserialize)]
    struct Stamp {
        #[serde(deserialize_with = "super::flexible_timestamp::deserialize")]
        time: DateTime<Utc>,
    }

    fn price(json: &str) -> Decimal {
        serde_json::from_str::<Price>(json).unwrap().price
    }

    fn stamp(json: &str) -> DateTime<Utc> {
        serde_json::from_str::<Stamp>(json).unwrap().time
    }

    #[test]
    fn test_decimal_from_float_is_exact() {
        assert_eq!(price(r#"{"price":151.25}"#), Decimal::from_str("151.25").unwrap());
        assert_eq!(price(r#"{"price":0.1}"#), Decimal::from_str("0.1").unwrap());
        assert_eq!(price(r#"{"price":150.00}"#), Decimal::from(150));
    }

    #[test]
    fn test_decimal_from_int_and_string() {
        assert_eq!(price(r#"{"price":42}"#), Decimal::from(42));
        assert_eq!(price(r#"{"price":"-3.50"}"#), Decimal::from_str("-3.5").unwrap());
    }

    #[test]
    fn test_decimal_scientific() {
        assert_eq!(price(r#"{"price":1.5e3}"#), Decimal::from(1500));
    }

    #[test]
    fn test_decimal_rejects_garbage() {
        assert!(serde_json::from_str::<Price>(r#"{"price":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Price>(r#"{"price":true}"#).is_err());
        assert!(serde_json::from_str::<Price>(r#"{"price":null}"#).is_err());
    }

    #[test]
    fn test_option_decimal() {
        let p: MaybePrice = serde_json::from_str(r#"{"price":null}"#).unwrap();
        assert_eq!(p.price, None);
        let p: MaybePrice = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.price, None);
        let p: MaybePrice = serde_json::from_str(r#"{"price":-1.2}"#).unwrap();
        assert_eq!(p.price, Some(Decimal::from_str("-1.2").unwrap()));
    }

    #[test]
    fn test_timestamp_rfc3339() {
        assert_eq!(
            stamp(r#"{"time":"2024-01-01T10:00:00Z"}"#),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(
            stamp(r#"{"time":"2024-01-01T12:00:00+02:00"}"#),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_timestamp_naive_iso_is_utc() {
        let t = stamp(r#"{"time":"2024-01-01T10:00:00.250000"}"#);
        assert_eq!(t.timestamp_millis(), 1_704_103_200_250);
        let t = stamp(r#"{"time":"2024-01-01T10:00:00"}"#);
        assert_eq!(t.timestamp(), 1_704_103_200);
    }

    #[test]
    fn test_timestamp_epoch_seconds_and_millis() {
        assert_eq!(stamp(r#"{"time":1704103200}"#).timestamp(), 1_704_103_200);
        assert_eq!(
            stamp(r#"{"time":1704103200123}"#).timestamp_millis(),
            1_704_103_200_123
        );
        assert_eq!(
            stamp(r#"{"time":1704103200.5}"#).timestamp_millis(),
            1_704_103_200_500
        );
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!(serde_json::from_str::<Stamp>(r#"{"time":"yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Stamp>(r#"{"time":[1]}"#).is_err());
    }
}
