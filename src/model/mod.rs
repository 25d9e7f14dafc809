//! Wire types shared by the store implementations and the view managers.

pub mod audio;
pub mod file_entry;
pub mod photo;
pub mod photo_album;
pub mod vignette;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-issued identifier.
///
/// The backend may send ids as JSON numbers or strings. The client never
/// interprets them; numeric-looking ids are written back as numbers so the
/// server sees the same shape it handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(raw: impl Into<String>) -> Self {
        Id(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(raw: &str) -> Self {
        Id(raw.to_string())
    }
}

impl From<String> for Id {
    fn from(raw: String) -> Self {
        Id(raw)
    }
}

impl From<u64> for Id {
    fn from(raw: u64) -> Self {
        Id(raw.to_string())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // only the canonical spelling goes out as a number: "007" stays a string
        match self.0.parse::<i64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(i64),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Int(n) => Id(n.to_string()),
            Wire::Text(s) => Id(s),
        })
    }
}

/// Error body returned by the API on rejected requests.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// `created_at` fields arrive either as RFC 3339 or as naive ISO timestamps
/// (assumed UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, ParseError> {
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Ok(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn id_accepts_numbers_and_strings() {
        let ids: Vec<Id> = json::from_str(r#"[7, "a1b2"]"#).unwrap();
        assert_eq!(ids, vec![Id::from("7"), Id::from("a1b2")]);
    }

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        let out = json::to_string(&vec![Id::from(12u64), Id::from("abc"), Id::from("-3")]).unwrap();
        assert_eq!(out, r#"[12,"abc",-3]"#);
    }

    #[test]
    fn non_canonical_numeric_ids_stay_strings() {
        let ids = vec![Id::from("007"), Id::from("+5"), Id::from("0")];
        let out = json::to_string(&ids).unwrap();
        assert_eq!(out, r#"["007","+5",0]"#);
        let back: Vec<Id> = json::from_str(&out).unwrap();
        assert_eq!(back, ids);
    }

    #[test]
    fn timestamps_without_offset_are_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap();
        assert_eq!(timestamp::parse("2024-07-01T09:30:00").unwrap(), expected);
        assert_eq!(timestamp::parse("2024-07-01T09:30:00.000000").unwrap(), expected);
        assert_eq!(timestamp::parse("2024-07-01T11:30:00+02:00").unwrap(), expected);
        assert!(timestamp::parse("yesterday").is_err());
    }
}
