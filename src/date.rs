//! ISO 8601 calendar dates, the only date format the finance API uses.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const DISPLAY_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

/// Serde support for `YYYY-MM-DD` dates, use with `#[serde(with = "iso_date")]`.
///
/// Date-times such as `2025-01-10T00:00:00` are accepted when deserializing
/// and their time part is ignored.
pub(crate) mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::Date;

    use super::{date_part, format_iso_date, parse_iso_date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;

        parse_iso_date(date_part(&text))
            .ok_or_else(|| D::Error::custom(format!("invalid date \"{text}\", expected YYYY-MM-DD")))
    }

    /// The same as [iso_date](super::iso_date) for optional dates.
    ///
    /// Pair with `#[serde(default)]` so a missing field reads as `None`.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
        use time::Date;

        use super::super::{date_part, format_iso_date, parse_iso_date};

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_some(&format_iso_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(text) if text.is_empty() => Ok(None),
                Some(text) => parse_iso_date(date_part(&text)).map(Some).ok_or_else(|| {
                    D::Error::custom(format!("invalid date \"{text}\", expected YYYY-MM-DD"))
                }),
                None => Ok(None),
            }
        }
    }
}

/// The `YYYY-MM-DD` part of a date or date-time string.
fn date_part(text: &str) -> &str {
    text.split_once('T').map_or(text, |(date, _)| date)
}

/// Parse a `YYYY-MM-DD` date, returning `None` if `text` is not a valid date.
pub fn parse_iso_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), ISO_DATE).ok()
}

/// Format a date as `YYYY-MM-DD`.
pub(crate) fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE)
        .unwrap_or_else(|_| date.to_string())
}

/// Format a date for display, e.g. "Jan 10, 2025".
pub fn format_date(date: Date) -> String {
    date.format(DISPLAY_DATE)
        .unwrap_or_else(|_| format_iso_date(date))
}
