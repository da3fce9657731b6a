//! Метки времени в документах: локальное время с точностью до секунды,
//! формат `YYYY-MM-DDTHH:MM:SS`.

use chrono::{NaiveDateTime, Timelike};

pub const ISO_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Отбросить доли секунды.
pub fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

pub fn format_iso_seconds(ts: &NaiveDateTime) -> String {
    ts.format(ISO_SECONDS_FORMAT).to_string()
}

/// Разбор метки времени. Принимаем и вариант с дробными секундами.
pub fn parse_iso(raw: &str) -> Option<NaiveDateTime> {
    raw.trim().parse::<NaiveDateTime>().ok()
}

/// serde-адаптер для полей `NaiveDateTime`.
pub mod iso_seconds {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_seconds(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw)
            .ok_or_else(|| de::Error::custom(format!("некорректная дата: {raw:?}")))
    }
}
