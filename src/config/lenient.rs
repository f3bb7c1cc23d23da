//! Deserializers for loosely typed config values.
//!
//! YAML types scalars by their content, so an unquoted password of `123456`
//! arrives as a number. An exported but empty port arrives as `""`.

use serde::de::{self, Deserializer};
use serde::Deserialize;

use super::config::DEFAULT_PORT;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Port number, with an empty value meaning the default port.
pub(crate) fn port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(DEFAULT_PORT),
        Some(Scalar::Text(text)) if text.trim().is_empty() => Ok(DEFAULT_PORT),
        Some(Scalar::Text(text)) => text
            .trim()
            .parse::<u16>()
            .map_err(|e| de::Error::custom(format!("invalid exporter port '{}': {}", text, e))),
        Some(Scalar::Unsigned(n)) => u16::try_from(n)
            .map_err(|_| de::Error::custom(format!("exporter port {} is out of range", n))),
        Some(other) => Err(de::Error::custom(format!(
            "invalid exporter port '{}'",
            other.into_string()
        ))),
    }
}
