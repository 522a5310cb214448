//! Lenient deserializers for admin payloads.
//!
//! The admin script posts checkbox state as `1`/`0`, ids as strings from
//! hidden inputs, and option values that may look numeric. These helpers
//! normalise all of that into typed fields at the request boundary; an
//! absent key, `null`, `""` and (for ids) `0` all mean "not given".

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

fn loose_to_i64<E: de::Error>(raw: Loose) -> Result<Option<i64>, E> {
    match raw {
        Loose::Int(n) => Ok(Some(n)),
        Loose::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
        Loose::Float(f) => Err(E::custom(format!("expected an integer, got {f}"))),
        Loose::Str(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected an integer, got {s:?}")))
        }
        Loose::Bool(_) => Err(E::custom("expected an integer, got a boolean")),
    }
}

/// `true`/`false`, `1`/`0`, `"1"`/`"0"`, `"true"`/`"false"`, `"on"`/`"off"`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Loose>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(Loose::Bool(b)) => Ok(Some(b)),
        Some(Loose::Int(n)) => Ok(Some(n != 0)),
        Some(Loose::Float(f)) => Ok(Some(f != 0.0)),
        Some(Loose::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "on" | "yes" => Ok(Some(true)),
            "0" | "false" | "off" | "no" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("expected a boolean flag, got {other:?}"))),
        },
    }
}

/// Row id. Non-positive values count as absent, like an empty hidden input.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Loose>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => Ok(loose_to_i64::<D::Error>(raw)?.filter(|id| *id > 0)),
    }
}

/// Plain integer (limit, offset, subject ids). Numeric strings are accepted.
pub fn optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Loose>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => loose_to_i64::<D::Error>(raw),
    }
}

/// Sort position, which is an INTEGER column.
pub fn optional_sort_order<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_int(deserializer)? {
        None => Ok(None),
        Some(n) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("sort order {n} out of range"))),
    }
}

/// Free text. Numbers and booleans are kept in their textual form.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Loose>::deserialize(deserializer)?;
    Ok(raw.map(|raw| match raw {
        Loose::Str(s) => s,
        Loose::Int(n) => n.to_string(),
        Loose::Float(f) => f.to_string(),
        Loose::Bool(b) => if b { "1".to_string() } else { "0".to_string() },
    }))
}
