//! Lenient field decoders for upstream payloads.
//!
//! The API sends `null` for fields it has not filled in yet and may encode
//! integers as floats. Both decode to the field's zero value or truncated
//! integer instead of failing the whole payload.

use serde::{Deserialize, Deserializer};

/// Reads `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads an integer or float as `i64`, and `null` as 0.
///
/// Floats are truncated toward zero; out-of-range values saturate.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Number>::deserialize(deserializer)? {
        Some(Number::Int(n)) => n,
        Some(Number::Float(f)) => f as i64,
        None => 0,
    })
}
