// Lenient field codecs. The firmware and older dashboards disagree on a few
// field encodings (flags as bool or 0/1, nulls for missing strings), so the
// decoders accept every variant that has been seen on the wire.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Flag {
    fn truthy(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(n) => n != 0,
            Flag::Float(x) => x != 0.0 && !x.is_nan(),
            Flag::Text(s) => !s.is_empty(),
        }
    }
}

/// Reads a flag sent as `true`/`false`, `0`/`1` or null (false).
pub(crate) fn flag<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Flag>::deserialize(d)?.is_some_and(Flag::truthy))
}

/// Writes a flag as `0`/`1`, the encoding the firmware's command parser expects.
pub(crate) fn flag_as_int<S>(value: &bool, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_u8(u8::from(*value))
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Reads an optional list of numbers where individual entries may be null.
/// Null entries become 0.0; a null or missing list stays `None`.
pub(crate) fn nullable_floats<'de, D>(d: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<f64>>>::deserialize(d)?;
    Ok(raw.map(|values| values.into_iter().map(Option::unwrap_or_default).collect()))
}
