use serde::{Deserialize, Deserializer};

pub mod background;
pub mod catalog;
pub mod generation;
pub mod job;

/// Deserialize an explicit `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
