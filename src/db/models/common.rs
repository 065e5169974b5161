//! Helpers shared across models.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field of a partial update so that an absent key
/// (`None`) and an explicit `null` (`Some(None)`) stay distinguishable.
///
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
